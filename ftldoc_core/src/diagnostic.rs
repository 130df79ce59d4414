use serde::Serialize;

use crate::Position;

/// The kind of problem found while resolving category markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// `@begin` while another region was still open. The open region is
	/// closed at the new marker.
	NestedBegin { open: String, name: String },
	/// `@end` with no open region. Ignored.
	EndWithoutBegin,
	/// A region still open at the end of the file. It runs to the end of the
	/// file.
	MissingEnd { name: String },
}

/// A recoverable problem found in a single file. These never stop
/// processing; they are reported to a [`DiagnosticSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocDiagnostic {
	pub kind: DiagnosticKind,
	/// Where the offending marker comment starts.
	pub position: Position,
}

impl DocDiagnostic {
	pub fn new(kind: DiagnosticKind, position: Position) -> Self {
		Self { kind, position }
	}

	/// Human-readable message for this diagnostic.
	pub fn message(&self) -> String {
		match &self.kind {
			DiagnosticKind::NestedBegin { open, name } => {
				format!("nested @begin `{name}` while category `{open}` is still open")
			}
			DiagnosticKind::EndWithoutBegin => "@end without @begin".to_string(),
			DiagnosticKind::MissingEnd { name } => {
				format!("missing @end for category `{name}` (runs to end of file)")
			}
		}
	}
}

impl std::fmt::Display for DocDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} at {}", self.message(), self.position)
	}
}

/// Receives diagnostics as they are found.
pub trait DiagnosticSink {
	fn report(&mut self, diagnostic: DocDiagnostic);
}

impl DiagnosticSink for Vec<DocDiagnostic> {
	fn report(&mut self, diagnostic: DocDiagnostic) {
		self.push(diagnostic);
	}
}

/// Forwards every diagnostic to `tracing` as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn report(&mut self, diagnostic: DocDiagnostic) {
		tracing::warn!(
			line = diagnostic.position.line,
			column = diagnostic.position.column,
			"{}",
			diagnostic.message()
		);
	}
}

/// A diagnostic together with the file it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiagnostic {
	pub file: String,
	#[serde(flatten)]
	pub diagnostic: DocDiagnostic,
}
