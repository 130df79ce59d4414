use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// A 1-indexed line and column inside a source file.
///
/// Positions order line-major: a position on an earlier line is always less
/// than one on a later line, and the column only breaks ties on the same
/// line. The derived ordering relies on `line` being declared first.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
	/// 1-indexed line number.
	pub line: usize,
	/// 1-indexed column number.
	pub column: usize,
}

impl Position {
	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

impl Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// Table of line-start byte offsets used to turn byte offsets into
/// [`Position`]s. Built once per file, then each lookup is a binary search.
/// Columns count characters, not bytes.
pub(crate) struct LineTable<'a> {
	content: &'a str,
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl<'a> LineTable<'a> {
	pub(crate) fn new(content: &'a str) -> Self {
		let bytes = content.as_bytes();
		let mut line_starts = vec![0];

		for (index, byte) in bytes.iter().enumerate() {
			match byte {
				b'\n' => line_starts.push(index + 1),
				// A lone `\r` ends a line too, `\r\n` is handled by the `\n`.
				b'\r' if bytes.get(index + 1) != Some(&b'\n') => line_starts.push(index + 1),
				_ => {}
			}
		}

		Self {
			content,
			line_starts,
		}
	}

	pub(crate) fn position(&self, offset: usize) -> Position {
		let line_index = match self.line_starts.binary_search(&offset) {
			Ok(exact) => exact,
			Err(insert) => insert.saturating_sub(1),
		};

		let line_start = self.line_starts[line_index];
		let column = self
			.content
			.get(line_start..offset)
			.map_or(offset - line_start, |prefix| prefix.chars().count());

		Position {
			line: line_index + 1,
			column: column + 1,
		}
	}
}
