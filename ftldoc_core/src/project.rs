use std::path::Path;

use serde::Serialize;

use crate::Aggregator;
use crate::CategoryMap;
use crate::CollectedFile;
use crate::DefinitionRecord;
use crate::DiagnosticSink;
use crate::DocDiagnostic;
use crate::DocOptions;
use crate::FileDiagnostic;
use crate::FileDoc;
use crate::FtlParser;
use crate::FtldocError;
use crate::FtldocResult;
use crate::ResolvedRegions;
use crate::SourceParser;
use crate::collector::collect_definitions;
use crate::region::resolve_regions;

/// A named template source held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
	/// The filename recorded on every definition from this source.
	pub name: String,
	pub content: String,
}

impl SourceFile {
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			content: content.into(),
		}
	}

	/// Read `path`, refusing files larger than `max_file_size` bytes. The
	/// source is named after the file name of `path`.
	pub fn read(path: &Path, max_file_size: u64) -> FtldocResult<Self> {
		let size = std::fs::metadata(path)?.len();

		if size > max_file_size {
			return Err(FtldocError::FileTooLarge {
				path: path.display().to_string(),
				size,
				limit: max_file_size,
			});
		}

		let content = std::fs::read_to_string(path)?;

		Ok(Self::new(file_name(path), content))
	}
}

/// A file that could not be documented. Its contributions are left out of
/// the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
	pub filename: String,
	pub message: String,
}

/// Everything produced from a batch of sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocIndex {
	/// Successfully processed files in processing order.
	pub files: Vec<FileDoc>,
	/// Definitions from every file grouped by category.
	pub all_categories: CategoryMap,
	/// Definitions from every file, sorted by name.
	pub all_definitions: Vec<DefinitionRecord>,
	pub failures: Vec<FileFailure>,
	/// Marker problems found along the way. These never cause a failure.
	pub diagnostics: Vec<FileDiagnostic>,
}

impl DocIndex {
	/// Returns true when every file was documented.
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn file(&self, filename: &str) -> Option<&FileDoc> {
		self.files.iter().find(|file| file.filename == filename)
	}
}

/// Run region resolution and definition collection on a single source.
pub fn document_source(
	source: &SourceFile,
	parser: &dyn SourceParser,
	marker: char,
	sink: &mut dyn DiagnosticSink,
) -> FtldocResult<(ResolvedRegions, CollectedFile)> {
	let tree = parser.parse(&source.content)?;
	let regions = resolve_regions(&tree, marker, sink);
	let collected = collect_definitions(&tree, &regions.regions, &source.name, marker);

	Ok((regions, collected))
}

/// Document every source and build the final sorted index.
///
/// A source that fails to parse is recorded in [`DocIndex::failures`] and
/// processing continues with the next one. Marker diagnostics are forwarded
/// to `sink` and also kept in [`DocIndex::diagnostics`].
pub fn document_sources(
	sources: impl IntoIterator<Item = SourceFile>,
	parser: &dyn SourceParser,
	options: &DocOptions,
	sink: &mut dyn DiagnosticSink,
) -> DocIndex {
	let mut sources: Vec<SourceFile> = sources.into_iter().collect();

	if options.sort_files {
		sources.sort_by(|a, b| a.name.cmp(&b.name));
	}

	let mut aggregator = Aggregator::new();
	let mut failures = Vec::new();
	let mut diagnostics = Vec::new();

	for source in &sources {
		let _span = tracing::debug_span!("file", name = %source.name).entered();
		tracing::debug!(bytes = source.content.len(), "documenting file");

		let mut found: Vec<DocDiagnostic> = Vec::new();

		match document_source(source, parser, options.marker, &mut found) {
			Ok((regions, collected)) => {
				tracing::debug!(
					definitions = collected.definitions.len(),
					categories = regions.categories.len(),
					"documented file"
				);
				aggregator.add_file(source.name.clone(), &regions, collected);
			}
			Err(error) => {
				tracing::error!(%error, "skipping file");
				failures.push(FileFailure {
					filename: source.name.clone(),
					message: error.to_string(),
				});
			}
		}

		for diagnostic in found {
			sink.report(diagnostic.clone());
			diagnostics.push(FileDiagnostic {
				file: source.name.clone(),
				diagnostic,
			});
		}
	}

	let (files, global) = aggregator.finish();

	DocIndex {
		files,
		all_categories: global.all_categories,
		all_definitions: global.all_definitions,
		failures,
		diagnostics,
	}
}

/// Read and document template files with the default [`FtlParser`].
///
/// Files that cannot be read, or exceed `options.max_file_size`, are
/// recorded as failures ahead of any parse failures.
pub fn document_files<P: AsRef<Path>>(
	paths: impl IntoIterator<Item = P>,
	options: &DocOptions,
	sink: &mut dyn DiagnosticSink,
) -> DocIndex {
	let mut sources = Vec::new();
	let mut failures = Vec::new();

	for path in paths {
		let path = path.as_ref();

		match SourceFile::read(path, options.max_file_size) {
			Ok(source) => sources.push(source),
			Err(error) => {
				tracing::error!(path = %path.display(), %error, "skipping file");
				failures.push(FileFailure {
					filename: file_name(path),
					message: error.to_string(),
				});
			}
		}
	}

	let mut index = document_sources(sources, &FtlParser, options, sink);
	failures.append(&mut index.failures);
	index.failures = failures;

	index
}

fn file_name(path: &Path) -> String {
	path.file_name().map_or_else(
		|| path.display().to_string(),
		|name| name.to_string_lossy().into_owned(),
	)
}
