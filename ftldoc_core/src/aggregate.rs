use std::collections::BTreeMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

use crate::CollectedFile;
use crate::DefinitionRecord;
use crate::ResolvedRegions;
use crate::TagMap;

/// Definitions grouped by category name. `""` holds the uncategorized ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct CategoryMap(BTreeMap<String, Vec<DefinitionRecord>>);

impl CategoryMap {
	/// Make sure `name` exists, possibly with no definitions.
	pub fn ensure(&mut self, name: &str) {
		if !self.0.contains_key(name) {
			self.0.insert(name.to_string(), Vec::new());
		}
	}

	fn push(&mut self, definition: DefinitionRecord) {
		self.0
			.entry(definition.category_key().to_string())
			.or_default()
			.push(definition);
	}

	fn sort(&mut self) {
		for definitions in self.0.values_mut() {
			sort_definitions(definitions);
		}
	}
}

/// Documentation for a single processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDoc {
	pub filename: String,
	/// The file-level doc comment, if the file starts with one.
	pub description: Option<TagMap>,
	pub definitions: Vec<DefinitionRecord>,
	/// This file's definitions grouped by category.
	pub categories: CategoryMap,
}

/// Cross-file accumulators, filled in file processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalIndex {
	pub all_categories: CategoryMap,
	pub all_definitions: Vec<DefinitionRecord>,
}

/// Builds the per-file and global collections. Lists stay in insertion order
/// until [`Aggregator::finish`] sorts them.
#[derive(Debug, Default)]
pub struct Aggregator {
	files: Vec<FileDoc>,
	global: GlobalIndex,
}

impl Aggregator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record one file's regions and definitions.
	pub fn add_file(
		&mut self,
		filename: impl Into<String>,
		regions: &ResolvedRegions,
		collected: CollectedFile,
	) {
		let mut categories = CategoryMap::default();

		for name in &regions.categories {
			categories.ensure(name);
			self.global.all_categories.ensure(name);
		}

		for definition in &collected.definitions {
			categories.push(definition.clone());
			self.global.all_categories.push(definition.clone());
			self.global.all_definitions.push(definition.clone());
		}

		self.files.push(FileDoc {
			filename: filename.into(),
			description: collected.description,
			definitions: collected.definitions,
			categories,
		});
	}

	/// Files recorded so far.
	pub fn files(&self) -> &[FileDoc] {
		&self.files
	}

	pub fn global(&self) -> &GlobalIndex {
		&self.global
	}

	/// Sort every exposed list and hand back the finished collections.
	pub fn finish(mut self) -> (Vec<FileDoc>, GlobalIndex) {
		for file in &mut self.files {
			sort_definitions(&mut file.definitions);
			file.categories.sort();
		}

		self.global.all_categories.sort();
		sort_definitions(&mut self.global.all_definitions);

		(self.files, self.global)
	}
}

/// Stable, case-insensitive ascending sort by name. Definitions with equal
/// names keep their relative order.
pub fn sort_definitions(definitions: &mut [DefinitionRecord]) {
	definitions.sort_by_cached_key(|definition| definition.name.to_lowercase());
}
