use std::collections::HashSet;

use serde::Serialize;

use crate::CategoryRegion;
use crate::DefinitionKind;
use crate::NodeId;
use crate::NodeKind;
use crate::SourceTree;
use crate::TagMap;
use crate::category::find_region;
use crate::comment::is_doc_comment;
use crate::comment::parse_doc_comment;

/// A documented macro or function, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionRecord {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: DefinitionKind,
	/// Named arguments in declaration order.
	pub arguments: Vec<String>,
	/// The catch-all argument name, e.g. `rest` for `rest...`.
	pub catch_all: Option<String>,
	/// Raw source text of the definition.
	pub source: String,
	pub filename: String,
	/// Name of the enclosing category region, if any.
	pub category: Option<String>,
	/// Parsed doc comment; empty when the definition has none.
	pub tags: TagMap,
}

impl DefinitionRecord {
	pub fn is_function(&self) -> bool {
		self.kind.is_function()
	}

	/// `"function"` or `"macro"`.
	pub fn kind_label(&self) -> &'static str {
		self.kind.label()
	}

	/// The category key used for grouping. Uncategorized definitions are
	/// grouped under `""`.
	pub fn category_key(&self) -> &str {
		self.category.as_deref().unwrap_or_default()
	}
}

/// The definitions found in one file along with its file-level doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFile {
	/// Definitions in document order, unsorted.
	pub definitions: Vec<DefinitionRecord>,
	pub description: Option<TagMap>,
}

/// Collect every definition in the tree, attach its doc comment and assign
/// its category from `regions`.
pub fn collect_definitions(
	tree: &SourceTree,
	regions: &[CategoryRegion],
	filename: &str,
	marker: char,
) -> CollectedFile {
	let mut consumed: HashSet<NodeId> = HashSet::new();
	let mut definitions = Vec::new();

	for (id, definition) in tree.definitions() {
		let comment = attached_comment(tree, id, marker, &mut consumed);
		let begin = tree.node(id).begin;
		let category = find_region(begin, regions).map(|region| region.name.clone());

		definitions.push(DefinitionRecord {
			name: definition.name.clone(),
			kind: definition.kind,
			arguments: definition.arguments.clone(),
			catch_all: definition.catch_all.clone(),
			source: definition.source.clone(),
			filename: filename.to_string(),
			category,
			tags: parse_doc_comment(comment, marker),
		});
	}

	let description = file_description(tree, marker, &consumed);

	CollectedFile {
		definitions,
		description,
	}
}

/// Scan backwards through the preceding siblings of `id` for its doc comment.
///
/// Whitespace-only text is skipped. The scan stops at the first comment
/// (attached only if it is a doc comment), at any other text, or at any
/// other node. Every comment visited is recorded in `consumed`.
fn attached_comment<'a>(
	tree: &'a SourceTree,
	id: NodeId,
	marker: char,
	consumed: &mut HashSet<NodeId>,
) -> Option<&'a str> {
	let parent = tree.parent(id)?;
	let index = tree.index_in_parent(id)?;

	for sibling in tree.children(parent)[..index].iter().rev() {
		let node = tree.node(*sibling);

		if node.is_blank_text() {
			continue;
		}

		let NodeKind::Comment(text) = &node.kind else {
			return None;
		};

		consumed.insert(*sibling);

		return is_doc_comment(text, marker).then_some(text.as_str());
	}

	None
}

/// The file description is the leading doc comment of the file, unless a
/// definition already claimed it. Whitespace before it is ignored.
fn file_description(
	tree: &SourceTree,
	marker: char,
	consumed: &HashSet<NodeId>,
) -> Option<TagMap> {
	let first = tree
		.children(tree.root())
		.iter()
		.find(|id| !tree.node(**id).is_blank_text())?;

	if consumed.contains(first) {
		return None;
	}

	let text = tree.node(*first).comment_text()?;

	is_doc_comment(text, marker).then(|| parse_doc_comment(Some(text), marker))
}
