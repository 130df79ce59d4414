//! The parsed-source contract consumed by the documentation passes.
//!
//! A [`SourceTree`] is an arena of nodes addressed by [`NodeId`]. Any parser
//! can produce one (see [`SourceParser`]); the region and definition passes
//! only rely on what is exposed here: ordered children, a parent link, the
//! index of a node within its parent, node kind, and begin/end positions.

use serde::Serialize;

use crate::FtldocResult;
use crate::Position;

/// Anything that can turn template source text into a [`SourceTree`].
pub trait SourceParser {
	fn parse(&self, source: &str) -> FtldocResult<SourceTree>;
}

/// Handle to a node inside a [`SourceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	pub fn index(self) -> usize {
		self.0
	}
}

/// Whether a definition returns a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum DefinitionKind {
	/// A callable that writes output, `<#macro>`.
	Macro,
	/// A macro that returns a value, `<#function>`.
	Function,
}

impl DefinitionKind {
	pub fn is_function(self) -> bool {
		matches!(self, Self::Function)
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Macro => "macro",
			Self::Function => "function",
		}
	}
}

impl std::fmt::Display for DefinitionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// A callable definition as exposed by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionNode {
	pub name: String,
	pub kind: DefinitionKind,
	/// Named arguments in declaration order.
	pub arguments: Vec<String>,
	/// The argument absorbing any extra unnamed arguments.
	pub catch_all: Option<String>,
	/// Raw source text of the whole definition.
	pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NodeKind {
	/// Literal template text.
	Text(String),
	/// Comment text without the comment delimiters.
	Comment(String),
	Definition(DefinitionNode),
	/// Any other directive or the synthetic root, labelled for debugging.
	Other(String),
}

#[derive(Debug, Clone)]
pub struct TreeNode {
	pub kind: NodeKind,
	pub begin: Position,
	pub end: Position,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

impl TreeNode {
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	pub fn comment_text(&self) -> Option<&str> {
		match &self.kind {
			NodeKind::Comment(text) => Some(text),
			_ => None,
		}
	}

	pub fn definition(&self) -> Option<&DefinitionNode> {
		match &self.kind {
			NodeKind::Definition(definition) => Some(definition),
			_ => None,
		}
	}

	/// Returns true for text nodes made only of whitespace.
	pub fn is_blank_text(&self) -> bool {
		matches!(&self.kind, NodeKind::Text(text) if text.trim().is_empty())
	}
}

/// An arena-backed, acyclic tree of parsed template nodes.
#[derive(Debug, Clone)]
pub struct SourceTree {
	nodes: Vec<TreeNode>,
}

impl Default for SourceTree {
	fn default() -> Self {
		Self::new()
	}
}

impl SourceTree {
	/// Create a tree holding only an empty root node.
	pub fn new() -> Self {
		Self {
			nodes: vec![TreeNode {
				kind: NodeKind::Other("root".to_string()),
				begin: Position::new(1, 1),
				end: Position::new(1, 1),
				parent: None,
				children: Vec::new(),
			}],
		}
	}

	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Append a new child to `parent` and return its id.
	pub fn push(
		&mut self,
		parent: NodeId,
		kind: NodeKind,
		begin: Position,
		end: Position,
	) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(TreeNode {
			kind,
			begin,
			end,
			parent: Some(parent),
			children: Vec::new(),
		});
		self.nodes[parent.0].children.push(id);

		if end > self.nodes[0].end {
			self.nodes[0].end = end;
		}

		id
	}

	pub fn node(&self, id: NodeId) -> &TreeNode {
		&self.nodes[id.0]
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
		&mut self.nodes[id.0]
	}

	pub fn children(&self, id: NodeId) -> &[NodeId] {
		&self.nodes[id.0].children
	}

	pub fn child_count(&self, id: NodeId) -> usize {
		self.nodes[id.0].children.len()
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.0].parent
	}

	/// Index of `id` within its parent's children, `None` for the root.
	pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
		let parent = self.parent(id)?;
		self.children(parent).iter().position(|child| *child == id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.len() == 1
	}

	/// Walk every node in document order, root first.
	pub fn preorder(&self) -> Preorder<'_> {
		Preorder {
			tree: self,
			stack: vec![self.root()],
		}
	}

	/// All definition nodes in document order.
	pub fn definitions(&self) -> impl Iterator<Item = (NodeId, &DefinitionNode)> + '_ {
		self.preorder()
			.filter_map(|id| self.node(id).definition().map(|definition| (id, definition)))
	}
}

/// Depth-first, left-to-right traversal driven by an explicit stack so deep
/// trees cannot overflow the call stack.
pub struct Preorder<'a> {
	tree: &'a SourceTree,
	stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<Self::Item> {
		let id = self.stack.pop()?;
		// Reversed so the leftmost child is popped first.
		self.stack
			.extend(self.tree.children(id).iter().rev().copied());

		Some(id)
	}
}
