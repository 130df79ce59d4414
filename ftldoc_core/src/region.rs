use std::collections::BTreeSet;

use serde::Serialize;

use crate::DiagnosticKind;
use crate::DiagnosticSink;
use crate::DocDiagnostic;
use crate::Position;
use crate::SourceTree;
use crate::comment::is_doc_comment;
use crate::comment::parse_comment;

const BEGIN_TAG: &str = "@begin";
const END_TAG: &str = "@end";

/// Where a category region stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionEnd {
	At(Position),
	/// No `@end` was found; the region runs to the end of the file.
	EndOfFile,
}

impl RegionEnd {
	/// Returns true when `position` lies strictly before this end.
	pub fn is_after(&self, position: Position) -> bool {
		match self {
			Self::At(end) => position < *end,
			Self::EndOfFile => true,
		}
	}
}

/// A named span of a file delimited by `@begin` / `@end` marker comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRegion {
	pub name: String,
	pub start: Position,
	pub end: RegionEnd,
}

impl CategoryRegion {
	/// Exclusive on both bounds: a position exactly on `start` or `end` is
	/// outside the region.
	pub fn contains(&self, position: Position) -> bool {
		self.start < position && self.end.is_after(position)
	}
}

/// The regions of a single file, in the order they were closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRegions {
	pub regions: Vec<CategoryRegion>,
	/// Every category name registered by this file.
	pub categories: BTreeSet<String>,
}

impl ResolvedRegions {
	fn register(&mut self, region: CategoryRegion) {
		self.categories.insert(region.name.clone());
		self.regions.push(region);
	}
}

struct OpenRegion {
	name: String,
	start: Position,
}

/// Walk the tree in document order and turn `@begin` / `@end` marker
/// comments into category regions.
///
/// Markers may sit in plain comments as well as doc comments. Malformed
/// marker sequences are recovered from and reported to `sink`:
///
/// - `@begin` while open closes the open region at the new marker.
/// - `@end` while closed is ignored.
/// - a region still open at the end runs to the end of the file.
pub fn resolve_regions(
	tree: &SourceTree,
	marker: char,
	sink: &mut dyn DiagnosticSink,
) -> ResolvedRegions {
	let mut resolved = ResolvedRegions::default();
	let mut open: Option<OpenRegion> = None;

	for id in tree.preorder() {
		let node = tree.node(id);
		let Some(text) = node.comment_text() else {
			continue;
		};

		let text = if is_doc_comment(text, marker) {
			&text[marker.len_utf8()..]
		} else {
			text
		};
		let tags = parse_comment(text);

		if let Some(value) = tags.get(BEGIN_TAG) {
			let name = value.trim().to_string();

			if let Some(current) = open.take() {
				sink.report(DocDiagnostic::new(
					DiagnosticKind::NestedBegin {
						open: current.name.clone(),
						name: name.clone(),
					},
					node.begin,
				));
				resolved.register(CategoryRegion {
					name: current.name,
					start: current.start,
					end: RegionEnd::At(node.begin),
				});
			}

			open = Some(OpenRegion {
				name,
				start: node.begin,
			});
		}

		if tags.get(END_TAG).is_some() {
			match open.take() {
				Some(current) => {
					resolved.register(CategoryRegion {
						name: current.name,
						start: current.start,
						end: RegionEnd::At(node.end),
					});
				}
				None => {
					sink.report(DocDiagnostic::new(
						DiagnosticKind::EndWithoutBegin,
						node.begin,
					));
				}
			}
		}
	}

	if let Some(current) = open {
		sink.report(DocDiagnostic::new(
			DiagnosticKind::MissingEnd {
				name: current.name.clone(),
			},
			current.start,
		));
		resolved.register(CategoryRegion {
			name: current.name,
			start: current.start,
			end: RegionEnd::EndOfFile,
		});
	}

	resolved
}
