//! Doc comment tag parsing.
//!
//! A doc comment is a comment whose text starts with the doc marker
//! (`<#--- ... -->` in FreeMarker, where the marker is the third `-`). Each
//! line of the comment is exactly one of:
//!
//! - a `@param name description` line, which opens a parameter block,
//! - a generic `@tag value` line, stored in [`TagMap::tags`],
//! - free text, appended to the open parameter or to the body.
//!
//! Every line may be prefixed by whitespace and an optional `--`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// The marker that turns a FreeMarker comment into a doc comment.
pub const DEFAULT_DOC_MARKER: char = '-';

static RE_LINE_BREAK: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("valid line break regex"));

static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(?:--)?\s*@param\s+(\w+)\s*(.*)$").expect("valid param regex")
});

static RE_TAG: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\s*(?:--)?\s*(@\w+)\s*(.*)$").expect("valid tag regex"));

static RE_TEXT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\s*(?:--)?(.*)$").expect("valid text regex"));

/// A documented parameter, in the order it was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
	pub name: String,
	/// Description text. Continuation lines keep their line breaks.
	pub description: String,
}

/// Everything extracted from a single doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagMap {
	/// Generic tags keyed by name including the `@` (e.g. `@author`). A
	/// repeated tag keeps the last value.
	pub tags: BTreeMap<String, String>,
	/// `@param` entries in declaration order.
	pub params: Vec<Param>,
	/// The free text body with all line breaks removed.
	pub comment: String,
	/// The first sentence of [`comment`](TagMap::comment).
	pub short_comment: String,
}

impl TagMap {
	/// The value of a generic tag, e.g. `get("@author")`.
	pub fn get(&self, tag: &str) -> Option<&str> {
		self.tags.get(tag).map(String::as_str)
	}

	pub fn param(&self, name: &str) -> Option<&Param> {
		self.params.iter().find(|param| param.name == name)
	}

	pub fn is_empty(&self) -> bool {
		self.tags.is_empty() && self.params.is_empty() && self.comment.is_empty()
	}
}

/// Returns true when `text` (comment text without delimiters) is a doc
/// comment.
pub fn is_doc_comment(text: &str, marker: char) -> bool {
	text.starts_with(marker)
}

/// Parse raw doc comment text. The leading doc marker is stripped when
/// present. Never fails: absent or empty text yields an empty [`TagMap`].
pub fn parse_doc_comment(text: Option<&str>, marker: char) -> TagMap {
	match text {
		Some(text) => parse_comment(text.strip_prefix(marker).unwrap_or(text)),
		None => TagMap::default(),
	}
}

/// Parse comment text that has already had its doc marker removed.
pub fn parse_comment(text: &str) -> TagMap {
	let mut result = TagMap::default();
	let mut body = String::new();
	// Index into `result.params` of the parameter still collecting lines.
	let mut open_param: Option<usize> = None;

	for line in RE_LINE_BREAK.split(text) {
		if let Some(captures) = RE_PARAM.captures(line) {
			let name = captures[1].to_string();
			let description = captures[2].to_string();

			let index = if let Some(index) = result.params.iter().position(|p| p.name == name) {
				result.params[index].description = description;
				index
			} else {
				result.params.push(Param { name, description });
				result.params.len() - 1
			};

			open_param = Some(index);
			continue;
		}

		if let Some(captures) = RE_TAG.captures(line) {
			result
				.tags
				.insert(captures[1].to_string(), captures[2].to_string());
			continue;
		}

		// A blank line ends the open parameter block.
		if line.trim().is_empty() && open_param.take().is_some() {
			body.push('\n');
			continue;
		}

		let text = text_line(line);

		match open_param {
			Some(index) => {
				let description = &mut result.params[index].description;
				if !description.is_empty() && !description.ends_with('\n') {
					description.push('\n');
				}
				description.push_str(&text);
			}
			None => body.push_str(&text),
		}
	}

	result.comment = body.replace('\n', "");
	result.short_comment = match result.comment.find('.') {
		Some(index) => result.comment[..=index].to_string(),
		None => result.comment.clone(),
	};

	result
}

/// Text captured from a plain line: an optional leading `--` is dropped, any
/// leading indentation collapses to a single space, and a line break is
/// appended.
fn text_line(line: &str) -> String {
	let captured = RE_TEXT
		.captures(line)
		.and_then(|captures| captures.get(1))
		.map_or(line, |capture| capture.as_str());

	let indented = line.chars().next().is_some_and(char::is_whitespace);
	let mut text = String::with_capacity(captured.len() + 2);

	if indented {
		text.push(' ');
	}

	text.push_str(captured);
	text.push('\n');
	text
}
