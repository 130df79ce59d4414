//! A structural scanner for FreeMarker templates.
//!
//! This is not a template engine. It only recognizes the structure the
//! documentation passes need:
//!
//! - comments `<#-- ... -->`,
//! - `<#macro name args...>` ... `</#macro>` and `<#function ...>` ...
//!   `</#function>` definitions, nested as parents of their body,
//! - any other `<#...>`, `</#...>`, `<@...>` or `</@...>` tag as an opaque
//!   leaf,
//! - everything else as text.

use std::ops::Range;

use logos::Logos;

use crate::DefinitionKind;
use crate::DefinitionNode;
use crate::FtldocError;
use crate::FtldocResult;
use crate::NodeId;
use crate::NodeKind;
use crate::SourceParser;
use crate::SourceTree;
use crate::position::LineTable;

const COMMENT_CLOSE: &[u8] = b"-->";

/// Structural tokens of a template. Anything unmatched is plain text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[token("<#--")]
	CommentOpen,
	#[token("<#macro")]
	MacroOpen,
	#[token("<#function")]
	FunctionOpen,
	#[regex(r"</#macro[ \t\r\n]*>")]
	MacroClose,
	#[regex(r"</#function[ \t\r\n]*>")]
	FunctionClose,
	#[regex(r"</?[#@][a-zA-Z_]")]
	Directive,
	#[regex(r"[^<]+")]
	Text,
}

/// Tokens inside a `<#macro ...>` or `<#function ...>` header.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderToken {
	#[regex(r"[A-Za-z_$][A-Za-z0-9_$@]*")]
	Ident,
	#[regex(r#""([^"\\]|\\.)*""#)]
	#[regex(r"'([^'\\]|\\.)*'")]
	Quoted,
	#[token("...")]
	Ellipsis,
	#[token("=")]
	Equals,
	#[token(",")]
	Comma,
	#[regex(r"[0-9]+(\.[0-9]+)?")]
	Number,
	#[token("==")]
	#[regex(r"[-+*/%!<>?&|:]+=?")]
	Operator,
	#[token("(")]
	#[token("[")]
	#[token("{")]
	Open,
	#[token(")")]
	#[token("]")]
	#[token("}")]
	Close,
	#[regex(r"[ \t\r\n]+")]
	Whitespace,
}

/// The default [`SourceParser`] for `.ftl` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FtlParser;

impl SourceParser for FtlParser {
	fn parse(&self, source: &str) -> FtldocResult<SourceTree> {
		parse_ftl(source)
	}
}

struct OpenDefinition {
	id: NodeId,
	kind: DefinitionKind,
	start: usize,
}

/// Builds the tree while the raw token stream is walked.
struct TreeBuilder<'a> {
	source: &'a str,
	lines: LineTable<'a>,
	tree: SourceTree,
	open: Vec<OpenDefinition>,
	text_start: Option<usize>,
}

impl<'a> TreeBuilder<'a> {
	fn new(source: &'a str) -> Self {
		Self {
			source,
			lines: LineTable::new(source),
			tree: SourceTree::new(),
			open: Vec::new(),
			text_start: None,
		}
	}

	fn parent(&self) -> NodeId {
		self.open
			.last()
			.map_or_else(|| self.tree.root(), |definition| definition.id)
	}

	fn push(&mut self, kind: NodeKind, range: Range<usize>) -> NodeId {
		let begin = self.lines.position(range.start);
		let end = self.lines.position(range.end);
		let parent = self.parent();
		self.tree.push(parent, kind, begin, end)
	}

	fn mark_text(&mut self, start: usize) {
		if self.text_start.is_none() {
			self.text_start = Some(start);
		}
	}

	fn flush_text(&mut self, end: usize) {
		if let Some(start) = self.text_start.take() {
			if start < end {
				let text = self.source[start..end].to_string();
				self.push(NodeKind::Text(text), start..end);
			}
		}
	}

	fn open_definition(&mut self, kind: DefinitionKind, start: usize, header: &str, end: usize) -> FtldocResult<()> {
		let header = parse_header(header);
		let Some(name) = header.name else {
			let position = self.lines.position(start);
			return Err(FtldocError::MissingDefinitionName {
				kind: kind.label().to_string(),
				line: position.line,
				column: position.column,
			});
		};

		let definition = DefinitionNode {
			name,
			kind,
			arguments: header.arguments,
			catch_all: header.catch_all,
			source: self.source[start..end].to_string(),
		};
		let id = self.push(NodeKind::Definition(definition), start..end);
		self.open.push(OpenDefinition { id, kind, start });

		Ok(())
	}

	fn close_definition(&mut self, kind: DefinitionKind, range: Range<usize>) -> FtldocResult<()> {
		let matches = self.open.last().is_some_and(|open| open.kind == kind);
		let Some(open) = self.open.pop().filter(|_| matches) else {
			let position = self.lines.position(range.start);
			return Err(FtldocError::UnexpectedClosingTag {
				tag: self.source[range].trim().to_string(),
				line: position.line,
				column: position.column,
			});
		};

		let end = self.lines.position(range.end);
		let source = self.source[open.start..range.end].to_string();
		let node = self.tree.node_mut(open.id);
		node.end = end;
		if let NodeKind::Definition(definition) = &mut node.kind {
			definition.source = source;
		}

		Ok(())
	}

	fn finish(mut self) -> FtldocResult<SourceTree> {
		self.flush_text(self.source.len());

		let root = self.tree.root();
		self.tree.node_mut(root).end = self.lines.position(self.source.len());

		if let Some(open) = self.open.pop() {
			let node = self.tree.node(open.id);
			let name = node
				.definition()
				.map(|definition| definition.name.clone())
				.unwrap_or_default();
			return Err(FtldocError::UnclosedDefinition {
				kind: open.kind.label().to_string(),
				name,
				line: node.begin.line,
				column: node.begin.column,
			});
		}

		Ok(self.tree)
	}
}

/// Parse FreeMarker template source into a [`SourceTree`].
pub fn parse_ftl(source: &str) -> FtldocResult<SourceTree> {
	let bytes = source.as_bytes();
	let mut builder = TreeBuilder::new(source);
	let mut lexer = RawToken::lexer(source);

	while let Some(token) = lexer.next() {
		let span = lexer.span();

		match token {
			Ok(RawToken::CommentOpen) => {
				builder.flush_text(span.start);
				let body_start = span.end;
				let Some(close) = memstr(&bytes[body_start..], COMMENT_CLOSE) else {
					let position = builder.lines.position(span.start);
					return Err(FtldocError::UnclosedComment {
						line: position.line,
						column: position.column,
					});
				};
				let body_end = body_start + close;
				let end = body_end + COMMENT_CLOSE.len();
				lexer.bump(end - span.end);
				builder.push(
					NodeKind::Comment(source[body_start..body_end].to_string()),
					span.start..end,
				);
			}
			Ok(token @ (RawToken::MacroOpen | RawToken::FunctionOpen))
				if is_header_boundary(bytes.get(span.end)) =>
			{
				builder.flush_text(span.start);
				let kind = if token == RawToken::MacroOpen {
					DefinitionKind::Macro
				} else {
					DefinitionKind::Function
				};
				let Some(tag_end) = find_tag_end(bytes, span.end) else {
					let position = builder.lines.position(span.start);
					return Err(FtldocError::UnclosedDefinition {
						kind: kind.label().to_string(),
						name: String::new(),
						line: position.line,
						column: position.column,
					});
				};
				lexer.bump(tag_end - span.end);
				let header = &source[span.end..tag_end - 1];
				builder.open_definition(kind, span.start, header, tag_end)?;
			}
			Ok(RawToken::MacroClose) => {
				builder.flush_text(span.start);
				builder.close_definition(DefinitionKind::Macro, span)?;
			}
			Ok(RawToken::FunctionClose) => {
				builder.flush_text(span.start);
				builder.close_definition(DefinitionKind::Function, span)?;
			}
			Ok(RawToken::Directive | RawToken::MacroOpen | RawToken::FunctionOpen) => {
				builder.flush_text(span.start);
				let end = find_tag_end(bytes, span.end).unwrap_or(bytes.len());
				lexer.bump(end - span.end);
				let label = directive_label(&source[span.start..end]);
				builder.push(NodeKind::Other(label), span.start..end);
			}
			Ok(RawToken::Text) | Err(()) => builder.mark_text(span.start),
		}
	}

	builder.finish()
}

/// A definition keyword must be followed by whitespace, `>` or `(`, so
/// `<#macros>` is not mistaken for `<#macro`.
fn is_header_boundary(byte: Option<&u8>) -> bool {
	matches!(byte, Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'('))
}

/// The directive name of an opaque tag, e.g. `#if` for `<#if x>`.
fn directive_label(tag: &str) -> String {
	tag.trim_start_matches('<')
		.chars()
		.take_while(|c| !c.is_whitespace() && *c != '>')
		.collect()
}

/// Byte offset just past the `>` that closes a tag, ignoring `>` inside
/// quoted strings and brackets.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
	let mut quote: Option<u8> = None;
	let mut depth = 0usize;
	let mut index = from;

	while index < bytes.len() {
		let byte = bytes[index];

		if let Some(open_quote) = quote {
			if byte == b'\\' {
				index += 1;
			} else if byte == open_quote {
				quote = None;
			}
		} else {
			match byte {
				b'"' | b'\'' => quote = Some(byte),
				b'(' | b'[' | b'{' => depth += 1,
				b')' | b']' | b'}' => depth = depth.saturating_sub(1),
				b'>' if depth == 0 => return Some(index + 1),
				_ => {}
			}
		}

		index += 1;
	}

	None
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Header {
	name: Option<String>,
	arguments: Vec<String>,
	catch_all: Option<String>,
}

/// Parse the text between `<#macro` and `>`: a name, then argument names
/// with optional `=default` expressions, and an optional `name...`
/// catch-all. Parentheses and commas around the argument list are accepted.
fn parse_header(header: &str) -> Header {
	let tokens: Vec<(Option<HeaderToken>, &str)> = HeaderToken::lexer(header)
		.spanned()
		.map(|(token, span)| (token.ok(), &header[span]))
		.filter(|(token, _)| *token != Some(HeaderToken::Whitespace))
		.collect();

	let mut result = Header::default();
	let mut index = 0;

	result.name = match tokens.first() {
		Some((Some(HeaderToken::Ident), name)) => Some((*name).to_string()),
		Some((Some(HeaderToken::Quoted), quoted)) => Some(quoted[1..quoted.len() - 1].to_string()),
		_ => None,
	};

	if result.name.is_some() {
		index += 1;
	}

	while index < tokens.len() {
		let (token, text) = tokens[index];
		index += 1;

		if token != Some(HeaderToken::Ident) {
			continue;
		}

		match tokens.get(index).and_then(|(next, _)| *next) {
			Some(HeaderToken::Ellipsis) => {
				index += 1;
				result.catch_all = Some(text.to_string());
			}
			Some(HeaderToken::Equals) => {
				index += 1;
				result.arguments.push(text.to_string());
				index = skip_default(&tokens, index);
			}
			_ => result.arguments.push(text.to_string()),
		}
	}

	result
}

/// Skip a default value expression starting at `index` and return the index
/// of the first token after it. Outside brackets the expression ends at a
/// comma, at the closing parenthesis of the argument list, or at a name that
/// directly follows an operand, since two operands in a row can only mean a
/// new parameter has started.
fn skip_default(tokens: &[(Option<HeaderToken>, &str)], mut index: usize) -> usize {
	let mut depth = 0usize;
	let mut after_operand = false;

	while let Some(&(token, text)) = tokens.get(index) {
		if depth == 0 {
			match token {
				Some(HeaderToken::Comma | HeaderToken::Close) => break,
				Some(HeaderToken::Ident) if after_operand && !is_word_operator(text) => break,
				_ => {}
			}
		}

		match token {
			Some(HeaderToken::Open) => depth += 1,
			Some(HeaderToken::Close) => depth = depth.saturating_sub(1),
			_ => {}
		}

		after_operand = match token {
			Some(HeaderToken::Ident) => !is_word_operator(text),
			Some(HeaderToken::Quoted | HeaderToken::Number | HeaderToken::Close) => true,
			_ => false,
		};
		index += 1;
	}

	index
}

/// Comparison operators FreeMarker spells as words.
fn is_word_operator(text: &str) -> bool {
	matches!(text, "gt" | "gte" | "lt" | "lte")
}

pub(crate) fn memstr(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	haystack
		.windows(needle.len())
		.position(|window| window == needle)
}
