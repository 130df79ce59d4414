use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum FtldocError {
	#[error(transparent)]
	#[diagnostic(code(ftldoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("unterminated comment starting at {line}:{column}")]
	#[diagnostic(
		code(ftldoc::unclosed_comment),
		help("close the comment with `-->`")
	)]
	UnclosedComment { line: usize, column: usize },

	#[error("missing closing tag for {kind} `{name}` opened at {line}:{column}")]
	#[diagnostic(
		code(ftldoc::unclosed_definition),
		help("add `</#{kind}>` to close this definition")
	)]
	UnclosedDefinition {
		kind: String,
		name: String,
		line: usize,
		column: usize,
	},

	#[error("unexpected closing tag `{tag}` at {line}:{column}")]
	#[diagnostic(
		code(ftldoc::unexpected_closing_tag),
		help("every `</#macro>` or `</#function>` must close a matching open definition")
	)]
	UnexpectedClosingTag {
		tag: String,
		line: usize,
		column: usize,
	},

	#[error("{kind} definition at {line}:{column} has no name")]
	#[diagnostic(code(ftldoc::missing_definition_name))]
	MissingDefinitionName {
		kind: String,
		line: usize,
		column: usize,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(ftldoc::config_parse),
		help("check that ftldoc.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("invalid doc comment marker: `{0}`")]
	#[diagnostic(
		code(ftldoc::invalid_doc_marker),
		help("the doc comment marker must be exactly one character, e.g. `-`")
	)]
	InvalidDocMarker(String),

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(ftldoc::file_too_large),
		help("increase `max_file_size` in ftldoc.toml or leave this file out")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },
}

pub type FtldocResult<T> = Result<T, FtldocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
