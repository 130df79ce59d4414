use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::FtldocError;
use crate::FtldocResult;
use crate::comment::DEFAULT_DOC_MARKER;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["ftldoc.toml", ".ftldoc.toml", ".config/ftldoc.toml"];

/// Configuration loaded from an `ftldoc.toml` file.
///
/// ```toml
/// doc_marker = "-"
/// sort_files = true
/// max_file_size = 1048576
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FtldocConfig {
	/// The character that follows `<#--` to mark a doc comment.
	#[serde(default)]
	pub doc_marker: Option<String>,
	/// Process files sorted by filename instead of in the order given.
	#[serde(default)]
	pub sort_files: bool,
	/// Maximum file size in bytes to read. Larger files are recorded as
	/// failures. Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
}

impl Default for FtldocConfig {
	fn default() -> Self {
		Self {
			doc_marker: None,
			sort_files: false,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
		}
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl FtldocConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> FtldocResult<Option<FtldocConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> FtldocResult<FtldocConfig> {
		toml::from_str(content).map_err(|e| FtldocError::ConfigParse(e.to_string()))
	}
}

/// Validated options used while documenting sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocOptions {
	pub marker: char,
	pub sort_files: bool,
	pub max_file_size: u64,
}

impl Default for DocOptions {
	fn default() -> Self {
		Self {
			marker: DEFAULT_DOC_MARKER,
			sort_files: false,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
		}
	}
}

impl DocOptions {
	/// Resolve options from an optional config. Missing values fall back to
	/// their defaults.
	pub fn from_config(config: Option<&FtldocConfig>) -> FtldocResult<Self> {
		let Some(config) = config else {
			return Ok(Self::default());
		};

		let marker = match config.doc_marker.as_deref() {
			Some(marker) => parse_marker(marker)?,
			None => DEFAULT_DOC_MARKER,
		};

		Ok(Self {
			marker,
			sort_files: config.sort_files,
			max_file_size: config.max_file_size,
		})
	}

	/// Load `ftldoc.toml` from `root`, if any, and resolve it.
	pub fn load(root: &Path) -> FtldocResult<Self> {
		let config = FtldocConfig::load(root)?;
		Self::from_config(config.as_ref())
	}
}

/// A doc marker must be exactly one non-whitespace character.
pub fn parse_marker(value: &str) -> FtldocResult<char> {
	let mut chars = value.chars();

	match (chars.next(), chars.next()) {
		(Some(marker), None) if !marker.is_whitespace() => Ok(marker),
		_ => Err(FtldocError::InvalidDocMarker(value.to_string())),
	}
}
