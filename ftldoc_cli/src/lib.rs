use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Extract documentation from FreeMarker macro and function libraries.",
	long_about = "ftldoc reads FreeMarker templates and documents every `<#macro>` and \
	              `<#function>` from the `<#--- ... -->` doc comment that precedes it.\n\nWrap \
	              definitions in `<#-- @begin Name -->` / `<#-- @end -->` comments to group them \
	              into categories.\n\nQuick start:\n  ftldoc scan          Document every .ftl \
	              file in the current directory\n  ftldoc scan --format json lib.ftl\n  ftldoc \
	              check         Report marker problems and unparsable files"
)]
pub struct FtldocCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory holding `ftldoc.toml` and, when no files are given, the
	/// templates to document.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// The character that turns a comment into a doc comment. Overrides
	/// `doc_marker` from `ftldoc.toml`.
	#[arg(long, global = true)]
	pub marker: Option<String>,

	/// Process files in filename order instead of the order given.
	#[arg(long, global = true, default_value_t = false)]
	pub sort_files: bool,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Document template files and print the result.
	///
	/// Every macro and function is listed with its arguments, category and
	/// summary. Files that cannot be parsed are reported and skipped.
	Scan {
		/// Template files to document. Defaults to every `.ftl` file in the
		/// project directory.
		files: Vec<PathBuf>,

		/// Output format. Use `text` for a readable summary or `json` for
		/// the full documentation model.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Report category marker problems and files that fail to parse.
	///
	/// Marker problems are warnings. Exits with a non-zero status code if any
	/// file could not be documented.
	Check {
		/// Template files to check. Defaults to every `.ftl` file in the
		/// project directory.
		files: Vec<PathBuf>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
