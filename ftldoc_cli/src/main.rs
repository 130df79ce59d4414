use std::path::PathBuf;
use std::process;

use clap::Parser;
use ftldoc_cli::Commands;
use ftldoc_cli::FtldocCli;
use ftldoc_cli::OutputFormat;
use ftldoc_core::DefinitionRecord;
use ftldoc_core::DiagnosticKind;
use ftldoc_core::DocDiagnostic;
use ftldoc_core::DocIndex;
use ftldoc_core::DocOptions;
use ftldoc_core::FileDiagnostic;
use ftldoc_core::FileFailure;
use ftldoc_core::TracingSink;
use ftldoc_core::config::parse_marker;
use ftldoc_core::document_files;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FTLDOC_LOG";
const TEMPLATE_EXTENSION: &str = "ftl";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = FtldocCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Scan { files, format }) => run_scan(&args, files, *format),
		Some(Commands::Check { files }) => run_check(&args, files),
		None => {
			eprintln!("No subcommand specified. Run `ftldoc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<ftldoc_core::FtldocError>() {
			Ok(ftldoc_err) => {
				let report: miette::Report = (*ftldoc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `FTLDOC_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init();
}

fn resolve_root(args: &FtldocCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Options from `ftldoc.toml` with command line overrides applied.
fn resolve_options(args: &FtldocCli) -> Result<DocOptions, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut options = DocOptions::load(&root)?;

	if let Some(marker) = &args.marker {
		options.marker = parse_marker(marker)?;
	}

	if args.sort_files {
		options.sort_files = true;
	}

	tracing::debug!(?options, root = %root.display(), "resolved options");

	Ok(options)
}

/// The files named on the command line, or every template file directly
/// inside the project root in filename order.
fn resolve_files(
	args: &FtldocCli,
	files: &[PathBuf],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
	if !files.is_empty() {
		return Ok(files.to_vec());
	}

	let root = resolve_root(args);
	let mut found = Vec::new();

	for entry in std::fs::read_dir(&root)? {
		let path = entry?.path();
		let is_template = path
			.extension()
			.is_some_and(|extension| extension == TEMPLATE_EXTENSION);

		if is_template && path.is_file() {
			found.push(path);
		}
	}

	found.sort();

	if found.is_empty() {
		return Err(format!("no .{TEMPLATE_EXTENSION} files found in {}", root.display()).into());
	}

	Ok(found)
}

fn run_scan(
	args: &FtldocCli,
	files: &[PathBuf],
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = resolve_options(args)?;
	let paths = resolve_files(args, files)?;
	let index = document_files(&paths, &options, &mut TracingSink);

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&index)?);
		}
		OutputFormat::Text => {
			print_index(&index);
		}
	}

	for failure in &index.failures {
		eprintln!(
			"{} {}: {}",
			colored!("error:", red),
			failure.filename,
			failure.message
		);
	}

	Ok(())
}

fn run_check(args: &FtldocCli, files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
	let options = resolve_options(args)?;
	let paths = resolve_files(args, files)?;
	let mut found: Vec<DocDiagnostic> = Vec::new();
	let index = document_files(&paths, &options, &mut found);

	for diagnostic in &index.diagnostics {
		eprintln!("{:?}", diagnostic_to_report(diagnostic));
	}

	for failure in &index.failures {
		eprintln!("{:?}", failure_to_report(failure));
	}

	let total = index.files.len() + index.failures.len();

	if !index.is_ok() {
		println!(
			"{} {} of {total} file(s) could not be documented.",
			colored!("Check failed:", red),
			index.failures.len()
		);
		process::exit(1);
	}

	println!(
		"{} {total} file(s), {} definition(s), {} warning(s).",
		colored!("Check passed:", green),
		index.all_definitions.len(),
		index.diagnostics.len()
	);

	Ok(())
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_index(index: &DocIndex) {
	for file in &index.files {
		print_section(&file.filename);

		if let Some(description) = &file.description {
			let summary = description.short_comment.trim();
			if !summary.is_empty() {
				println!("  {summary}");
			}
		}

		for (category, definitions) in file.categories.iter() {
			let label = if category.is_empty() {
				"(uncategorized)"
			} else {
				category.as_str()
			};
			println!("  [{label}]");

			for definition in definitions {
				print_definition(definition);
			}
		}
	}

	let categories = index
		.all_categories
		.keys()
		.filter(|name| !name.is_empty())
		.count();

	println!();
	println!(
		"{} file(s), {} definition(s), {categories} categor{}",
		index.files.len(),
		index.all_definitions.len(),
		if categories == 1 { "y" } else { "ies" }
	);
}

fn print_definition(definition: &DefinitionRecord) {
	let mut arguments = definition.arguments.clone();
	if let Some(catch_all) = &definition.catch_all {
		arguments.push(format!("{catch_all}..."));
	}

	let signature = format!(
		"{} {}({})",
		definition.kind_label(),
		definition.name,
		arguments.join(", ")
	);
	let summary = definition.tags.short_comment.trim();

	if summary.is_empty() {
		println!("    {signature}");
	} else {
		println!("    {signature} {}", colored!(summary, dimmed));
	}
}

/// Convert a marker diagnostic into a warning `miette::Report`.
fn diagnostic_to_report(diagnostic: &FileDiagnostic) -> miette::Report {
	let position = diagnostic.diagnostic.position;
	let message = format!(
		"[{}:{position}] {}",
		diagnostic.file,
		diagnostic.diagnostic.message()
	);
	let (code, help) = match &diagnostic.diagnostic.kind {
		DiagnosticKind::NestedBegin { open, .. } => {
			(
				"ftldoc::nested_begin",
				format!("add `<#-- @end -->` before this marker to close `{open}`"),
			)
		}
		DiagnosticKind::EndWithoutBegin => {
			(
				"ftldoc::end_without_begin",
				"remove this marker or add a matching `<#-- @begin Name -->`".to_string(),
			)
		}
		DiagnosticKind::MissingEnd { name } => {
			(
				"ftldoc::missing_end",
				format!("add `<#-- @end -->` where category `{name}` should stop"),
			)
		}
		_ => ("ftldoc::marker", diagnostic.diagnostic.message()),
	};

	let diag_value = miette::MietteDiagnostic::new(message)
		.with_code(code)
		.with_help(help)
		.with_severity(miette::Severity::Warning);
	miette::Report::new(diag_value)
}

fn failure_to_report(failure: &FileFailure) -> miette::Report {
	let diag_value = miette::MietteDiagnostic::new(format!(
		"[{}] {}",
		failure.filename, failure.message
	))
	.with_code("ftldoc::file_failed")
	.with_help("this file was skipped; fix the error and run again")
	.with_severity(miette::Severity::Error);
	miette::Report::new(diag_value)
}
