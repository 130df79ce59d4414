mod common;

use clap::Parser;
use ftldoc_cli::Commands;
use ftldoc_cli::FtldocCli;
use ftldoc_cli::OutputFormat;
use ftldoc_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use similar_asserts::assert_eq;

#[test]
fn scan_prints_text_summary() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "library.ftl", common::LIBRARY)?;

	common::ftldoc_cmd()
		.arg("scan")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("library.ftl"))
		.stdout(predicates::str::contains("Layout helpers."))
		.stdout(predicates::str::contains("[Layout]"))
		.stdout(predicates::str::contains("macro page(title, attrs...) Renders a page."))
		.stdout(predicates::str::contains("[(uncategorized)]"))
		.stdout(predicates::str::contains("function add(a, b) Adds two numbers."))
		.stdout(predicates::str::contains("1 file(s), 2 definition(s), 1 category"));

	Ok(())
}

#[test]
fn scan_prints_json_model() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "library.ftl", common::LIBRARY)?;

	let output = common::ftldoc_cmd()
		.arg("scan")
		.arg("--format")
		.arg("json")
		.arg(tmp.path().join("library.ftl"))
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["all_definitions"][0]["name"], "add");
	assert_eq!(json["all_definitions"][0]["type"], "function");
	assert_eq!(json["all_definitions"][1]["category"], "Layout");
	assert_eq!(
		json["all_definitions"][1]["tags"]["params"][0]["name"],
		"title"
	);
	assert_eq!(json["files"][0]["filename"], "library.ftl");
	assert_eq!(json["failures"], serde_json::json!([]));

	Ok(())
}

#[test]
fn scan_reports_failures_and_continues() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "broken.ftl", "<#macro broken>")?;
	common::write(tmp.path(), "library.ftl", common::LIBRARY)?;

	common::ftldoc_cmd()
		.arg("scan")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("library.ftl"))
		.stdout(predicates::str::contains("broken.ftl").not())
		.stderr(predicates::str::contains("error: broken.ftl"));

	Ok(())
}

#[test]
fn scan_logs_marker_warnings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "stray.ftl", "<#-- @end -->\n<#macro a></#macro>")?;

	common::ftldoc_cmd()
		.arg("scan")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("@end without @begin"));

	Ok(())
}

#[test]
fn scan_uses_marker_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	common::write(tmp.path(), ".config/ftldoc.toml", "doc_marker = \"*\"\n")?;
	common::write(
		tmp.path(),
		"starred.ftl",
		"<#--* Starred docs. -->\n<#macro star></#macro>",
	)?;

	common::ftldoc_cmd()
		.arg("scan")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("macro star() Starred docs."));

	Ok(())
}

#[test]
fn marker_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "ftldoc.toml", "doc_marker = \"*\"\n")?;
	common::write(
		tmp.path(),
		"bang.ftl",
		"<#--! Bang docs. -->\n<#macro bang></#macro>",
	)?;

	common::ftldoc_cmd()
		.arg("scan")
		.arg("--path")
		.arg(tmp.path())
		.arg("--marker")
		.arg("!")
		.assert()
		.success()
		.stdout(predicates::str::contains("macro bang() Bang docs."));

	Ok(())
}

#[test]
fn invalid_config_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "ftldoc.toml", "doc_marker = \"--\"\n")?;
	common::write(tmp.path(), "library.ftl", common::LIBRARY)?;

	common::ftldoc_cmd()
		.arg("scan")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid doc comment marker"));

	Ok(())
}

#[test]
fn empty_directory_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::ftldoc_cmd()
		.arg("scan")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no .ftl files found"));

	Ok(())
}

#[test]
fn missing_subcommand_exits_with_usage_hint() {
	common::ftldoc_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));
}

#[test]
fn parses_scan_arguments() -> AnyEmptyResult {
	let cli = FtldocCli::try_parse_from([
		"ftldoc",
		"--sort-files",
		"scan",
		"a.ftl",
		"b.ftl",
		"--format",
		"json",
	])?;

	assert!(cli.sort_files);
	let Some(Commands::Scan { files, format }) = cli.command else {
		return Err("expected scan".into());
	};
	assert_eq!(files.len(), 2);
	assert_eq!(format, OutputFormat::Json);

	Ok(())
}
