mod common;

use ftldoc_core::AnyEmptyResult;
use rstest::rstest;

#[test]
fn check_passes_for_clean_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "library.ftl", common::LIBRARY)?;

	common::ftldoc_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: 1 file(s), 2 definition(s), 0 warning(s).",
		));

	Ok(())
}

#[rstest]
#[case::stray_end("<#-- @end -->", "ftldoc::end_without_begin")]
#[case::missing_end("<#-- @begin Forms -->\n<#macro f></#macro>", "ftldoc::missing_end")]
#[case::nested_begin(
	"<#-- @begin A -->\n<#-- @begin B -->\n<#-- @end -->",
	"ftldoc::nested_begin"
)]
fn check_warns_about_markers(#[case] source: &str, #[case] code: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "markers.ftl", source)?;

	common::ftldoc_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains(code))
		.stderr(predicates::str::contains("markers.ftl"))
		.stdout(predicates::str::contains("1 warning(s)"));

	Ok(())
}

#[rstest]
#[case::unclosed_comment("<#-- open", "unterminated comment")]
#[case::unclosed_definition("<#macro m>", "missing closing tag for macro `m`")]
#[case::stray_close("</#function>", "unexpected closing tag")]
fn check_fails_for_unparsable_files(
	#[case] source: &str,
	#[case] message: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "bad.ftl", source)?;
	common::write(tmp.path(), "good.ftl", common::LIBRARY)?;

	common::ftldoc_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("ftldoc::file_failed"))
		.stderr(predicates::str::contains(message))
		.stdout(predicates::str::contains(
			"Check failed: 1 of 2 file(s) could not be documented.",
		));

	Ok(())
}

#[test]
fn check_reports_missing_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::ftldoc_cmd()
		.arg("check")
		.arg(tmp.path().join("missing.ftl"))
		.assert()
		.code(1)
		.stderr(predicates::str::contains("missing.ftl"));

	Ok(())
}
