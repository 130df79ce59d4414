use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn ftldoc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("ftldoc"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("FTLDOC_LOG");
	cmd
}

pub const LIBRARY: &str = r#"<#---
  Layout helpers.
-->

<#-- @begin Layout -->
<#---
  Renders a page.
  @param title the page title
-->
<#macro page title attrs...>
<html><title>${title}</title><body><#nested></body></html>
</#macro>
<#-- @end -->

<#--- Adds two numbers. -->
<#function add a b=0>
	<#return a + b>
</#function>
"#;

pub fn write(dir: &Path, name: &str, content: &str) -> std::io::Result<()> {
	std::fs::write(dir.join(name), content)
}
