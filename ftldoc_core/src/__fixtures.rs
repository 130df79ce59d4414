use crate::CategoryRegion;
use crate::DefinitionKind;
use crate::DefinitionRecord;
use crate::Position;
use crate::RegionEnd;
use crate::TagMap;

/// One undocumented macro and nothing else.
pub(crate) const NO_COMMENTS: &str = "<#macro plain a b>\n${a}${b}\n</#macro>\n";

/// A parameter description that continues on the next line, followed by
/// free text after a blank line.
pub(crate) const PARAM_CONTINUATION: &str = "<#---
@param x the x param
    more text for x

Top-level text.
-->
<#macro foo x>${x}</#macro>
";

pub(crate) const STRAY_END: &str = "<#-- @end -->
<#macro a></#macro>
<#macro b></#macro>
";

pub(crate) const MISSING_END: &str = "<#macro before></#macro>
<#-- @begin A -->
<#macro first></#macro>
<#function second>
	<#return 1>
</#function>
";

pub(crate) const NESTED_BEGIN: &str = "<#-- @begin A -->
<#macro a></#macro>
<#-- @begin B -->
<#macro b></#macro>
<#-- @end -->
<#macro outside></#macro>
";

/// A small but complete library file.
pub(crate) const LIBRARY: &str = r#"<#---
  Layout helpers.
  @author Jane Doe
-->

<#-- @begin Layout -->

<#---
  Renders a page. Wraps the nested content.
  @param title the page title
  @param scripts extra script urls
-->
<#macro page title scripts=[] attrs...>
<html><head><title>${title}</title></head>
<body><#nested></body></html>
</#macro>

<#-- @end -->

<#--- Adds two numbers. -->
<#function add a b=0>
	<#return a + b>
</#function>
"#;

pub(crate) fn region(name: &str, start: Position, end: RegionEnd) -> CategoryRegion {
	CategoryRegion {
		name: name.to_string(),
		start,
		end,
	}
}

pub(crate) fn record(name: &str, filename: &str) -> DefinitionRecord {
	DefinitionRecord {
		name: name.to_string(),
		kind: DefinitionKind::Macro,
		arguments: Vec::new(),
		catch_all: None,
		source: format!("<#macro {name}></#macro>"),
		filename: filename.to_string(),
		category: None,
		tags: TagMap::default(),
	}
}

pub(crate) fn names(definitions: &[DefinitionRecord]) -> Vec<&str> {
	definitions
		.iter()
		.map(|definition| definition.name.as_str())
		.collect()
}
