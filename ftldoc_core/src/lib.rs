//! `ftldoc_core` extracts documentation from FreeMarker templates. It turns
//! parsed template sources into a documentation model: macros and functions
//! with their doc comments, grouped into categories and indexed across files.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template file
//!   → SourceParser (FtlParser builds a SourceTree of text, comments, definitions)
//!   → RegionResolver (@begin / @end marker comments → CategoryRegions)
//!   → DefinitionCollector (definitions + attached doc comments → DefinitionRecords)
//!   → CategoryAssigner (definition position → enclosing region)
//!   → Aggregator (per-file and global collections, sorted by name)
//! ```
//!
//! ## Doc Comments
//!
//! A doc comment is a comment whose text starts with the doc marker, so
//! `<#--- ... -->` by default. It documents the definition that directly
//! follows it:
//!
//! ```text
//! <#---
//!   Greets someone.
//!   @param name who to greet
//! -->
//! <#macro greet name>Hello ${name}</#macro>
//! ```
//!
//! ## Categories
//!
//! Definitions between `<#-- @begin Name -->` and `<#-- @end -->` are placed
//! in the category `Name`.
//!
//! ## Quick Start
//!
//! ```rust
//! use ftldoc_core::DocDiagnostic;
//! use ftldoc_core::DocOptions;
//! use ftldoc_core::FtlParser;
//! use ftldoc_core::SourceFile;
//! use ftldoc_core::document_sources;
//!
//! let source = SourceFile::new(
//! 	"lib.ftl",
//! 	"<#--- Says hi. -->\n<#macro hi>hi</#macro>",
//! );
//! let mut diagnostics: Vec<DocDiagnostic> = Vec::new();
//! let index = document_sources([source], &FtlParser, &DocOptions::default(), &mut diagnostics);
//!
//! assert_eq!(index.all_definitions[0].name, "hi");
//! assert_eq!(index.all_definitions[0].tags.short_comment, " Says hi.");
//! ```
//!
//! ## Modules
//!
//! - [`comment`] parses doc comment text into a [`TagMap`].
//! - [`region`] resolves `@begin` / `@end` markers into [`CategoryRegion`]s.
//! - [`collector`] builds a [`DefinitionRecord`] per definition.
//! - [`aggregate`] groups and sorts records per file and globally.
//! - [`project`] drives the passes over many files.
//! - [`config`] loads `ftldoc.toml`.

pub use aggregate::*;
pub use category::*;
pub use collector::*;
pub use comment::DEFAULT_DOC_MARKER;
pub use comment::Param;
pub use comment::TagMap;
pub use config::*;
pub use diagnostic::*;
pub use error::*;
pub use ftl::*;
pub use position::*;
pub use project::*;
pub use region::*;
pub use tree::*;

pub mod aggregate;
mod category;
pub mod collector;
pub mod comment;
pub mod config;
mod diagnostic;
#[allow(unused_assignments)]
mod error;
mod ftl;
mod position;
pub mod project;
pub mod region;
mod tree;

#[cfg(test)]
mod __fixtures;
