//! Constants used throughout the enforcer.
//!
//! Defaults here are the values used when a configuration option is unset.

/// Default declared and output encoding.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Emit only attributes that were present in the source by default.
pub const DEFAULT_FORMAT_SCHEMA_LOCATION: bool = true;

/// Align root namespace and attribute declarations by default.
pub const DEFAULT_INDENT_SCHEMA_LOCATION: bool = true;

/// Spaces per indentation level.
pub const DEFAULT_INDENT_SPACES_NUMBER: usize = 4;

/// Whitespace-only text is dropped while parsing by default.
pub const DEFAULT_KEEP_BLANK_LINES: bool = false;

/// Line terminator written between lines.
pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

/// Comparison fields for dependency sorting.
pub const DEFAULT_DEPENDENCY_SORT: &str = "groupId,artifactId,scope,classifier";

/// BOM dependencies are pinned before regular ones by default.
pub const DEFAULT_BOM_AT_BEGINNING: bool = true;

/// BOM dependencies keep their relative order by default.
pub const DEFAULT_BOM_KEEP_ORDER: bool = true;

/// Column padding used for aligned root declarations.
///
/// Each aligned declaration is also preceded by the usual single space, so
/// declarations start at column 9, under the first attribute of `<project `.
pub const ROOT_ATTRIBUTE_INDENT: usize = 8;

/// Deepest element nesting accepted by the parser.
///
/// Tree walks are recursive; deeper documents are rejected instead of
/// exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Local name of the element that receives root alignment.
pub const PROJECT_ELEMENT: &str = "project";

/// Rule name for template ordering violations.
pub const TEMPLATE_ORDER_RULE: &str = "template-order";

/// Rule name for dependency ordering violations.
pub const DEPENDENCY_ORDER_RULE: &str = "dependency-order";

/// Rule name for pure formatting drift.
pub const FORMATTING_RULE: &str = "formatting";

/// Message for pure formatting drift.
pub const FORMATTING_MESSAGE: &str = "The file has inconsistent indentation or whitespace.";
