//! Aggregate enforcer configuration.
//!
//! [`EnforcerConfig`] holds every user-facing option as a plain value, the
//! way a command line or build plugin binds them. [`EnforcerConfig::build`]
//! validates the values once and produces an immutable [`PomEnforcer`].

use std::path::PathBuf;

use tracing::debug;

use crate::constants::{
    DEFAULT_BOM_AT_BEGINNING, DEFAULT_BOM_KEEP_ORDER, DEFAULT_DEPENDENCY_SORT, DEFAULT_ENCODING,
    DEFAULT_FORMAT_SCHEMA_LOCATION, DEFAULT_INDENT_SCHEMA_LOCATION, DEFAULT_INDENT_SPACES_NUMBER,
    DEFAULT_KEEP_BLANK_LINES, DEFAULT_LINE_SEPARATOR,
};
use crate::error::Result;
use crate::processor::PomEnforcer;
use crate::rules::{DependencyOrderRule, TemplateOrderRule};
use crate::xml::FormattingConfig;

/// User-facing enforcer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcerConfig {
    /// Declared and output encoding.
    pub encoding: String,
    /// Emit only attributes present in the source.
    pub format_schema_location: bool,
    /// Align root declarations on separate lines.
    pub indent_schema_location: bool,
    /// Spaces per indentation level; negative values are rejected.
    pub indent_spaces_number: i64,
    /// Keep blank lines between elements.
    pub keep_blank_lines: bool,
    /// Line terminator.
    pub line_separator: String,
    /// Template file; `None` uses the built-in Maven template.
    pub template_order: Option<PathBuf>,
    /// Comma-separated dependency comparison fields.
    pub dependency_sort: String,
    /// Pin BOM imports before other dependencies.
    pub bom_at_beginning: bool,
    /// Keep pinned BOM imports in source order.
    pub bom_keep_order: bool,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        EnforcerConfig {
            encoding: DEFAULT_ENCODING.to_string(),
            format_schema_location: DEFAULT_FORMAT_SCHEMA_LOCATION,
            indent_schema_location: DEFAULT_INDENT_SCHEMA_LOCATION,
            indent_spaces_number: DEFAULT_INDENT_SPACES_NUMBER as i64,
            keep_blank_lines: DEFAULT_KEEP_BLANK_LINES,
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
            template_order: None,
            dependency_sort: DEFAULT_DEPENDENCY_SORT.to_string(),
            bom_at_beginning: DEFAULT_BOM_AT_BEGINNING,
            bom_keep_order: DEFAULT_BOM_KEEP_ORDER,
        }
    }
}

impl EnforcerConfig {
    /// Validated formatting configuration.
    pub fn formatting(&self) -> Result<FormattingConfig> {
        FormattingConfig::builder()
            .encoding(self.encoding.clone())
            .format_schema_location(self.format_schema_location)
            .indent_schema_location(self.indent_schema_location)
            .indent_spaces_number(self.indent_spaces_number)
            .keep_blank_lines(self.keep_blank_lines)
            .line_separator(self.line_separator.clone())
            .build()
    }

    /// Template rule from the configured file or the built-in template.
    pub fn template_rule(&self) -> Result<TemplateOrderRule> {
        match &self.template_order {
            Some(path) => TemplateOrderRule::from_path(path),
            None => Ok(TemplateOrderRule::default()),
        }
    }

    /// Dependency rule from the sort fields and BOM options.
    pub fn dependency_rule(&self) -> DependencyOrderRule {
        DependencyOrderRule::new()
            .with_sorting_order(&self.dependency_sort)
            .with_bom_at_beginning(self.bom_at_beginning)
            .with_bom_keep_order(self.bom_keep_order)
    }

    /// Validates every option and builds the enforcer.
    ///
    /// Rules run template order first, then dependency order.
    pub fn build(&self) -> Result<PomEnforcer> {
        let formatting = self.formatting()?;
        let rules = vec![self.template_rule()?.into(), self.dependency_rule().into()];
        debug!("built enforcer with {:?}", formatting);
        Ok(PomEnforcer::new(formatting, rules))
    }
}
