//! Ordering rules applied to project documents.
//!
//! Each rule mutates the document in place into its canonical order and
//! reports one [`RuleViolation`] per place where the order changed.

mod dependency_order;
mod maven_order;
mod template_order;

use std::fmt;

pub use dependency_order::DependencyOrderRule;
pub use template_order::TemplateOrderRule;

use crate::node::Document;

/// A single rule finding: rule name plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleViolation {
    rule_name: String,
    message: String,
}

impl RuleViolation {
    /// Creates a violation.
    pub fn new(rule_name: impl Into<String>, message: impl Into<String>) -> Self {
        RuleViolation {
            rule_name: rule_name.into(),
            message: message.into(),
        }
    }

    /// Name of the rule that produced this violation.
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Description of the violation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule_name, self.message)
    }
}

/// A document rule.
///
/// Implementations hold only configuration; all per-document state lives in
/// the document passed to [`apply`](PomRule::apply).
pub trait PomRule: Send + Sync {
    /// Stable rule name used in violations.
    fn name(&self) -> &'static str;

    /// Rewrites `doc` into canonical order and returns what was out of order.
    fn apply(&self, doc: &mut Document) -> Vec<RuleViolation>;
}

/// The rules the enforcer knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Template-driven sibling ordering.
    TemplateOrder(TemplateOrderRule),
    /// Dependency list ordering.
    DependencyOrder(DependencyOrderRule),
}

impl PomRule for Rule {
    fn name(&self) -> &'static str {
        match self {
            Rule::TemplateOrder(rule) => rule.name(),
            Rule::DependencyOrder(rule) => rule.name(),
        }
    }

    fn apply(&self, doc: &mut Document) -> Vec<RuleViolation> {
        match self {
            Rule::TemplateOrder(rule) => rule.apply(doc),
            Rule::DependencyOrder(rule) => rule.apply(doc),
        }
    }
}

impl From<TemplateOrderRule> for Rule {
    fn from(rule: TemplateOrderRule) -> Self {
        Rule::TemplateOrder(rule)
    }
}

impl From<DependencyOrderRule> for Rule {
    fn from(rule: DependencyOrderRule) -> Self {
        Rule::DependencyOrder(rule)
    }
}
