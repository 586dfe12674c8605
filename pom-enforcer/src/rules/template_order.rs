//! Template-driven ordering of sibling elements.
//!
//! A template is an ordinary XML document whose element nesting spells out
//! the desired child order. The rule flattens it into a map from element
//! name to the ordered names of its children, so the same order applies to
//! an element wherever it occurs.

use std::cmp::Ordering;
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::maven_order::MAVEN_ORDER;
use super::{PomRule, RuleViolation};
use crate::constants::TEMPLATE_ORDER_RULE;
use crate::error::{Error, Result};
use crate::node::{Document, NodeId};
use crate::xml::XmlParser;

/// Sorts element children by the order given in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOrderRule {
    order: FxHashMap<String, Vec<String>>,
}

impl Default for TemplateOrderRule {
    /// Rule with the built-in Maven element order.
    fn default() -> Self {
        let order = MAVEN_ORDER
            .iter()
            .map(|(name, children)| {
                let children: Vec<String> =
                    children.iter().map(|child| child.to_string()).collect();
                (name.to_string(), children)
            })
            .collect();
        TemplateOrderRule { order }
    }
}

impl TemplateOrderRule {
    /// Builds the rule from template XML.
    pub fn from_template_str(xml: &str) -> Result<Self> {
        let doc = XmlParser::new(false)
            .parse_str(xml)
            .map_err(|err| Error::Configuration(format!("invalid template: {}", err)))?;
        Ok(Self::from_document(&doc))
    }

    /// Builds the rule from a template file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|err| {
            Error::Configuration(format!("cannot read template {}: {}", path.display(), err))
        })?;
        let rule = Self::from_template_str(&xml)?;
        debug!(
            "loaded template {} with {} ordered elements",
            path.display(),
            rule.order.len()
        );
        Ok(rule)
    }

    /// Builds the rule from a parsed template document.
    pub fn from_document(doc: &Document) -> Self {
        let mut order = FxHashMap::default();
        if let Some(root) = doc.root() {
            collect_order(doc, root, &mut order);
        }
        TemplateOrderRule { order }
    }

    /// Returns the child order for elements named `name`, if the template
    /// defines one.
    pub fn order_for(&self, name: &str) -> Option<&[String]> {
        self.order.get(name).map(Vec::as_slice)
    }

    fn sort_element(&self, doc: &mut Document, id: NodeId, violations: &mut Vec<RuleViolation>) {
        let children = doc.element_children(id);

        let order = doc.local_name(id).and_then(|name| self.order.get(name));
        if let Some(order) = order.filter(|_| children.len() > 1) {
            let mut sorted = children.clone();
            sorted.sort_by(|&a, &b| {
                compare_by_template(
                    order,
                    doc.local_name(a).unwrap_or_default(),
                    doc.local_name(b).unwrap_or_default(),
                )
            });

            if sorted != children {
                let path = doc.path(id);
                debug!("reordering children of <{}>", path);
                doc.reorder_elements(id, &sorted);
                violations.push(RuleViolation::new(
                    TEMPLATE_ORDER_RULE,
                    format!("Elements in <{}> are not in template order.", path),
                ));
            }
        }

        for child in doc.element_children(id) {
            self.sort_element(doc, child, violations);
        }
    }
}

impl PomRule for TemplateOrderRule {
    fn name(&self) -> &'static str {
        TEMPLATE_ORDER_RULE
    }

    fn apply(&self, doc: &mut Document) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        if let Some(root) = doc.root() {
            self.sort_element(doc, root, &mut violations);
        }
        violations
    }
}

/// Records the child order of `id` after its descendants, so a later
/// definition of the same name wins.
fn collect_order(doc: &Document, id: NodeId, order: &mut FxHashMap<String, Vec<String>>) {
    let children = doc.element_children(id);
    if children.is_empty() {
        return;
    }

    let mut names = Vec::with_capacity(children.len());
    for child in children {
        if let Some(name) = doc.local_name(child) {
            names.push(name.to_string());
        }
        collect_order(doc, child, order);
    }
    if let Some(name) = doc.local_name(id) {
        order.insert(name.to_string(), names);
    }
}

/// Listed names by first position, listed before unlisted, unlisted by name.
fn compare_by_template(order: &[String], left: &str, right: &str) -> Ordering {
    let position = |name: &str| order.iter().position(|n| n == name);
    match (position(left), position(right)) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}
