//! Ordering of `<dependency>` entries.
//!
//! Dependencies are compared field by field on the trimmed text of their
//! child elements. Bill-of-materials imports (`type` = `pom`, `scope` =
//! `import`) can be pinned to the start of the list.

use std::cmp::Ordering;

use tracing::debug;

use super::{PomRule, RuleViolation};
use crate::constants::{
    DEFAULT_BOM_AT_BEGINNING, DEFAULT_BOM_KEEP_ORDER, DEFAULT_DEPENDENCY_SORT,
    DEPENDENCY_ORDER_RULE,
};
use crate::node::{Document, NodeId};

/// Sorts `dependencies` and `dependencyManagement/dependencies`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOrderRule {
    sort_fields: Vec<String>,
    bom_at_beginning: bool,
    bom_keep_order: bool,
}

impl Default for DependencyOrderRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Comparison key extracted once per dependency.
struct DependencyKey {
    id: NodeId,
    bom: bool,
    fields: Vec<String>,
}

impl DependencyOrderRule {
    /// Creates the rule with the default sort fields and BOM handling.
    pub fn new() -> Self {
        DependencyOrderRule {
            sort_fields: parse_fields(DEFAULT_DEPENDENCY_SORT),
            bom_at_beginning: DEFAULT_BOM_AT_BEGINNING,
            bom_keep_order: DEFAULT_BOM_KEEP_ORDER,
        }
    }

    /// Sets the comparison fields from a comma-separated list.
    ///
    /// Items are trimmed and empty items dropped. A blank string keeps the
    /// current fields.
    pub fn with_sorting_order(mut self, sorting_order: &str) -> Self {
        if !sorting_order.trim().is_empty() {
            self.sort_fields = parse_fields(sorting_order);
        }
        self
    }

    /// Pins BOM imports before other dependencies.
    pub fn with_bom_at_beginning(mut self, bom_at_beginning: bool) -> Self {
        self.bom_at_beginning = bom_at_beginning;
        self
    }

    /// Keeps pinned BOM imports in their source order instead of sorting them.
    pub fn with_bom_keep_order(mut self, bom_keep_order: bool) -> Self {
        self.bom_keep_order = bom_keep_order;
        self
    }

    /// Child element names compared, in priority order.
    pub fn sort_fields(&self) -> &[String] {
        &self.sort_fields
    }

    /// Whether BOM imports are pinned first.
    pub fn bom_at_beginning(&self) -> bool {
        self.bom_at_beginning
    }

    /// Whether pinned BOM imports keep their source order.
    pub fn bom_keep_order(&self) -> bool {
        self.bom_keep_order
    }

    fn check_section(
        &self,
        doc: &mut Document,
        parent: Option<NodeId>,
        namespace_uri: &str,
        label: &str,
        violations: &mut Vec<RuleViolation>,
    ) {
        let Some(parent) = parent else {
            return;
        };
        let original = doc.element_children(parent);
        if original.len() < 2 {
            return;
        }

        let mut keys: Vec<DependencyKey> = original
            .iter()
            .map(|&id| self.key(doc, id, namespace_uri))
            .collect();
        keys.sort_by(|a, b| self.compare(a, b));
        let sorted: Vec<NodeId> = keys.into_iter().map(|key| key.id).collect();

        if sorted != original {
            debug!("reordering <{}>", label);
            doc.reorder_elements(parent, &sorted);
            violations.push(RuleViolation::new(
                DEPENDENCY_ORDER_RULE,
                format!("Dependencies in <{}> are not sorted.", label),
            ));
        }
    }

    fn key(&self, doc: &Document, id: NodeId, namespace_uri: &str) -> DependencyKey {
        let text = |name: &str| doc.child_text_trim(id, name, namespace_uri);
        DependencyKey {
            id,
            bom: text("type").eq_ignore_ascii_case("pom")
                && text("scope").eq_ignore_ascii_case("import"),
            fields: self.sort_fields.iter().map(|field| text(field.as_str())).collect(),
        }
    }

    fn compare(&self, left: &DependencyKey, right: &DependencyKey) -> Ordering {
        if self.bom_at_beginning {
            match (left.bom, right.bom) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                (true, true) if self.bom_keep_order => return Ordering::Equal,
                _ => {}
            }
        }
        left.fields.cmp(&right.fields)
    }
}

impl PomRule for DependencyOrderRule {
    fn name(&self) -> &'static str {
        DEPENDENCY_ORDER_RULE
    }

    fn apply(&self, doc: &mut Document) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        let Some(root) = doc.root() else {
            return violations;
        };
        let namespace_uri = doc
            .element(root)
            .map(|e| e.namespace_uri().to_string())
            .unwrap_or_default();

        let dependencies = doc.child_element(root, "dependencies", &namespace_uri);
        self.check_section(doc, dependencies, &namespace_uri, "dependencies", &mut violations);

        if let Some(management) = doc.child_element(root, "dependencyManagement", &namespace_uri) {
            let managed = doc.child_element(management, "dependencies", &namespace_uri);
            self.check_section(
                doc,
                managed,
                &namespace_uri,
                "dependencyManagement/dependencies",
                &mut violations,
            );
        }

        violations
    }
}

fn parse_fields(sorting_order: &str) -> Vec<String> {
    sorting_order
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::PomSerde;

    const POM_NS: &str = "http://maven.apache.org/POM/4.0.0";

    fn project(dependencies: &str) -> Document {
        let xml = format!(
            "<project xmlns=\"{}\">  <dependencies>{}</dependencies></project>",
            POM_NS, dependencies
        );
        PomSerde::default().deserialize_str(&xml).unwrap()
    }

    fn dependency_texts(doc: &Document, parent: NodeId, field: &str) -> Vec<String> {
        doc.element_children(parent)
            .into_iter()
            .map(|dep| doc.child_text_trim(dep, field, POM_NS))
            .collect()
    }

    fn dependencies_of(doc: &Document) -> NodeId {
        doc.child_element(doc.root().unwrap(), "dependencies", POM_NS)
            .unwrap()
    }

    const BOM_MIX: &str = "\
        <dependency><groupId>Z.regular</groupId><artifactId>A</artifactId></dependency>\
        <dependency><groupId>M.bom</groupId><artifactId>B</artifactId><type>pom</type><scope>import</scope></dependency>\
        <dependency><groupId>A.bom</groupId><artifactId>C</artifactId><type>pom</type><scope>import</scope></dependency>";

    #[test]
    fn test_sorts_by_group_and_artifact() {
        let mut doc = project(
            "<dependency><groupId>org.hibernate</groupId><artifactId>hibernate-core</artifactId></dependency>\
             <dependency><groupId>com.google.guava</groupId><artifactId>guava</artifactId></dependency>\
             <dependency><groupId>org.hibernate</groupId><artifactId>hibernate-validator</artifactId></dependency>",
        );
        let violations = DependencyOrderRule::new().apply(&mut doc);
        assert_eq!(
            violations,
            [RuleViolation::new(
                DEPENDENCY_ORDER_RULE,
                "Dependencies in <dependencies> are not sorted."
            )]
        );

        let deps = dependencies_of(&doc);
        assert_eq!(
            dependency_texts(&doc, deps, "artifactId"),
            ["guava", "hibernate-core", "hibernate-validator"]
        );
    }

    #[test]
    fn test_boms_first_and_sorted() {
        let mut doc = project(BOM_MIX);
        let rule = DependencyOrderRule::new().with_bom_keep_order(false);
        assert!(!rule.apply(&mut doc).is_empty());

        let deps = dependencies_of(&doc);
        assert_eq!(
            dependency_texts(&doc, deps, "groupId"),
            ["A.bom", "M.bom", "Z.regular"]
        );
    }

    #[test]
    fn test_boms_first_in_source_order() {
        let mut doc = project(BOM_MIX);
        assert!(!DependencyOrderRule::new().apply(&mut doc).is_empty());

        let deps = dependencies_of(&doc);
        assert_eq!(
            dependency_texts(&doc, deps, "groupId"),
            ["M.bom", "A.bom", "Z.regular"]
        );
    }

    #[test]
    fn test_boms_not_pinned() {
        let mut doc = project(BOM_MIX);
        let rule = DependencyOrderRule::new().with_bom_at_beginning(false);
        rule.apply(&mut doc);

        let deps = dependencies_of(&doc);
        assert_eq!(
            dependency_texts(&doc, deps, "groupId"),
            ["A.bom", "M.bom", "Z.regular"]
        );
    }

    #[test]
    fn test_bom_detection_is_case_insensitive() {
        let mut doc = project(
            "<dependency><groupId>B</groupId></dependency>\
             <dependency><groupId>Z</groupId><type> POM </type><scope>Import</scope></dependency>",
        );
        DependencyOrderRule::new().apply(&mut doc);
        let deps = dependencies_of(&doc);
        assert_eq!(dependency_texts(&doc, deps, "groupId"), ["Z", "B"]);
    }

    #[test]
    fn test_default_fields_put_group_before_scope() {
        let mut doc = project(
            "<dependency><groupId>B</groupId><artifactId>B</artifactId><scope>test</scope></dependency>\
             <dependency><groupId>A</groupId><artifactId>A</artifactId><scope>compile</scope></dependency>\
             <dependency><groupId>C</groupId><artifactId>C</artifactId><scope>test</scope></dependency>",
        );
        assert!(!DependencyOrderRule::new().apply(&mut doc).is_empty());
        let deps = dependencies_of(&doc);
        assert_eq!(dependency_texts(&doc, deps, "groupId"), ["A", "B", "C"]);
    }

    #[test]
    fn test_custom_sort_fields() {
        let mut doc = project(
            "<dependency><groupId>A</groupId><scope>test</scope></dependency>\
             <dependency><groupId>B</groupId><scope>compile</scope></dependency>",
        );
        let rule = DependencyOrderRule::new().with_sorting_order(" scope , ,groupId ");
        assert_eq!(rule.sort_fields(), ["scope", "groupId"]);
        rule.apply(&mut doc);
        let deps = dependencies_of(&doc);
        assert_eq!(dependency_texts(&doc, deps, "groupId"), ["B", "A"]);
    }

    #[test]
    fn test_blank_sort_order_keeps_default() {
        let rule = DependencyOrderRule::new().with_sorting_order("  ");
        assert_eq!(
            rule.sort_fields(),
            ["groupId", "artifactId", "scope", "classifier"]
        );
    }

    #[test]
    fn test_dependency_management_is_checked() {
        let xml = format!(
            "<project xmlns=\"{}\"><dependencyManagement><dependencies>\
               <dependency><groupId>Z</groupId><artifactId>Z</artifactId></dependency>\
               <dependency><groupId>A</groupId><artifactId>A</artifactId></dependency>\
             </dependencies></dependencyManagement></project>",
            POM_NS
        );
        let mut doc = PomSerde::default().deserialize_str(&xml).unwrap();
        let violations = DependencyOrderRule::new().apply(&mut doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message(),
            "Dependencies in <dependencyManagement/dependencies> are not sorted."
        );

        let root = doc.root().unwrap();
        let management = doc.child_element(root, "dependencyManagement", POM_NS).unwrap();
        let deps = doc.child_element(management, "dependencies", POM_NS).unwrap();
        assert_eq!(dependency_texts(&doc, deps, "groupId"), ["A", "Z"]);
    }

    #[test]
    fn test_sections_are_reported_independently() {
        let xml = "<project>\
              <dependencyManagement><dependencies>\
                <dependency><groupId>b</groupId></dependency><dependency><groupId>a</groupId></dependency>\
              </dependencies></dependencyManagement>\
              <dependencies>\
                <dependency><groupId>b</groupId></dependency><dependency><groupId>a</groupId></dependency>\
              </dependencies>\
            </project>";
        let mut doc = PomSerde::default().deserialize_str(xml).unwrap();
        let violations = DependencyOrderRule::new().apply(&mut doc);
        assert_eq!(violations.len(), 2);
        assert!(DependencyOrderRule::new().apply(&mut doc).is_empty());
    }

    #[test]
    fn test_sorted_or_single_lists_are_untouched() {
        let mut doc = project(
            "<dependency><groupId>a</groupId></dependency><dependency><groupId>b</groupId></dependency>",
        );
        assert!(DependencyOrderRule::new().apply(&mut doc).is_empty());

        let mut single = project("<dependency><groupId>z</groupId></dependency>");
        assert!(DependencyOrderRule::new().apply(&mut single).is_empty());
    }

    #[test]
    fn test_lookup_uses_root_namespace() {
        let xml = "<project xmlns=\"urn:p\"><x:dependencies xmlns:x=\"urn:other\">\
              <x:dependency><x:groupId>b</x:groupId></x:dependency>\
              <x:dependency><x:groupId>a</x:groupId></x:dependency>\
            </x:dependencies></project>";
        let mut doc = PomSerde::default().deserialize_str(xml).unwrap();
        assert!(DependencyOrderRule::new().apply(&mut doc).is_empty());
    }
}
