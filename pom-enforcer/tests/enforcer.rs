//! End-to-end tests that run the enforcer over files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use pom_enforcer::{
    EnforcerConfig, Error, FormattingConfig, PomEnforcer, Rule, TemplateOrderRule,
    FORMATTING_RULE, MAX_NESTING_DEPTH,
};
use tempfile::TempDir;

const MESSY: &str =
    "<project><dependencies></dependencies><modelVersion>4.0.0</modelVersion></project>";

const CANONICAL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
    <project>\n    \
    <modelVersion>4.0.0</modelVersion>\n    \
    <dependencies/>\n\
    </project>\n";

fn template_only() -> PomEnforcer {
    let rules: Vec<Rule> = vec![TemplateOrderRule::default().into()];
    PomEnforcer::new(FormattingConfig::default(), rules)
}

fn write_pom(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn check_reports_violations_and_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let pom = write_pom(&dir, "pom.xml", MESSY);

    let violations = template_only().process(&pom, false).unwrap();
    assert!(!violations.is_empty());
    assert_eq!(read(&pom), MESSY);
}

#[test]
fn apply_rewrites_file_in_canonical_form() {
    let dir = TempDir::new().unwrap();
    let pom = write_pom(&dir, "pom.xml", MESSY);

    let violations = template_only().process(&pom, true).unwrap();
    assert!(!violations.is_empty());

    let clean = read(&pom);
    assert_eq!(clean, CANONICAL);
    assert!(clean.find("modelVersion") < clean.find("dependencies"));
}

#[test]
fn violations_do_not_depend_on_apply() {
    let dir = TempDir::new().unwrap();
    let checked = write_pom(&dir, "a.xml", MESSY);
    let applied = write_pom(&dir, "b.xml", MESSY);

    let enforcer = template_only();
    assert_eq!(
        enforcer.process(&checked, false).unwrap(),
        enforcer.process(&applied, true).unwrap()
    );
}

#[test]
fn second_pass_is_clean() {
    let dir = TempDir::new().unwrap();
    let pom = write_pom(&dir, "pom.xml", "<project><modelVersion>4.0.0</modelVersion></project>");

    let enforcer = template_only();
    let first = enforcer.process(&pom, true).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].rule_name(), FORMATTING_RULE);

    assert!(enforcer.process(&pom, true).unwrap().is_empty());
}

#[test]
fn canonical_file_is_not_rewritten() {
    let dir = TempDir::new().unwrap();
    let pom = write_pom(&dir, "pom.xml", CANONICAL);

    let report = PomEnforcer::default().enforce(&pom, true).unwrap();
    assert!(report.violations.is_empty());
    assert!(!report.changed);
    assert!(!report.written);
}

#[test]
fn malformed_file_is_an_error_and_untouched() {
    let dir = TempDir::new().unwrap();
    let broken = "<project><modelVersion>4.0.0</project>";
    let pom = write_pom(&dir, "pom.xml", broken);

    let err = PomEnforcer::default().process(&pom, true).unwrap_err();
    match err {
        Error::MalformedDocument { path, .. } => assert_eq!(path.as_deref(), Some(pom.as_path())),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(read(&pom), broken);
}

#[test]
fn full_project_is_canonicalized() {
    let dir = TempDir::new().unwrap();
    let messy = r#"<?xml version="1.0"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
  <dependencies>
    <dependency>
      <artifactId>junit</artifactId>
      <groupId>junit</groupId>
      <scope>test</scope>
    </dependency>
    <!-- platform -->
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-framework-bom</artifactId>
      <type>pom</type>
      <scope>import</scope>
    </dependency>
  </dependencies>
  <artifactId>demo</artifactId>
  <groupId>org.example</groupId>
  <modelVersion>4.0.0</modelVersion>
  <version>1.0</version>
</project>
"#;
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>demo</artifactId>
    <version>1.0</version>
    <dependencies>
        <!-- platform -->
        <dependency>
            <groupId>org.springframework</groupId>
            <artifactId>spring-framework-bom</artifactId>
            <type>pom</type>
            <scope>import</scope>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <scope>test</scope>
        </dependency>
    </dependencies>
</project>
"#;
    let pom = write_pom(&dir, "pom.xml", messy);

    let enforcer = EnforcerConfig::default().build().unwrap();
    let violations = enforcer.process(&pom, true).unwrap();
    let rules: Vec<&str> = violations.iter().map(|v| v.rule_name()).collect();
    assert!(rules.contains(&"template-order"));
    assert!(rules.contains(&"dependency-order"));
    assert_eq!(read(&pom), expected);

    assert!(enforcer.process(&pom, false).unwrap().is_empty());
}

#[test]
fn batch_continues_past_failures_and_skips_missing() {
    let dir = TempDir::new().unwrap();
    let good = write_pom(&dir, "good.xml", CANONICAL);
    let messy = write_pom(&dir, "messy.xml", MESSY);
    let broken = write_pom(&dir, "broken.xml", "<project>");
    let missing = dir.path().join("missing.xml");

    let paths = [&broken, &missing, &messy, &good];
    let report = PomEnforcer::default().process_all(paths, false);

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, broken);
    assert_eq!(report.skipped, [missing]);

    let violated: Vec<&Path> = report.violated().map(|f| f.path.as_path()).collect();
    assert_eq!(violated, [messy.as_path()]);
    assert_eq!(report.changed().count(), 1);
    assert!(!report.is_clean());
    assert_eq!(read(&messy), MESSY);
}

fn nested_project(depth: usize) -> String {
    format!(
        "<project>{}{}</project>",
        "<a>".repeat(depth),
        "</a>".repeat(depth)
    )
}

#[test]
fn overly_deep_file_fails_alone() {
    let dir = TempDir::new().unwrap();
    let deep = write_pom(&dir, "deep.xml", &nested_project(50_000));
    let messy = write_pom(&dir, "messy.xml", MESSY);

    let report = PomEnforcer::default().process_all([&deep, &messy], true);

    assert_eq!(report.failures.len(), 1);
    let (path, err) = &report.failures[0];
    assert_eq!(path, &deep);
    assert!(matches!(err, Error::MalformedDocument { .. }));
    assert_eq!(report.files.len(), 1);
    assert_eq!(read(&messy), CANONICAL);
}

#[test]
fn deepest_accepted_file_is_canonicalized() {
    let xml = nested_project(MAX_NESTING_DEPTH - 1);
    let enforcer = PomEnforcer::default();

    let (first, _) = enforcer.canonicalize(xml.as_bytes()).unwrap();
    let (second, violations) = enforcer.canonicalize(&first).unwrap();
    assert_eq!(first, second);
    assert!(violations.is_empty());
}

#[test]
fn batch_apply_writes_changed_files_only() {
    let dir = TempDir::new().unwrap();
    let good = write_pom(&dir, "good.xml", CANONICAL);
    let messy = write_pom(&dir, "messy.xml", MESSY);

    let report = PomEnforcer::default().process_all([&good, &messy], true);
    assert!(!report.has_failures());

    let written: Vec<&Path> = report
        .files
        .iter()
        .filter(|f| f.written)
        .map(|f| f.path.as_path())
        .collect();
    assert_eq!(written, [messy.as_path()]);
    assert_eq!(read(&messy), CANONICAL);

    let again = PomEnforcer::default().process_all([&good, &messy], false);
    assert!(again.is_clean());
}

#[test]
fn custom_formatting_options_are_applied() {
    let dir = TempDir::new().unwrap();
    let pom = write_pom(&dir, "pom.xml", "<project a=\"1\"><modelVersion>4.0.0</modelVersion></project>");

    let config = EnforcerConfig {
        indent_spaces_number: 2,
        indent_schema_location: false,
        line_separator: "\r\n".to_string(),
        ..EnforcerConfig::default()
    };
    config.build().unwrap().process(&pom, true).unwrap();
    assert_eq!(
        read(&pom),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n<project a=\"1\">\r\n  <modelVersion>4.0.0</modelVersion>\r\n</project>\r\n"
    );
}

#[test]
fn blank_lines_survive_when_kept() {
    let dir = TempDir::new().unwrap();
    let contents = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <project>\n    \
        <modelVersion>4.0.0</modelVersion>\n\n    \
        <groupId>g</groupId>\n\
        </project>\n";
    let pom = write_pom(&dir, "pom.xml", contents);

    let config = EnforcerConfig {
        keep_blank_lines: true,
        ..EnforcerConfig::default()
    };
    assert!(config.build().unwrap().process(&pom, false).unwrap().is_empty());

    let violations = PomEnforcer::default().process(&pom, true).unwrap();
    assert_eq!(violations[0].rule_name(), FORMATTING_RULE);
    assert!(!read(&pom).contains("\n\n"));
}
