//! Per-file enforcement and the batch driver.
//!
//! A file is read once, parsed, run through every rule and serialized in
//! canonical form. The canonical bytes are compared with the original bytes
//! to detect pure formatting drift that no rule reports.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::constants::{FORMATTING_MESSAGE, FORMATTING_RULE};
use crate::error::{Error, Result};
use crate::rules::{DependencyOrderRule, PomRule, Rule, RuleViolation, TemplateOrderRule};
use crate::xml::{FormattingConfig, PomSerde};

/// Outcome of enforcing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// The processed file.
    pub path: PathBuf,
    /// Everything found out of place, rule violations first.
    pub violations: Vec<RuleViolation>,
    /// Canonical bytes differ from the file contents.
    pub changed: bool,
    /// The file was rewritten.
    pub written: bool,
}

impl FileReport {
    /// No violations were found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Outcome of enforcing a batch of files.
#[derive(Debug, Default)]
pub struct EnforcementReport {
    /// One report per processed file, in input order.
    pub files: Vec<FileReport>,
    /// Files that could not be processed.
    pub failures: Vec<(PathBuf, Error)>,
    /// Paths that do not exist.
    pub skipped: Vec<PathBuf>,
}

impl EnforcementReport {
    /// Files with at least one violation.
    pub fn violated(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|report| !report.is_clean())
    }

    /// Files whose canonical form differs from their contents.
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|report| report.changed)
    }

    /// At least one file could not be processed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// No violations and no failures.
    pub fn is_clean(&self) -> bool {
        !self.has_failures() && self.violated().next().is_none()
    }
}

/// Applies rules and canonical formatting to project files.
#[derive(Debug, Clone)]
pub struct PomEnforcer {
    serde: PomSerde,
    rules: Vec<Rule>,
}

impl Default for PomEnforcer {
    /// Default formatting with the built-in template and dependency rules.
    fn default() -> Self {
        PomEnforcer::new(
            FormattingConfig::default(),
            vec![
                TemplateOrderRule::default().into(),
                DependencyOrderRule::default().into(),
            ],
        )
    }
}

impl PomEnforcer {
    /// Creates an enforcer running `rules` in order.
    pub fn new(config: FormattingConfig, rules: Vec<Rule>) -> Self {
        PomEnforcer {
            serde: PomSerde::new(config),
            rules,
        }
    }

    /// Parser and serializer used for every file.
    pub fn serde(&self) -> &PomSerde {
        &self.serde
    }

    /// Rules in the order they run.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Checks a file and optionally rewrites it in canonical form.
    ///
    /// The returned violations are the same whether or not changes are
    /// applied. The file is written only when `apply_changes` is set and its
    /// canonical form differs from its contents.
    pub fn process(&self, path: &Path, apply_changes: bool) -> Result<Vec<RuleViolation>> {
        Ok(self.enforce(path, apply_changes)?.violations)
    }

    /// Like [`process`](Self::process), with change and write status.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn enforce(&self, path: &Path, apply_changes: bool) -> Result<FileReport> {
        debug!("reading file");
        let original = fs::read(path).map_err(|source| Error::Processing {
            path: path.to_path_buf(),
            source,
        })?;

        let (canonical, violations) = self
            .canonicalize(&original)
            .map_err(|err| err.with_path(path))?;
        let changed = canonical != original;

        let mut written = false;
        if apply_changes && changed {
            fs::write(path, &canonical).map_err(|source| Error::Processing {
                path: path.to_path_buf(),
                source,
            })?;
            written = true;
            info!("rewrote {}", path.display());
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            violations,
            changed,
            written,
        })
    }

    /// Runs every rule over `bytes` and serializes the result.
    ///
    /// Returns the canonical bytes and the violations. When the bytes differ
    /// but no rule fired, a formatting violation is added.
    pub fn canonicalize(&self, bytes: &[u8]) -> Result<(Vec<u8>, Vec<RuleViolation>)> {
        let mut doc = self.serde.deserialize(bytes)?;

        let mut violations = Vec::new();
        for rule in &self.rules {
            let found = rule.apply(&mut doc);
            debug!("rule {} found {} violation(s)", rule.name(), found.len());
            violations.extend(found);
        }

        let canonical = self.serde.serialize(&doc)?;
        if canonical != bytes && violations.is_empty() {
            violations.push(RuleViolation::new(FORMATTING_RULE, FORMATTING_MESSAGE));
        }
        Ok((canonical, violations))
    }

    /// Enforces every path in turn.
    ///
    /// Missing paths are skipped and failures recorded; neither stops the
    /// batch.
    pub fn process_all<I, P>(&self, paths: I, apply_changes: bool) -> EnforcementReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = EnforcementReport::default();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                warn!("skipping {}: file does not exist", path.display());
                report.skipped.push(path.to_path_buf());
                continue;
            }
            match self.enforce(path, apply_changes) {
                Ok(file) => report.files.push(file),
                Err(err) => {
                    warn!("failed to process {}: {}", path.display(), err);
                    report.failures.push((path.to_path_buf(), err));
                }
            }
        }
        report
    }
}
