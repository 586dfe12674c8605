//! POM Enforcer - canonical ordering and formatting for Maven project files
//!
//! This library rewrites `pom.xml` files into one deterministic shape, so
//! every project file in a multi-module tree sorts and looks the same no
//! matter who edited it.
//!
//! # Overview
//!
//! A file goes through three stages:
//!
//! 1. It is parsed into a mutable [`Document`] tree.
//! 2. Ordering rules rewrite the tree in place and report what they moved:
//!    [`TemplateOrderRule`] sorts sibling elements by a template, and
//!    [`DependencyOrderRule`] sorts dependency lists with BOM imports pinned
//!    first.
//! 3. The tree is serialized by a pretty-printer whose output is a pure
//!    function of the tree and the [`FormattingConfig`]. Printing is
//!    idempotent.
//!
//! Comparing the canonical bytes with the file contents also catches pure
//! formatting drift that no rule reports.
//!
//! # Example
//!
//! ```no_run
//! use pom_enforcer::EnforcerConfig;
//! use std::path::Path;
//!
//! let enforcer = EnforcerConfig::default().build()?;
//! for violation in enforcer.process(Path::new("pom.xml"), false)? {
//!     println!("{}", violation);
//! }
//! # Ok::<(), pom_enforcer::Error>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod node;
pub mod processor;
pub mod rules;
pub mod xml;

// Re-export commonly used types
pub use config::EnforcerConfig;
pub use constants::*;
pub use error::{Error, Result};
pub use node::{Document, NodeId, XmlContent, XmlElement, XmlText};
pub use processor::{EnforcementReport, FileReport, PomEnforcer};
pub use rules::{DependencyOrderRule, PomRule, Rule, RuleViolation, TemplateOrderRule};
pub use xml::{parse_file, parse_str, FormattingConfig, PomSerde, XmlParser, XmlPrinter};
