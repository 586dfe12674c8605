//! XML parsing and canonical output.
//!
//! [`PomSerde`] pairs the parser with the printer under one
//! [`FormattingConfig`], so a document read with it can be written back in
//! canonical form.

mod config;
mod parser;
mod printer;

use std::path::Path;

pub use config::{FormattingConfig, FormattingConfigBuilder, OutputEncoding};
pub use parser::{parse_file, parse_str, XmlParser};
pub use printer::{print_to_string, print_to_vec, XmlPrinter};

use crate::error::Result;
use crate::node::Document;

/// Reads and writes project documents under a formatting configuration.
#[derive(Debug, Clone, Default)]
pub struct PomSerde {
    config: FormattingConfig,
}

impl PomSerde {
    /// Creates a serializer with the given configuration.
    pub fn new(config: FormattingConfig) -> Self {
        PomSerde { config }
    }

    /// Returns the formatting configuration.
    pub fn config(&self) -> &FormattingConfig {
        &self.config
    }

    fn parser(&self) -> XmlParser {
        XmlParser::new(self.config.keep_blank_lines())
    }

    /// Parses a document from raw bytes.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Document> {
        self.parser().parse_bytes(bytes)
    }

    /// Parses a document from a string.
    pub fn deserialize_str(&self, xml: &str) -> Result<Document> {
        self.parser().parse_str(xml)
    }

    /// Parses a document from a file.
    pub fn deserialize_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        self.parser().parse_file(path)
    }

    /// Writes `doc` in canonical form.
    pub fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        Ok(print_to_vec(doc, &self.config)?)
    }
}
