//! Formatting policy for the canonical serializer.

use crate::constants::{
    DEFAULT_ENCODING, DEFAULT_FORMAT_SCHEMA_LOCATION, DEFAULT_INDENT_SCHEMA_LOCATION,
    DEFAULT_INDENT_SPACES_NUMBER, DEFAULT_KEEP_BLANK_LINES, DEFAULT_LINE_SEPARATOR,
};
use crate::error::{Error, Result};

/// Byte encodings the serializer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// UTF-8, every character is representable.
    Utf8,
    /// ISO-8859-1, characters above U+00FF become character references.
    Latin1,
    /// US-ASCII, characters above U+007F become character references.
    Ascii,
}

impl OutputEncoding {
    /// Resolves an encoding label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "UTF-8" | "UTF8" => Some(OutputEncoding::Utf8),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Some(OutputEncoding::Latin1),
            "US-ASCII" | "ASCII" => Some(OutputEncoding::Ascii),
            _ => None,
        }
    }

    /// Returns true if `c` can be written as-is.
    pub fn can_encode(self, c: char) -> bool {
        match self {
            OutputEncoding::Utf8 => true,
            OutputEncoding::Latin1 => u32::from(c) <= 0xFF,
            OutputEncoding::Ascii => c.is_ascii(),
        }
    }

    /// Appends the encoded form of `s` to `out`.
    ///
    /// Markup that cannot carry character references (names, comments) is
    /// written with `?` for unrepresentable characters.
    pub fn encode_into(self, s: &str, out: &mut Vec<u8>) {
        match self {
            OutputEncoding::Utf8 => out.extend_from_slice(s.as_bytes()),
            OutputEncoding::Latin1 | OutputEncoding::Ascii => {
                out.extend(s.chars().map(|c| {
                    if self.can_encode(c) {
                        u8::try_from(u32::from(c)).unwrap_or(b'?')
                    } else {
                        b'?'
                    }
                }));
            }
        }
    }
}

/// Immutable formatting configuration.
///
/// Use [`FormattingConfig::builder`] to change individual options; the
/// builder validates the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingConfig {
    encoding: String,
    output_encoding: OutputEncoding,
    format_schema_location: bool,
    indent_schema_location: bool,
    indent_spaces_number: usize,
    keep_blank_lines: bool,
    line_separator: String,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        FormattingConfig {
            encoding: DEFAULT_ENCODING.to_string(),
            output_encoding: OutputEncoding::Utf8,
            format_schema_location: DEFAULT_FORMAT_SCHEMA_LOCATION,
            indent_schema_location: DEFAULT_INDENT_SCHEMA_LOCATION,
            indent_spaces_number: DEFAULT_INDENT_SPACES_NUMBER,
            keep_blank_lines: DEFAULT_KEEP_BLANK_LINES,
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }
}

impl FormattingConfig {
    /// Returns a builder starting from the defaults.
    pub fn builder() -> FormattingConfigBuilder {
        FormattingConfigBuilder::default()
    }

    /// Declared encoding, as written in the XML declaration.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Encoding used to produce output bytes.
    pub fn output_encoding(&self) -> OutputEncoding {
        self.output_encoding
    }

    /// Emit only attributes present in the source.
    pub fn format_schema_location(&self) -> bool {
        self.format_schema_location
    }

    /// Align root declarations on separate lines.
    pub fn indent_schema_location(&self) -> bool {
        self.indent_schema_location
    }

    /// Spaces per indentation level.
    pub fn indent_spaces_number(&self) -> usize {
        self.indent_spaces_number
    }

    /// Keep whitespace-only text while parsing.
    pub fn keep_blank_lines(&self) -> bool {
        self.keep_blank_lines
    }

    /// Line terminator.
    pub fn line_separator(&self) -> &str {
        &self.line_separator
    }

    /// Indentation for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_spaces_number * depth)
    }
}

/// Builder for [`FormattingConfig`].
///
/// Unset options keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct FormattingConfigBuilder {
    encoding: Option<String>,
    format_schema_location: Option<bool>,
    indent_schema_location: Option<bool>,
    indent_spaces_number: Option<i64>,
    keep_blank_lines: Option<bool>,
    line_separator: Option<String>,
}

impl FormattingConfigBuilder {
    /// Sets the declared and output encoding.
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Sets whether only source attributes are emitted.
    pub fn format_schema_location(mut self, value: bool) -> Self {
        self.format_schema_location = Some(value);
        self
    }

    /// Sets whether root declarations are aligned on separate lines.
    pub fn indent_schema_location(mut self, value: bool) -> Self {
        self.indent_schema_location = Some(value);
        self
    }

    /// Sets the spaces per indentation level. Negative values are rejected
    /// by [`build`](Self::build).
    pub fn indent_spaces_number(mut self, value: i64) -> Self {
        self.indent_spaces_number = Some(value);
        self
    }

    /// Sets whether whitespace-only text is kept while parsing.
    pub fn keep_blank_lines(mut self, value: bool) -> Self {
        self.keep_blank_lines = Some(value);
        self
    }

    /// Sets the line terminator (`\n`, `\r\n` or `\r`).
    pub fn line_separator(mut self, value: impl Into<String>) -> Self {
        self.line_separator = Some(value.into());
        self
    }

    /// Validates the options and builds the configuration.
    pub fn build(self) -> Result<FormattingConfig> {
        let defaults = FormattingConfig::default();

        let encoding = self.encoding.unwrap_or(defaults.encoding);
        if encoding.trim().is_empty() {
            return Err(Error::Configuration("encoding must not be empty".into()));
        }
        let output_encoding = OutputEncoding::from_label(&encoding).ok_or_else(|| {
            Error::Configuration(format!("unsupported encoding: {}", encoding))
        })?;

        let indent_spaces_number = match self.indent_spaces_number {
            Some(n) => usize::try_from(n).map_err(|_| {
                Error::Configuration(format!("indent spaces number cannot be negative: {}", n))
            })?,
            None => defaults.indent_spaces_number,
        };

        let line_separator = self.line_separator.unwrap_or(defaults.line_separator);
        if !matches!(line_separator.as_str(), "\n" | "\r\n" | "\r") {
            return Err(Error::Configuration(format!(
                "line separator must be one of \\n, \\r\\n or \\r, got {:?}",
                line_separator
            )));
        }

        Ok(FormattingConfig {
            encoding,
            output_encoding,
            format_schema_location: self
                .format_schema_location
                .unwrap_or(defaults.format_schema_location),
            indent_schema_location: self
                .indent_schema_location
                .unwrap_or(defaults.indent_schema_location),
            indent_spaces_number,
            keep_blank_lines: self.keep_blank_lines.unwrap_or(defaults.keep_blank_lines),
            line_separator,
        })
    }
}
