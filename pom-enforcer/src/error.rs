//! Error types for the enforcer.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for enforcer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while enforcing project files.
///
/// Rule violations are not errors: they are returned as values by the rules
/// and the processor.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not well-formed XML.
    #[error("malformed document{}: {message}", location(.path))]
    MalformedDocument {
        /// File the document was read from, when known.
        path: Option<PathBuf>,
        /// Parser diagnostic.
        message: String,
    },

    /// Reading or writing a project file failed.
    #[error("failed to process {}: {source}", .path.display())]
    Processing {
        /// File being processed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value or unusable template.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// I/O error while writing serialized output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a malformed-document error with no file attached yet.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDocument {
            path: None,
            message: message.into(),
        }
    }

    /// Attaches the file identity to errors that do not carry one yet.
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            Error::MalformedDocument { path: None, message } => Error::MalformedDocument {
                path: Some(file.to_path_buf()),
                message,
            },
            Error::Io(source) => Error::Processing {
                path: file.to_path_buf(),
                source,
            },
            other => other,
        }
    }

    /// Returns the file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::MalformedDocument { path, .. } => path.as_deref(),
            Error::Processing { path, .. } => Some(path),
            Error::Configuration(_) | Error::Io(_) => None,
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" {}", path.display()),
        None => String::new(),
    }
}
