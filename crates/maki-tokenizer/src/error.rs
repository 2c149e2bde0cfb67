//! Error types for grammar construction and tokenizer configuration
//!
//! Tokenizing itself never fails: text that no rule matches is emitted as a
//! literal run. Everything here is raised before any input is scanned.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer crates
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// A rule's regular expression (or its lookahead guard) does not compile
    #[error("Invalid pattern #{index} for token '{token}' (`{pattern}`): {source}")]
    InvalidPattern {
        token: String,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A rule refers to a capture group its regular expression does not define
    #[error(
        "Pattern #{index} for token '{token}' uses capture group {group}, but only {available} are defined"
    )]
    InvalidCaptureGroup {
        token: String,
        index: usize,
        group: usize,
        available: usize,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No grammar is registered under the requested language name
    #[error("Unknown language '{name}'")]
    UnknownLanguage { name: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    Config,
    Io,
    Lookup,
}

impl TokenizerError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenizerError::InvalidPattern { .. } => ErrorKind::Grammar,
            TokenizerError::InvalidCaptureGroup { .. } => ErrorKind::Grammar,
            TokenizerError::ConfigError { .. } => ErrorKind::Config,
            TokenizerError::IoError { .. } => ErrorKind::Io,
            TokenizerError::UnknownLanguage { .. } => ErrorKind::Lookup,
        }
    }

    /// Check if this error is recoverable (the caller can fall back to defaults)
    ///
    /// A broken grammar is a defect in the rule table and never recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Config | ErrorKind::Lookup)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an unknown language error
    pub fn unknown_language(name: impl Into<String>) -> Self {
        Self::UnknownLanguage { name: name.into() }
    }
}
