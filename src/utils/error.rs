//! Custom error types for esp-certkit
//!
//! Each variant carries enough context (path, expected vs. found marker) for an
//! operator to fix the input by hand. Anything not listed here travels as an
//! `anyhow::Error` and is treated as unexpected at the entry point.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for esp-certkit operations
#[derive(Error, Debug)]
pub enum CertKitError {
    #[error("File not found: {path}")]
    MissingInputFile { path: PathBuf },

    #[error("{source_name} is not valid UTF-8 (invalid byte at offset {offset})")]
    EncodingError { source_name: String, offset: usize },

    #[error("Expected content to start with {expected}, found: {found:?}")]
    MissingBeginMarker { expected: String, found: String },

    #[error("{kind} must end with a {expected} line (truncated artifact?)")]
    MissingEndMarker { kind: String, expected: String },

    #[error("{tool} failed while trying to {step}: {stderr}")]
    ExternalToolFailure {
        tool: String,
        step: String,
        stderr: String,
    },

    #[error("Operation cancelled")]
    UserCancelled,

    #[error("Failed to read {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CertKitError {
    /// Build an `EncodingError` from a failed UTF-8 decode
    pub fn encoding(source_name: impl Into<String>, err: &std::str::Utf8Error) -> Self {
        CertKitError::EncodingError {
            source_name: source_name.into(),
            offset: err.valid_up_to(),
        }
    }

    /// Attach the name of the input an `EncodingError` came from.
    ///
    /// The pure normalizer does not know where its bytes were read from, so
    /// callers relabel the error once they do. Other variants pass through.
    pub fn for_source(self, name: impl Into<String>) -> Self {
        match self {
            CertKitError::EncodingError { offset, .. } => CertKitError::EncodingError {
                source_name: name.into(),
                offset,
            },
            other => other,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using CertKitError
pub type Result<T> = std::result::Result<T, CertKitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_reports_offset() {
        let bytes = [b'a', b'b', 0xff, b'c'];
        let err = std::str::from_utf8(&bytes).unwrap_err();
        let e = CertKitError::encoding("server.crt", &err);
        assert_eq!(
            e.to_string(),
            "server.crt is not valid UTF-8 (invalid byte at offset 2)"
        );
    }

    #[test]
    fn test_for_source_relabels_encoding_errors_only() {
        let e = CertKitError::EncodingError {
            source_name: "input".to_string(),
            offset: 7,
        }
        .for_source("data/server.key");
        assert!(e.to_string().starts_with("data/server.key is not valid UTF-8"));

        let e = CertKitError::UserCancelled.for_source("data/server.key");
        assert!(matches!(e, CertKitError::UserCancelled));
    }

    #[test]
    fn test_missing_end_marker_message() {
        let e = CertKitError::MissingEndMarker {
            kind: "Certificate".to_string(),
            expected: "-----END CERTIFICATE-----".to_string(),
        };
        assert!(e.to_string().contains("-----END CERTIFICATE-----"));
    }
}
