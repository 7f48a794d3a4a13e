//! Error types for lakekit.
//!
//! Library crates use [`LakeKitError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all lakekit operations.
///
/// Per-record conditions (ineligible, already enriched) are not errors; they
/// are reported through [`crate::RecordStatus`].
#[derive(Debug, thiserror::Error)]
pub enum LakeKitError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The record-sequence document could not be decoded or re-encoded.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A text-block document violates the record layout preconditions
    /// (unbalanced delimiters, nested record headers).
    #[error("layout error: {message}")]
    Layout { message: String },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LakeKitError>;

impl LakeKitError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Create a layout error from any displayable message.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LakeKitError::config("missing input path");
        assert_eq!(err.to_string(), "config error: missing input path");

        let err = LakeKitError::layout("record \"Bodensee\" is never closed");
        assert!(err.to_string().starts_with("layout error:"));
        assert!(err.to_string().contains("Bodensee"));
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = LakeKitError::io("/tmp/lakes.json", source);
        assert!(err.to_string().contains("/tmp/lakes.json"));
        assert!(err.to_string().contains("gone"));
    }
}
