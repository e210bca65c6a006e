//! Unified Error Type System
//!
//! Single error enum for the whole pipeline.
//!
//! ## Containment policy
//!
//! Per-file conditions (`Parse`, `Service`, `Format`) stay inside that
//! file's retry loop and never abort the batch. Everything else is fatal
//! to the stage that raised it: `InvalidInput` and `NotFound` at startup,
//! `Io`/`Json` wherever the filesystem or serialization fails.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Startup Errors
    // -------------------------------------------------------------------------
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Per-File Errors
    // -------------------------------------------------------------------------
    /// Source could not be decomposed into declarations; the file is skipped.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// The annotation call itself failed (transport, service down).
    #[error("annotation service error: {0}")]
    Service(String),

    /// The annotation reply lacked the required shape (bad JSON, missing keys).
    #[error("annotation format error: {0}")]
    Format(String),
}

impl ChunkError {
    /// Create a parse error for a source file
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an annotation service error
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }

    /// Create an annotation format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Whether this error counts as one failed annotation attempt,
    /// consumed by the retry loop rather than propagated.
    pub fn is_attempt_failure(&self) -> bool {
        matches!(self, Self::Service(_) | Self::Format(_))
    }
}

pub type Result<T> = std::result::Result<T, ChunkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_failures_are_retried() {
        assert!(ChunkError::service("connection refused").is_attempt_failure());
        assert!(ChunkError::format("no JSON object").is_attempt_failure());
    }

    #[test]
    fn test_fatal_errors_are_not_retried() {
        assert!(!ChunkError::InvalidInput("bad extension".into()).is_attempt_failure());
        assert!(!ChunkError::NotFound(PathBuf::from("/missing")).is_attempt_failure());
        assert!(!ChunkError::Config("zero timeout".into()).is_attempt_failure());
        assert!(!ChunkError::parse("a.py", "invalid syntax").is_attempt_failure());
    }

    #[test]
    fn test_display_includes_path() {
        let err = ChunkError::parse("patterns/bad.py", "invalid syntax");
        assert_eq!(
            err.to_string(),
            "parse error in patterns/bad.py: invalid syntax"
        );
    }
}
