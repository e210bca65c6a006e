//! Core Data Model
//!
//! The handful of values that flow through the pipeline: discovered source
//! files, structured annotations, and summary index entries.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One source file discovered by the enumerator.
///
/// Immutable once scanned; the pipeline re-reads content from `path` but
/// never mutates the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Location on disk
    pub path: PathBuf,
    /// Path relative to the configured source root
    pub rel: PathBuf,
}

impl SourceFile {
    /// Forward-slash form of the relative path, as written into front
    /// matter and the failure log.
    pub fn rel_display(&self) -> String {
        self.rel.to_string_lossy().replace('\\', "/")
    }
}

/// Structured annotation returned by the service: a short summary plus
/// suggested docstrings for the file's classes and functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub summary: String,
    pub docstrings: Vec<String>,
}

/// One element of the summary index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexEntry {
    pub file: String,
    pub chunk: String,
    pub pattern: String,
    pub summary: String,
}
