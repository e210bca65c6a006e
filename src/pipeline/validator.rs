//! Chunk Validator
//!
//! Pure marker checks over a written chunk: a fenced Python code block, a
//! `## Summary` heading, and a `## Docstrings` heading must all be present.

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use crate::types::Result;

static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```python.+?```").expect("valid regex"));
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Summary").expect("valid regex"));
static DOCSTRINGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Docstrings").expect("valid regex"));

/// Required chunk sections, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    CodeBlock,
    Summary,
    Docstrings,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::CodeBlock, Section::Summary, Section::Docstrings];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::CodeBlock => write!(f, "code block"),
            Section::Summary => write!(f, "summary"),
            Section::Docstrings => write!(f, "docstrings"),
        }
    }
}

/// Which required sections are absent from `text`. Empty means well-formed.
pub fn missing_sections(text: &str) -> Vec<Section> {
    let mut missing = Vec::new();
    if !CODE_BLOCK_RE.is_match(text) {
        missing.push(Section::CodeBlock);
    }
    if !SUMMARY_RE.is_match(text) {
        missing.push(Section::Summary);
    }
    if !DOCSTRINGS_RE.is_match(text) {
        missing.push(Section::Docstrings);
    }
    missing
}

/// Read a chunk from disk and report its absent sections.
pub fn validate_chunk(path: &Path) -> Result<Vec<Section>> {
    let text = std::fs::read_to_string(path)?;
    Ok(missing_sections(&text))
}
