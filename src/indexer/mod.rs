//! Summary Index Builder
//!
//! Full rebuild over the chunk directory: one `IndexEntry` per `*.md` file,
//! assembled from front matter and the `## Summary` body. The index file is
//! overwritten wholesale each run and reflects exactly the directory's
//! current contents.

use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use tracing::info;

use crate::types::{ChunkError, IndexEntry, Result};

static SUMMARY_BEFORE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)## Summary\n(.+?)\n## ").expect("valid regex"));
static SUMMARY_TO_EOF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)## Summary\n(.+)$").expect("valid regex"));

/// Front matter: `key: value` lines between the first two `---` delimiters.
pub fn parse_front_matter(text: &str) -> HashMap<String, String> {
    let mut front = HashMap::new();
    if !text.starts_with("---") {
        return front;
    }
    for line in text.lines().skip(1) {
        if line.trim() == "---" {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            front.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    front
}

/// Body of the `## Summary` section, up to the next heading or end of file.
pub fn extract_summary(text: &str) -> String {
    if let Some(captures) = SUMMARY_BEFORE_HEADING_RE.captures(text) {
        return captures[1].trim().to_string();
    }
    if let Some(captures) = SUMMARY_TO_EOF_RE.captures(text) {
        return captures[1].trim().to_string();
    }
    String::new()
}

/// Title-cased, underscore-to-space fallback for a missing pattern tag,
/// e.g. `global_object` -> `Global Object`.
fn pattern_from_stem(stem: &str) -> String {
    stem.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build one entry per `*.md` chunk in `chunk_dir`, sorted by file name.
pub fn build_index(chunk_dir: &Path) -> Result<Vec<IndexEntry>> {
    if !chunk_dir.is_dir() {
        return Err(ChunkError::NotFound(chunk_dir.to_path_buf()));
    }

    let mut chunk_files: Vec<PathBuf> = fs::read_dir(chunk_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md")
        })
        .collect();
    chunk_files.sort();

    let mut index = Vec::with_capacity(chunk_files.len());
    for path in chunk_files {
        let text = fs::read_to_string(&path)?;
        let front = parse_front_matter(&text);
        let summary = extract_summary(&text);

        let chunk_file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let chunk_stem = path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let file = front
            .get("file")
            .cloned()
            .unwrap_or_else(|| chunk_file_name.clone());
        let chunk = front
            .get("chunk")
            .cloned()
            .unwrap_or_else(|| chunk_stem.clone());

        let pattern = front
            .get("pattern")
            .cloned()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| {
                let stem = Path::new(&file)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| file.clone());
                pattern_from_stem(&stem)
            });

        index.push(IndexEntry {
            file,
            chunk,
            pattern,
            summary,
        });
    }

    Ok(index)
}

/// Overwrite the index file with the full entry list as a JSON array.
pub fn write_index(entries: &[IndexEntry], output: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(output, content)?;
    info!(
        "summary index saved to: {} ({} entries)",
        output.display(),
        entries.len()
    );
    Ok(())
}
