//! Validate Command
//!
//! Re-checks existing chunks for the required sections and reports what is
//! missing, without touching any file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::output::Output;
use crate::pipeline::validate_chunk;
use crate::types::{ChunkError, Result};

/// Returns `true` when every chunk in the directory is well-formed.
pub fn run(chunks: &Path) -> Result<bool> {
    if !chunks.is_dir() {
        return Err(ChunkError::NotFound(chunks.to_path_buf()));
    }

    let mut chunk_files: Vec<PathBuf> = fs::read_dir(chunks)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md")
        })
        .collect();
    chunk_files.sort();

    let out = Output::new();
    if chunk_files.is_empty() {
        out.info(&format!("no chunks found in {}", chunks.display()));
        return Ok(true);
    }

    let mut invalid = 0usize;
    for path in &chunk_files {
        let missing = validate_chunk(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if missing.is_empty() {
            out.success(&name);
        } else {
            let missing = missing
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            out.error(&format!("{} (missing: {})", name, missing));
            invalid += 1;
        }
    }

    println!();
    if invalid == 0 {
        out.success(&format!("{} chunk(s) valid", chunk_files.len()));
    } else {
        out.warning(&format!(
            "{} of {} chunk(s) invalid",
            invalid,
            chunk_files.len()
        ));
    }

    Ok(invalid == 0)
}
