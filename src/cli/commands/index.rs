//! Index Command
//!
//! Rebuilds the summary index from an existing chunk directory.

use std::path::Path;

use crate::cli::output::Output;
use crate::indexer;
use crate::types::Result;

pub fn run(chunks: &Path, output: &Path) -> Result<()> {
    let entries = indexer::build_index(chunks)?;
    indexer::write_index(&entries, output)?;

    Output::new().success(&format!(
        "summary index saved to: {} ({} entries)",
        output.display(),
        entries.len()
    ));
    Ok(())
}
