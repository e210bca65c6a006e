//! Config Command
//!
//! Manage chunkmill configuration.
//!
//! Usage:
//!   chunkmill config show
//!   chunkmill config path
//!   chunkmill config init [--force]

use crate::cli::output::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(config: &Config) -> Result<()> {
    ConfigLoader::show_config(config)
}

/// Show configuration file paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default project config file
pub fn init(force: bool) -> Result<()> {
    let path = ConfigLoader::init_project(force)?;
    Output::new().success(&format!("wrote {}", path.display()));
    Ok(())
}
