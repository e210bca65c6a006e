//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/chunkmill/config.toml)
//! 3. Project config (.chunkmill/config.toml)
//! 4. Environment variables (CHUNKMILL_* prefix, `__` section separator)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{ChunkError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. CHUNKMILL_LLM__MODEL -> llm.model, CHUNKMILL_PIPELINE__MAX_RETRIES -> pipeline.max_retries
        figment = figment.merge(Env::prefixed("CHUNKMILL_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ChunkError::Config(format!("configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ChunkError::Config(format!("configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/chunkmill/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("chunkmill"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".chunkmill/config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render a configuration as TOML to stdout
    pub fn show_config(config: &Config) -> Result<()> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ChunkError::Config(format!("failed to render config: {}", e)))?;
        println!("{}", content);
        Ok(())
    }

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Write a default project config, refusing to overwrite without `force`
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let path = Self::project_config_path();
        if path.exists() && !force {
            return Err(ChunkError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| ChunkError::Config(format!("failed to render config: {}", e)))?;
        fs::write(&path, content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_from_file_merges_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[llm]
model = "codellama:latest"

[pipeline]
max_retries = 5
"#,
        )
        .expect("write config");

        let config = ConfigLoader::load_from_file(&path).expect("load");
        assert_eq!(config.llm.model, "codellama:latest");
        assert_eq!(config.pipeline.max_retries, 5);
        // untouched sections keep their defaults
        assert_eq!(config.llm.api_base, "http://localhost:11434");
        assert_eq!(config.output.chunks_dir, PathBuf::from("chunks"));
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[pipeline]\nmax_retries = 0\n").expect("write config");

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
