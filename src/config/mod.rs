//! Configuration
//!
//! Layered configuration: defaults → global file → project file → env vars,
//! with CLI flags applied on top by the commands.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{Config, LlmConfig, OutputConfig, PipelineConfig, SourceConfig};
