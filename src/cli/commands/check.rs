//! Check Command
//!
//! Probes the annotation service: is the endpoint reachable, and is the
//! configured model available.

use tokio::runtime::Runtime;

use crate::ai::{ServiceConfig, create_service};
use crate::cli::output::Output;
use crate::config::Config;
use crate::types::Result;

/// Returns `true` when the service is reachable and the model is available.
pub fn run(config: &Config, model: Option<String>) -> Result<bool> {
    let mut service_config = ServiceConfig::from(&config.llm);
    if let Some(model) = model {
        service_config.model = model;
    }

    let service = create_service(&service_config)?;
    let out = Output::new();
    out.info(&format!(
        "checking {} at {} (model: {})",
        service.name(),
        service_config.api_base,
        service.model()
    ));

    let rt = Runtime::new()?;
    let available = rt.block_on(service.health_check())?;

    if available {
        out.success("annotation service is ready");
    } else {
        out.error("annotation service is not available");
    }

    Ok(available)
}
