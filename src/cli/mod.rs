//! Command Line Interface module
//!
//! Parses the flags, resolves them into an [`UploadConfig`] and hands that to
//! the orchestrator.

pub mod args;

pub use args::*;

use anyhow::Result;
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::models::RunReport;
use crate::services::Orchestrator;
use crate::transport::HttpTransport;

/// Main CLI application runner
pub async fn run(cli: &Cli) -> Result<RunReport> {
    let config = UploadConfig::from_cli(cli)?;
    log::debug!("Resolved configuration: {:?}", config);

    let transport = HttpTransport::new(config.timeout)?;
    let orchestrator = Orchestrator::new(&config, Arc::new(transport));
    let report = orchestrator.run().await?;
    Ok(report)
}
