//! Runs sync, upload and reset in that order
//!
//! Each phase only runs when its endpoint is configured. Sync and upload
//! failures stop the run; reset failures never do.

use std::sync::Arc;

use super::{ResetService, SyncPolicy, SyncService, UploadService};
use crate::config::UploadConfig;
use crate::errors::{OtaError, Result};
use crate::models::RunReport;
use crate::transport::{ConsoleProgress, NoopObserver, TransferObserver, Transport};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub struct Orchestrator<'a> {
    config: &'a UploadConfig,
    transport: Arc<dyn Transport>,
    sync_policy: SyncPolicy,
    observer: Arc<dyn TransferObserver>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a UploadConfig, transport: Arc<dyn Transport>) -> Self {
        let observer: Arc<dyn TransferObserver> = if config.verbose {
            Arc::new(ConsoleProgress)
        } else {
            Arc::new(NoopObserver)
        };

        Self {
            config,
            transport,
            sync_policy: SyncPolicy::default(),
            observer,
        }
    }

    pub fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Replace the observer that receives upload progress events
    pub fn with_progress_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();
        let transport = self.transport.as_ref();

        if !self.config.has_any_phase() {
            log::info!("No sync, upload or reset endpoint configured, nothing to do");
            return Ok(report);
        }

        if let Some(endpoint) = &self.config.sync_endpoint {
            let service = SyncService::new(self.config, transport, self.sync_policy);
            report.sync = Some(service.run(endpoint).await?);
        }

        if let Some(endpoint) = &self.config.upload_endpoint {
            let sketch = self.config.sketch.as_deref().ok_or_else(|| {
                OtaError::Config("An upload endpoint was given without a sketch path".to_string())
            })?;
            let service = UploadService::new(self.config, transport, self.observer.clone());
            report.transfer = Some(service.run(endpoint, sketch).await?);
        }

        if let Some(endpoint) = &self.config.reset_endpoint {
            let service = ResetService::new(self.config, transport);
            report.reset = Some(service.run(endpoint).await?);
        }

        Ok(report)
    }
}

/// Process exit status for the outcome of a run
pub fn exit_code<E>(result: &std::result::Result<RunReport, E>) -> u8 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
