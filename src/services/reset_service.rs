//! Reset request sent after the upload

use std::sync::Arc;

use crate::config::UploadConfig;
use crate::errors::Result;
use crate::models::ResetOutcome;
use crate::transport::{HttpRequest, NoopObserver, Transport};

pub struct ResetService<'a> {
    config: &'a UploadConfig,
    transport: &'a dyn Transport,
}

impl<'a> ResetService<'a> {
    pub fn new(config: &'a UploadConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    /// Ask the board to reboot.
    ///
    /// The firmware is already on the board at this point, so a network error
    /// only downgrades the outcome to [`ResetOutcome::ManualResetRequired`].
    pub async fn run(&self, endpoint: &str) -> Result<ResetOutcome> {
        let url = self.config.endpoint_url(endpoint)?;

        if self.config.verbose {
            println!("🔄 Resetting the board");
        }

        match self
            .transport
            .execute(HttpRequest::post_empty(url), Arc::new(NoopObserver))
            .await
        {
            Ok(response) => {
                log::debug!("Reset answered with status {}", response.status);
                Ok(ResetOutcome::Requested {
                    status: response.status,
                })
            }
            Err(e) => {
                if self.config.verbose {
                    println!("⚠️ Failed to reset the board, please reset manually");
                }
                log::debug!("Reset request failed: {}", e);
                Ok(ResetOutcome::ManualResetRequired {
                    reason: e.to_string(),
                })
            }
        }
    }
}
