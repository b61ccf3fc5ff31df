//! Sync handshake: put the board into update mode and wait for it

use std::sync::Arc;
use std::time::Duration;

use crate::config::UploadConfig;
use crate::errors::{OtaError, Phase, Result};
use crate::models::SyncOutcome;
use crate::transport::{HttpRequest, NoopObserver, Transport};

pub const SYNC_POLL_ATTEMPTS: u32 = 10;
pub const SYNC_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long to wait for the board to report it is ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            max_attempts: SYNC_POLL_ATTEMPTS,
            interval: SYNC_POLL_INTERVAL,
        }
    }
}

pub struct SyncService<'a> {
    config: &'a UploadConfig,
    transport: &'a dyn Transport,
    policy: SyncPolicy,
}

impl<'a> SyncService<'a> {
    pub fn new(config: &'a UploadConfig, transport: &'a dyn Transport, policy: SyncPolicy) -> Self {
        Self {
            config,
            transport,
            policy,
        }
    }

    /// POST to the sync endpoint, then poll it until the marker shows up.
    ///
    /// Running out of attempts is not an error: the outcome is returned with
    /// `acknowledged == false` and the upload goes ahead.
    pub async fn run(&self, endpoint: &str) -> Result<SyncOutcome> {
        let url = self.config.endpoint_url(endpoint)?;
        let expectation = &self.config.sync_expectation;

        if self.config.verbose {
            println!("🔄 Resetting the board");
        }

        let response = self
            .transport
            .execute(HttpRequest::post_empty(url.clone()), Arc::new(NoopObserver))
            .await
            .map_err(|source| OtaError::Transport {
                phase: Phase::Sync,
                source,
            })?;

        if response.status != expectation.status {
            return Err(OtaError::SyncRejected {
                expected: expectation.status,
                actual: response.status,
            });
        }

        if self.config.verbose {
            println!("⏳ Waiting for the upload to start");
        }

        let mut outcome = SyncOutcome {
            acknowledged: false,
            attempts: 0,
            body: String::new(),
        };

        while outcome.attempts < self.policy.max_attempts {
            if outcome.attempts > 0 {
                tokio::time::sleep(self.policy.interval).await;
            }

            let response = self
                .transport
                .execute(HttpRequest::get(url.clone()), Arc::new(NoopObserver))
                .await
                .map_err(|source| OtaError::Transport {
                    phase: Phase::Sync,
                    source,
                })?;
            outcome.attempts += 1;
            outcome.body = response.body;

            if outcome.body.contains(&expectation.marker) {
                println!("{}", outcome.body);
                outcome.acknowledged = true;
                return Ok(outcome);
            }

            log::debug!(
                "Sync poll {}/{}: '{}' not in response yet",
                outcome.attempts,
                self.policy.max_attempts,
                expectation.marker
            );
        }

        log::debug!(
            "Board never answered with '{}' after {} attempts, continuing anyway",
            expectation.marker,
            outcome.attempts
        );
        Ok(outcome)
    }
}
