//! Per-phase results of an upload run

/// Result of the sync handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Whether a polled body contained the expected marker
    pub acknowledged: bool,
    /// Number of GET polls issued
    pub attempts: u32,
    /// Body of the last poll
    pub body: String,
}

/// Response of the upload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub status: u16,
    pub body: String,
    /// URL the board was told to fetch, in self-serve mode
    pub served_url: Option<String>,
}

impl TransferResult {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The board answered the reset request
    Requested { status: u16 },
    /// The reset request failed; the board has to be reset by hand
    ManualResetRequired { reason: String },
}

/// Outcomes of the phases that ran; `None` means the phase was not configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub sync: Option<SyncOutcome>,
    pub transfer: Option<TransferResult>,
    pub reset: Option<ResetOutcome>,
}

impl RunReport {
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(sync) = &self.sync {
            if !sync.acknowledged {
                warnings.push(format!(
                    "Board did not acknowledge sync after {} attempts",
                    sync.attempts
                ));
            }
        }
        if let Some(ResetOutcome::ManualResetRequired { reason }) = &self.reset {
            warnings.push(format!(
                "Failed to reset the board, please reset manually ({})",
                reason
            ));
        }
        warnings
    }
}
