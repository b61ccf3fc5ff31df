//! Custom error types for netota

use std::fmt;
use std::path::PathBuf;

use crate::transport::TransportError;

/// Upload phase an error originated in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sync,
    Upload,
    Reset,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Sync => write!(f, "sync"),
            Phase::Upload => write!(f, "upload"),
            Phase::Reset => write!(f, "reset"),
        }
    }
}

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid or inconsistent command line configuration
    Configuration,
    /// DNS, connect, timeout or send failure
    TransportFailure,
    /// Unexpected status code or response content
    ProtocolFailure,
    /// Local file or socket problem
    LocalIoFailure,
}

/// Main error type for netota operations
#[derive(Debug)]
pub enum OtaError {
    /// Configuration could not be resolved
    Config(String),
    /// The firmware image could not be read
    FileOpen { path: PathBuf, source: std::io::Error },
    /// The request URL or headers could not be built
    RequestBuild(String),
    /// The request never produced a response
    Transport { phase: Phase, source: TransportError },
    /// The sync POST answered with an unexpected status
    SyncRejected { expected: u16, actual: u16 },
    /// The board refused the firmware
    RemoteRejection { status: u16, body: String },
    /// The self-serve file server could not be started
    FileServer(String),
    /// No local interface shares a subnet with the board
    LocalAddressNotFound(String),
}

impl OtaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OtaError::Config(_) => ErrorCategory::Configuration,
            OtaError::RequestBuild(_) => ErrorCategory::Configuration,
            OtaError::Transport { .. } => ErrorCategory::TransportFailure,
            OtaError::SyncRejected { .. } | OtaError::RemoteRejection { .. } => {
                ErrorCategory::ProtocolFailure
            }
            OtaError::FileOpen { .. }
            | OtaError::FileServer(_)
            | OtaError::LocalAddressNotFound(_) => ErrorCategory::LocalIoFailure,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            OtaError::Transport { phase, .. } => Some(*phase),
            OtaError::SyncRejected { .. } => Some(Phase::Sync),
            OtaError::FileOpen { .. }
            | OtaError::RemoteRejection { .. }
            | OtaError::FileServer(_)
            | OtaError::LocalAddressNotFound(_) => Some(Phase::Upload),
            OtaError::Config(_) | OtaError::RequestBuild(_) => None,
        }
    }
}

impl fmt::Display for OtaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtaError::Config(msg) => write!(f, "Configuration error: {}", msg),
            OtaError::FileOpen { path, source } => {
                write!(f, "Failed to open the sketch {}: {}", path.display(), source)
            }
            OtaError::RequestBuild(msg) => write!(f, "Failed to build request: {}", msg),
            OtaError::Transport { phase, source } => {
                write!(f, "Network error during {}: {}", phase, source)
            }
            OtaError::SyncRejected { expected, actual } => write!(
                f,
                "Board answered sync with status {} (expected {})",
                actual, expected
            ),
            OtaError::RemoteRejection { status, body } => {
                write!(f, "Error flashing the sketch ({}): {}", status, body)
            }
            OtaError::FileServer(msg) => write!(f, "File server error: {}", msg),
            OtaError::LocalAddressNotFound(target) => write!(
                f,
                "No local network interface shares a subnet with {}",
                target
            ),
        }
    }
}

impl std::error::Error for OtaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OtaError::FileOpen { source, .. } => Some(source),
            OtaError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<url::ParseError> for OtaError {
    fn from(err: url::ParseError) -> Self {
        OtaError::RequestBuild(err.to_string())
    }
}

/// Result type alias for netota operations
pub type Result<T> = std::result::Result<T, OtaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportErrorKind;

    #[test]
    fn test_remote_rejection_message_carries_body() {
        let err = OtaError::RemoteRejection {
            status: 404,
            body: "endpoint not found".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("endpoint not found"));
        assert_eq!(err.category(), ErrorCategory::ProtocolFailure);
    }

    #[test]
    fn test_transport_error_keeps_phase() {
        let err = OtaError::Transport {
            phase: Phase::Sync,
            source: TransportError::new(TransportErrorKind::Connect, "connection refused"),
        };
        assert_eq!(err.phase(), Some(Phase::Sync));
        assert_eq!(err.category(), ErrorCategory::TransportFailure);
        assert!(std::error::Error::source(&err).is_some());
    }
}
