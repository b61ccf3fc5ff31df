//! netota - over-the-air sketch uploader
//!
//! Delivers firmware to a network-connected board in up to three HTTP phases:
//! an optional sync handshake, the upload itself (pushed in the request body
//! or pulled by the board from an embedded file server) and an optional reset.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod server;
pub mod services;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::UploadConfig;
pub use errors::*;
pub use models::*;
pub use services::{Orchestrator, exit_code};

/// netota version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// netota application name
pub const APP_NAME: &str = "netota";
