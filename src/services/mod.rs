//! The three upload phases and the orchestrator running them in order

pub mod orchestrator;
pub mod reset_service;
pub mod sync_service;
pub mod upload_service;

pub use orchestrator::*;
pub use reset_service::*;
pub use sync_service::*;
pub use upload_service::*;
