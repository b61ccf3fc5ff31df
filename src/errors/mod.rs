//! Error types for netota

pub mod types;

pub use types::*;
