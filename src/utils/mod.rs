//! Utility functions and helpers used throughout netota

pub mod logging;
pub mod network;
