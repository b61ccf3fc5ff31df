//! Configuration management for netota

pub mod upload_config;

pub use upload_config::*;
