//! Embedded HTTP server publishing the sketch for self-serve uploads

pub mod file_server;
pub mod middleware;

pub use file_server::*;
