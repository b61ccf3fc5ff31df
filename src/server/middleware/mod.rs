//! Middleware for the sketch file server

pub mod logging;
