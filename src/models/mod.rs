//! Data models and types used throughout netota

pub mod firmware;
pub mod outcome;

pub use firmware::*;
pub use outcome::*;
