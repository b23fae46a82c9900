//! Utilities
//!
//! Common utilities used throughout the application.

pub mod error;
pub mod format;

pub use error::*;
