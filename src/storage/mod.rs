//! Storage Layer
//!
//! Configuration loading.

pub mod config;

pub use config::*;
