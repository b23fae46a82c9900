//! Data Models
//!
//! Contains the server-side data structures. Wire types shared with clients
//! live in `spend_arena_core`.

pub mod demo;
pub mod session;
pub mod settings;

pub use demo::*;
pub use session::*;
pub use settings::*;
