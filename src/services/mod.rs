//! Services
//!
//! Business logic services for the gateway.
//! Services handle the core functionality and are called by commands.

pub mod agents;
pub mod gateway;
pub mod session_store;

pub use agents::{AgentRunner, AnalysisBackend, RunnerConfig};
pub use gateway::{analysis_frames, sse_event};
pub use session_store::{new_session_id, SessionStore};
