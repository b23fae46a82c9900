//! Spend Arena Core
//!
//! Agent types, wire event types, and the pure per-agent state reducer shared
//! by the gateway server and the stream client. This crate has no knowledge of
//! HTTP, async runtimes, or storage.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `agent` - `AgentType`, `AgentState`, `Recommendation`, `AgentResult`
//! - `streaming` - Wire payloads (`AgentEvent`, `StreamFrame`)
//! - `reducer` - Pure `apply` / `apply_transport_error` transitions
//! - `board` - `ArenaBoard`, the per-session container of all three states
//! - `session` - Session collaborator DTOs (summary, listing, votes)

pub mod agent;
pub mod board;
pub mod error;
mod lenient;
pub mod reducer;
pub mod session;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Agent Model ────────────────────────────────────────────────────────
pub use agent::{
    AgentResult, AgentState, AgentStatus, AgentType, DegradedNotice, Recommendation, RiskLevel,
};

// ── Streaming Types ────────────────────────────────────────────────────
pub use streaming::{AgentEvent, AgentUpdate, StreamFrame, DATA_PREFIX};

// ── Session DTOs ───────────────────────────────────────────────────────
pub use session::{
    DataSummary, DemoSession, HealthStatus, SessionInfo, SessionsResponse, VoteRequest, VoteTally,
    VotesResponse,
};

// ── Reducer & Board ────────────────────────────────────────────────────
pub use board::{ArenaBoard, StreamPhase};
pub use reducer::{apply, apply_transport_error};
