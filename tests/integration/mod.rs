//! Integration Tests Module
//!
//! End-to-end tests against a real gateway on an ephemeral port, with mock
//! agents and near-zero thinking delays. Covers the collaborator HTTP API,
//! the event stream as seen by the stream client, the session controller
//! and the terminal watcher.

// Shared gateway harness
mod common;

// Collaborator API through the typed client
mod api_test;

// Stream client against the live gateway
mod stream_test;

// Session controller and board updates
mod controller_test;

// Terminal watcher
mod watch_test;
