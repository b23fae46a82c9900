//! Analysis Agents
//!
//! The three spend-analysis strategies, the backends that produce their
//! results, and the runner that streams their progress.

pub mod backend;
pub mod mock;
pub mod openai;
pub mod runner;
pub mod strategy;

pub use backend::{backend_from_config, AnalysisBackend};
pub use mock::{mock_result, MockBackend};
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use runner::{AgentRunner, RunnerConfig};
