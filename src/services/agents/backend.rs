//! Analysis Backend
//!
//! The seam between the agent runner and whatever produces the final
//! recommendations for an agent.

use std::sync::Arc;

use async_trait::async_trait;
use spend_arena_core::{AgentResult, AgentType, DataSummary};

use super::mock::MockBackend;
use super::openai::{OpenAiBackend, OpenAiConfig};
use crate::models::settings::AppConfig;
use crate::utils::error::AppResult;

/// Produces one agent's final analysis.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether results are canned rather than computed.
    fn is_mock(&self) -> bool {
        false
    }

    /// Analyse `summary` in the style of `agent`. `preferences` is the
    /// session's preference context and may be empty.
    async fn analyze(
        &self,
        agent: AgentType,
        summary: &DataSummary,
        preferences: &str,
    ) -> AppResult<AgentResult>;
}

/// Pick the backend the configuration asks for.
pub fn backend_from_config(config: &AppConfig) -> AppResult<Arc<dyn AnalysisBackend>> {
    if !config.uses_live_backend() {
        if !config.mock_agents {
            tracing::warn!("No OpenAI API key configured; agents will serve canned results");
        }
        return Ok(Arc::new(MockBackend));
    }
    let backend = OpenAiBackend::new(OpenAiConfig::from_app_config(config)?)?;
    tracing::info!(model = %config.openai_model, "Agents will call the OpenAI backend");
    Ok(Arc::new(backend))
}
