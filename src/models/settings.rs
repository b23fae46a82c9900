//! Settings Models
//!
//! Server configuration data structures.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Server configuration, loaded from an optional `config.json` and then
/// overridden by environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the gateway listens on
    pub bind_addr: String,
    /// Serve canned results instead of calling the model
    pub mock_agents: bool,
    /// OpenAI API key; agents fall back to canned results without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_temperature: f32,
    /// Chat completions endpoint base, e.g. `https://api.openai.com/v1`
    pub openai_base_url: String,
    /// Allowed browser origins
    pub cors_origins: Vec<String>,
    /// Sessions kept in memory before the oldest is evicted
    pub max_sessions: usize,
    /// Fixed part of the delay before each thinking step
    pub thinking_step_base_delay_ms: u64,
    /// Upper bound of the per-step deterministic jitter
    pub thinking_step_jitter_ms: u64,
    /// Deadline for one live analysis call
    pub agent_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            mock_agents: true,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_temperature: 0.7,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            max_sessions: 100,
            thinking_step_base_delay_ms: 800,
            thinking_step_jitter_ms: 1000,
            agent_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Whether the live model backend is usable with this configuration.
    pub fn uses_live_backend(&self) -> bool {
        !self.mock_agents
            && self
                .openai_api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind_addr
            .parse()
            .map_err(|e| format!("Invalid bind address '{}': {}", self.bind_addr, e))
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;

        if !(0.0..=2.0).contains(&self.openai_temperature) {
            return Err(format!(
                "openai_temperature must be within [0, 2], got {}",
                self.openai_temperature
            ));
        }

        if self.openai_model.trim().is_empty() {
            return Err("openai_model cannot be empty".to_string());
        }

        if url::Url::parse(&self.openai_base_url).is_err() {
            return Err(format!(
                "Invalid openai_base_url: {}",
                self.openai_base_url
            ));
        }

        if self.max_sessions == 0 {
            return Err("max_sessions must be at least 1".to_string());
        }

        if self.agent_timeout_secs == 0 {
            return Err("agent_timeout_secs must be at least 1".to_string());
        }

        Ok(())
    }
}
