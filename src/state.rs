//! Application State
//!
//! Shared state handed to every route handler.

use std::sync::Arc;

use crate::models::settings::AppConfig;
use crate::services::agents::{backend_from_config, AgentRunner, RunnerConfig};
use crate::services::session_store::SessionStore;
use crate::utils::error::{AppError, AppResult};

/// Gateway state, cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
    pub runner: Arc<AgentRunner>,
}

impl AppState {
    /// Build all services from a validated configuration.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::config)?;
        let backend = backend_from_config(&config)?;
        let runner = AgentRunner::new(backend, RunnerConfig::from_app_config(&config));

        tracing::info!(
            backend = runner.backend_name(),
            max_sessions = config.max_sessions,
            "Application state initialized"
        );

        Ok(Self {
            sessions: Arc::new(SessionStore::new(config.max_sessions)),
            runner: Arc::new(runner),
            config: Arc::new(config),
        })
    }

    /// Whether agents serve canned results.
    pub fn is_mock(&self) -> bool {
        !self.config.uses_live_backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let state = AppState::from_config(AppConfig::default()).unwrap();
        assert!(state.is_mock());
        assert_eq!(state.runner.backend_name(), "mock");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AppConfig {
            max_sessions: 0,
            ..Default::default()
        };
        assert!(matches!(
            AppState::from_config(config),
            Err(AppError::Config(_))
        ));
    }
}
