//! JSON Configuration Management
//!
//! Loads the server configuration: defaults, then an optional JSON file,
//! then environment variable overrides.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};

pub const ENV_BIND: &str = "ARENA_BIND";
pub const ENV_MOCK_AGENTS: &str = "MOCK_AGENTS";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_TEMPERATURE: &str = "OPENAI_TEMPERATURE";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";
pub const ENV_MAX_SESSIONS: &str = "MAX_SESSIONS";
pub const ENV_STEP_BASE_DELAY_MS: &str = "THINKING_STEP_BASE_DELAY_MS";
pub const ENV_STEP_JITTER_MS: &str = "THINKING_STEP_JITTER_MS";
pub const ENV_AGENT_TIMEOUT_SECS: &str = "AGENT_TIMEOUT_SECS";

/// Configuration service for the server settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    config: AppConfig,
}

impl ConfigService {
    /// Load from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load from `path` (if given) with overrides from `lookup`.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => AppConfig::default(),
        };
        apply_env_overrides(&mut config, lookup)?;
        config.validate().map_err(AppError::config)?;

        tracing::debug!(
            path = ?path,
            mock_agents = config.mock_agents,
            live_backend = config.uses_live_backend(),
            "Configuration loaded"
        );

        Ok(Self {
            config_path: path.map(Path::to_path_buf),
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a clone of the current configuration
    pub fn get_config_clone(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self {
            config_path: None,
            config: AppConfig::default(),
        }
    }
}

fn parse_env<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::config(format!("{}={:?}: {}", key, raw, e)))
}

/// Overlay environment values onto `config`. Unset variables leave the
/// current value alone.
pub fn apply_env_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppResult<()> {
    if let Some(bind) = lookup(ENV_BIND) {
        config.bind_addr = bind;
    }
    if let Some(raw) = lookup(ENV_MOCK_AGENTS) {
        config.mock_agents = raw.trim().eq_ignore_ascii_case("true");
    }
    if let Some(key) = lookup(ENV_OPENAI_API_KEY) {
        config.openai_api_key = Some(key).filter(|k| !k.trim().is_empty());
    }
    if let Some(model) = lookup(ENV_OPENAI_MODEL) {
        config.openai_model = model;
    }
    if let Some(raw) = lookup(ENV_OPENAI_TEMPERATURE) {
        config.openai_temperature = parse_env(ENV_OPENAI_TEMPERATURE, &raw)?;
    }
    if let Some(url) = lookup(ENV_OPENAI_BASE_URL) {
        config.openai_base_url = url;
    }
    if let Some(raw) = lookup(ENV_CORS_ORIGINS) {
        config.cors_origins = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(raw) = lookup(ENV_MAX_SESSIONS) {
        config.max_sessions = parse_env(ENV_MAX_SESSIONS, &raw)?;
    }
    if let Some(raw) = lookup(ENV_STEP_BASE_DELAY_MS) {
        config.thinking_step_base_delay_ms = parse_env(ENV_STEP_BASE_DELAY_MS, &raw)?;
    }
    if let Some(raw) = lookup(ENV_STEP_JITTER_MS) {
        config.thinking_step_jitter_ms = parse_env(ENV_STEP_JITTER_MS, &raw)?;
    }
    if let Some(raw) = lookup(ENV_AGENT_TIMEOUT_SECS) {
        config.agent_timeout_secs = parse_env(ENV_AGENT_TIMEOUT_SECS, &raw)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let service = ConfigService::load_with(None, env(&[])).unwrap();
        assert_eq!(service.get_config(), &AppConfig::default());
        assert!(service.config_path().is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"max_sessions": 7, "openai_model": "gpt-4o"}"#)
            .unwrap();

        let service = ConfigService::load_with(Some(file.path()), env(&[])).unwrap();
        assert_eq!(service.get_config().max_sessions, 7);
        assert_eq!(service.get_config().openai_model, "gpt-4o");
        assert!(service.get_config().mock_agents);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"max_sessions": 7}"#).unwrap();

        let service = ConfigService::load_with(
            Some(file.path()),
            env(&[
                (ENV_MAX_SESSIONS, "12"),
                (ENV_MOCK_AGENTS, "FALSE"),
                (ENV_OPENAI_API_KEY, "sk-test"),
                (ENV_CORS_ORIGINS, "http://a.test, http://b.test,"),
                (ENV_STEP_BASE_DELAY_MS, "5"),
            ]),
        )
        .unwrap();

        let config = service.into_config();
        assert_eq!(config.max_sessions, 12);
        assert!(!config.mock_agents);
        assert!(config.uses_live_backend());
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.thinking_step_base_delay_ms, 5);
    }

    #[test]
    fn test_mock_agents_only_true_enables() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, env(&[(ENV_MOCK_AGENTS, "yes")])).unwrap();
        assert!(!config.mock_agents);

        apply_env_overrides(&mut config, env(&[(ENV_MOCK_AGENTS, "True")])).unwrap();
        assert!(config.mock_agents);
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        let err = ConfigService::load_with(None, env(&[(ENV_MAX_SESSIONS, "many")])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains(ENV_MAX_SESSIONS)));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"max_sessions": 0}"#).unwrap();
        let err = ConfigService::load_with(Some(file.path()), env(&[])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            ConfigService::load_with(Some(&dir.path().join("absent.json")), env(&[])).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
