//! Agent Runner
//!
//! Runs the three agents concurrently for one analysis request. Each agent
//! reports its thinking steps with a deterministic delay, then asks the
//! analysis backend for the final result. A failed or slow backend call is
//! replaced by the canned result for that agent, flagged as a fallback.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use spend_arena_core::{AgentEvent, AgentResult, AgentType, DataSummary};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::backend::AnalysisBackend;
use super::mock::mock_result;
use super::strategy::{step_progress, thinking_steps};
use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};

/// Buffered events per run before agents wait on the consumer.
const EVENT_BUFFER: usize = 100;

/// Pacing and deadlines of an agent run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub base_delay: Duration,
    pub jitter: Duration,
    pub agent_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl RunnerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.thinking_step_base_delay_ms),
            jitter: Duration::from_millis(config.thinking_step_jitter_ms),
            agent_timeout: config.agent_timeout(),
        }
    }

    /// Delay before `step` of `agent` is reported. Stable for the same pair.
    pub fn step_delay(&self, agent: AgentType, step: &str) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base_delay;
        }
        let mut hasher = DefaultHasher::new();
        agent.as_str().hash(&mut hasher);
        step.hash(&mut hasher);
        self.base_delay + Duration::from_millis(hasher.finish() % jitter_ms)
    }
}

pub struct AgentRunner {
    backend: Arc<dyn AnalysisBackend>,
    config: RunnerConfig,
}

impl AgentRunner {
    pub fn new(backend: Arc<dyn AnalysisBackend>, config: RunnerConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Start all agents on `summary`.
    ///
    /// The receiver yields every agent's events, interleaved, and closes once
    /// all agents have finished or `cancel` fired. An agent task that dies
    /// without reporting produces a gateway error event.
    pub fn run(
        &self,
        summary: DataSummary,
        preferences: String,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<AgentEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let summary = Arc::new(summary);
        let preferences: Arc<str> = preferences.into();

        let tasks: Vec<(AgentType, JoinHandle<()>)> = AgentType::ALL
            .into_iter()
            .map(|agent| {
                let task = AgentTask {
                    agent,
                    backend: self.backend.clone(),
                    config: self.config.clone(),
                    summary: summary.clone(),
                    preferences: preferences.clone(),
                    tx: tx.clone(),
                    cancel: cancel.clone(),
                };
                (agent, tokio::spawn(task.run()))
            })
            .collect();

        tokio::spawn(async move {
            for (agent, handle) in tasks {
                if let Err(err) = handle.await {
                    if err.is_cancelled() {
                        continue;
                    }
                    tracing::error!(agent = %agent, error = %err, "Agent task panicked");
                    let detail = format!("{} agent failed unexpectedly", agent.label());
                    let _ = tx.send(AgentEvent::gateway_error(detail)).await;
                }
            }
        });

        rx
    }
}

struct AgentTask {
    agent: AgentType,
    backend: Arc<dyn AnalysisBackend>,
    config: RunnerConfig,
    summary: Arc<DataSummary>,
    preferences: Arc<str>,
    tx: mpsc::Sender<AgentEvent>,
    cancel: CancellationToken,
}

impl AgentTask {
    async fn run(self) {
        let agent = self.agent;
        let steps = thinking_steps(agent);

        for (index, step) in steps.iter().enumerate() {
            let delay = self.config.step_delay(agent, step);
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!(agent = %agent, "Agent cancelled while thinking");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let event = AgentEvent::thinking(agent, *step, step_progress(index, steps.len()));
            if self.tx.send(event).await.is_err() {
                return;
            }
        }

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(agent = %agent, "Agent cancelled during analysis");
                return;
            }
            outcome = self.analyze() => outcome,
        };

        let event = match outcome {
            Ok(result) => {
                tracing::info!(
                    agent = %agent,
                    backend = self.backend.name(),
                    recommendations = result.recommendations.len(),
                    total_savings = result.total_savings,
                    "Agent complete"
                );
                AgentEvent::complete(result)
            }
            Err(err) => {
                tracing::warn!(
                    agent = %agent,
                    backend = self.backend.name(),
                    error = %err,
                    "Analysis failed; serving fallback results"
                );
                AgentEvent::degraded(mock_result(agent), err.to_string())
            }
        };
        let _ = self.tx.send(event).await;
    }

    async fn analyze(&self) -> AppResult<AgentResult> {
        let call = self
            .backend
            .analyze(self.agent, &self.summary, &self.preferences);
        if self.backend.is_mock() {
            return call.await;
        }
        match tokio::time::timeout(self.config.agent_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AppError::agent(format!(
                "analysis timed out after {}s",
                self.config.agent_timeout.as_secs_f32()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo::demo_summary;
    use crate::services::agents::mock::MockBackend;
    use async_trait::async_trait;
    use spend_arena_core::{ArenaBoard, AgentStatus};

    fn fast() -> RunnerConfig {
        RunnerConfig {
            base_delay: Duration::from_millis(1),
            jitter: Duration::ZERO,
            agent_timeout: Duration::from_millis(100),
        }
    }

    async fn collect(mut rx: mpsc::Receiver<AgentEvent>) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    struct FailingBackend;

    #[async_trait]
    impl AnalysisBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn analyze(&self, _: AgentType, _: &DataSummary, _: &str) -> AppResult<AgentResult> {
            Err(AppError::agent("upstream unavailable"))
        }
    }

    struct SlowBackend;

    #[async_trait]
    impl AnalysisBackend for SlowBackend {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn analyze(&self, agent: AgentType, _: &DataSummary, _: &str) -> AppResult<AgentResult> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(mock_result(agent))
        }
    }

    struct PanickingBackend;

    #[async_trait]
    impl AnalysisBackend for PanickingBackend {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn analyze(&self, agent: AgentType, _: &DataSummary, _: &str) -> AppResult<AgentResult> {
            if agent == AgentType::Aggressive {
                panic!("boom");
            }
            Ok(mock_result(agent))
        }
    }

    #[test]
    fn test_step_delay_is_deterministic_and_bounded() {
        let config = RunnerConfig::default();
        let step = thinking_steps(AgentType::Balanced)[0];
        let delay = config.step_delay(AgentType::Balanced, step);
        assert_eq!(delay, config.step_delay(AgentType::Balanced, step));
        assert!(delay >= Duration::from_millis(800));
        assert!(delay < Duration::from_millis(1800));
    }

    #[test]
    fn test_step_delay_without_jitter() {
        assert_eq!(
            fast().step_delay(AgentType::Aggressive, "anything"),
            Duration::from_millis(1)
        );
    }

    #[tokio::test]
    async fn test_mock_run_reports_steps_then_result() {
        let runner = AgentRunner::new(Arc::new(MockBackend), fast());
        let events = collect(runner.run(demo_summary(), String::new(), CancellationToken::new())).await;
        assert_eq!(events.len(), 15);

        for agent in AgentType::ALL {
            let own: Vec<&AgentEvent> = events
                .iter()
                .filter(|e| e.agent_type() == Some(agent))
                .collect();
            let progress: Vec<f64> = own.iter().filter_map(|e| e.progress).collect();
            assert_eq!(progress, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
            let last = own.last().unwrap();
            assert_eq!(last.result.as_ref(), Some(&mock_result(agent)));
            assert!(!last.is_degraded());
        }

        let mut board = ArenaBoard::new();
        for event in &events {
            board.apply_event(event);
        }
        assert!(board.all_complete());
    }

    #[tokio::test]
    async fn test_failing_backend_serves_flagged_fallback() {
        let runner = AgentRunner::new(Arc::new(FailingBackend), fast());
        let events = collect(runner.run(demo_summary(), String::new(), CancellationToken::new())).await;

        let completions: Vec<&AgentEvent> = events.iter().filter(|e| e.result.is_some()).collect();
        assert_eq!(completions.len(), 3);
        for event in completions {
            assert!(event.is_degraded());
            assert!(event
                .mock_reason
                .as_deref()
                .unwrap()
                .contains("upstream unavailable"));
        }
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_into_fallback() {
        let runner = AgentRunner::new(Arc::new(SlowBackend), fast());
        let events = collect(runner.run(demo_summary(), String::new(), CancellationToken::new())).await;

        let degraded: Vec<&AgentEvent> = events.iter().filter(|e| e.is_degraded()).collect();
        assert_eq!(degraded.len(), 3);
        assert!(degraded[0].mock_reason.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_panicking_agent_reports_gateway_error() {
        let runner = AgentRunner::new(Arc::new(PanickingBackend), fast());
        let events = collect(runner.run(demo_summary(), String::new(), CancellationToken::new())).await;

        let errors: Vec<&AgentEvent> = events.iter().filter(|e| e.detail.is_some()).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].detail.as_deref().unwrap().contains("Aggressive"));
        assert_eq!(events.iter().filter(|e| e.result.is_some()).count(), 2);

        let mut board = ArenaBoard::new();
        for event in &events {
            board.apply_event(event);
        }
        assert_eq!(board.get(AgentType::Aggressive).status, AgentStatus::Thinking);
    }

    #[tokio::test]
    async fn test_cancel_stops_all_agents() {
        let config = RunnerConfig {
            base_delay: Duration::from_secs(30),
            ..fast()
        };
        let runner = AgentRunner::new(Arc::new(MockBackend), config);
        let cancel = CancellationToken::new();
        let rx = runner.run(demo_summary(), String::new(), cancel.clone());
        cancel.cancel();

        let events = tokio::time::timeout(Duration::from_secs(5), collect(rx))
            .await
            .unwrap();
        assert!(events.is_empty());
    }
}
