//! Agent State Reducer
//!
//! Pure transition functions for a single [`AgentState`]. Each function takes
//! the current state by reference and returns the next one; nothing here
//! touches shared state.
//!
//! Transitions:
//!
//! ```text
//! idle ──thinking──> thinking ──thinking──> thinking
//!   │                   │
//!   └──────complete─────┴──────────────────> complete   (always wins)
//!
//! transport error: complete stays complete, everything else -> error
//! ```

use crate::agent::{AgentState, AgentStatus};
use crate::streaming::{AgentEvent, AgentUpdate};

/// Progress reported on completion.
pub const COMPLETE_PROGRESS: u8 = 100;

fn clamp_progress(value: f64) -> u8 {
    value.clamp(0.0, f64::from(COMPLETE_PROGRESS)).round() as u8
}

/// Apply one stream event to one agent's state.
///
/// Events addressed to another agent, to an unknown agent, or to nobody leave
/// the state unchanged.
pub fn apply(state: &AgentState, event: &AgentEvent) -> AgentState {
    let Some(update) = event.update() else {
        return state.clone();
    };
    if update.agent() != state.agent_type {
        return state.clone();
    }

    match update {
        AgentUpdate::Thinking { step, progress, .. } => {
            // complete and error are terminal for progress updates
            if state.status.is_terminal() {
                return state.clone();
            }

            let mut next = state.clone();
            next.status = AgentStatus::Thinking;

            if let Some(progress) = progress.filter(|p| p.is_finite() && *p > 0.0) {
                next.progress = next.progress.max(clamp_progress(progress));
            }

            if let Some(step) = step.filter(|s| !s.is_empty()) {
                if !next.steps.iter().any(|existing| existing == step) {
                    next.steps.push(step.to_string());
                }
            }

            next
        }
        AgentUpdate::Complete {
            result, degraded, ..
        } => AgentState {
            agent_type: state.agent_type,
            status: AgentStatus::Complete,
            progress: COMPLETE_PROGRESS,
            steps: state.steps.clone(),
            recommendations: result.recommendations.clone(),
            total_savings: result.total_savings,
            summary: result.summary.clone(),
            degraded,
        },
    }
}

/// Apply a failure of the underlying connection to one agent's state.
///
/// Completed results are kept; any other status becomes `error`.
pub fn apply_transport_error(state: &AgentState) -> AgentState {
    if state.is_complete() {
        return state.clone();
    }
    AgentState {
        status: AgentStatus::Error,
        ..state.clone()
    }
}
