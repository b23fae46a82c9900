//! Arena Board
//!
//! The per-session state container: exactly one [`AgentState`] per
//! [`AgentType`], plus the phase of the stream feeding it. A board is created
//! fresh for every session and is mutated by a single writer, one event at a
//! time, through the pure functions in [`crate::reducer`].

use serde::{Deserialize, Serialize};

use crate::agent::{AgentState, AgentType, DegradedNotice};
use crate::reducer;
use crate::streaming::AgentEvent;

/// Connection phase of the stream feeding a board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum StreamPhase {
    #[default]
    Connecting,
    Streaming,
    Done,
    Failed { message: String },
}

impl StreamPhase {
    /// Whether the stream has ended one way or the other.
    pub fn is_finished(&self) -> bool {
        matches!(self, StreamPhase::Done | StreamPhase::Failed { .. })
    }
}

/// All agent states for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaBoard {
    agents: [AgentState; 3],
    phase: StreamPhase,
}

impl Default for ArenaBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaBoard {
    /// A board with every agent in the `idle` shape.
    pub fn new() -> Self {
        Self {
            agents: AgentType::ALL.map(AgentState::idle),
            phase: StreamPhase::Connecting,
        }
    }

    pub fn get(&self, agent: AgentType) -> &AgentState {
        &self.agents[agent.index()]
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.iter()
    }

    pub fn phase(&self) -> &StreamPhase {
        &self.phase
    }

    /// Route one event to the addressed agent's state.
    ///
    /// Returns `true` if the board changed, including the first frame moving
    /// the phase from `Connecting` to `Streaming`.
    pub fn apply_event(&mut self, event: &AgentEvent) -> bool {
        let mut changed = false;
        if self.phase == StreamPhase::Connecting {
            self.phase = StreamPhase::Streaming;
            changed = true;
        }
        let Some(agent) = event.agent_type() else {
            return changed;
        };
        let slot = &mut self.agents[agent.index()];
        let next = reducer::apply(slot, event);
        if next == *slot {
            return changed;
        }
        *slot = next;
        true
    }

    /// Apply a connection failure to every agent at once.
    pub fn apply_transport_error(&mut self, message: impl Into<String>) {
        let next = AgentType::ALL.map(|agent| reducer::apply_transport_error(self.get(agent)));
        self.agents = next;
        self.phase = StreamPhase::Failed {
            message: message.into(),
        };
    }

    /// Record that the terminal frame arrived.
    pub fn mark_done(&mut self) {
        self.phase = StreamPhase::Done;
    }

    /// True iff all three agents have completed.
    pub fn all_complete(&self) -> bool {
        self.agents.iter().all(AgentState::is_complete)
    }

    /// Agents whose results are fallback substitutions, with their notices.
    pub fn degraded(&self) -> impl Iterator<Item = (AgentType, &DegradedNotice)> {
        self.agents
            .iter()
            .filter_map(|state| state.degraded.as_ref().map(|notice| (state.agent_type, notice)))
    }
}
