//! Session Models
//!
//! Server-side record of one analysed dataset.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spend_arena_core::{AgentResult, AgentType, DataSummary};

/// One stored session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Name of the source file
    pub filename: String,
    pub summary: DataSummary,
    pub created_at: DateTime<Utc>,
    /// Created from the built-in demo dataset
    #[serde(default)]
    pub demo: bool,
    /// Latest completed result per agent; survives re-runs
    #[serde(default)]
    pub agent_results: BTreeMap<AgentType, AgentResult>,
}

impl Session {
    pub fn new(filename: impl Into<String>, summary: DataSummary) -> Self {
        Self {
            filename: filename.into(),
            summary,
            created_at: Utc::now(),
            demo: false,
            agent_results: BTreeMap::new(),
        }
    }

    pub fn demo(summary: DataSummary) -> Self {
        Self {
            demo: true,
            ..Self::new(super::demo::DEMO_FILENAME, summary)
        }
    }
}

/// Detail of one upvoted recommendation, kept for preference context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotedRecommendation {
    pub recommendation_id: String,
    pub title: String,
    pub description: String,
}
