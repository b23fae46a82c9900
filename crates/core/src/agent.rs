//! Agent Types
//!
//! The closed set of analysis strategies and the per-agent state record that
//! the reducer maintains for each of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::lenient;

// ============================================================================
// Agent identity
// ============================================================================

/// One of the three fixed analysis strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    /// Low risk, proven strategies
    Conservative,
    /// Bold moves, maximum savings
    Aggressive,
    /// Risk-weighted optimization
    Balanced,
}

impl AgentType {
    /// Every agent type, in display order.
    pub const ALL: [AgentType; 3] = [
        AgentType::Conservative,
        AgentType::Aggressive,
        AgentType::Balanced,
    ];

    /// Wire name of the agent.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Conservative => "conservative",
            AgentType::Aggressive => "aggressive",
            AgentType::Balanced => "balanced",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AgentType::Conservative => "Conservative",
            AgentType::Aggressive => "Aggressive",
            AgentType::Balanced => "Balanced",
        }
    }

    /// Stable slot index, matching the order of [`AgentType::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AgentType::Conservative => 0,
            AgentType::Aggressive => 1,
            AgentType::Balanced => 2,
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conservative" => Ok(AgentType::Conservative),
            "aggressive" => Ok(AgentType::Aggressive),
            "balanced" => Ok(AgentType::Balanced),
            other => Err(CoreError::unknown_agent(other)),
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Risk classification attached to each recommendation.
///
/// Decoding goes through [`RiskLevel::from_loose`], so `"Medium"`, `"Low risk"`
/// or a non-string all map onto the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    /// Map free-form model output ("medium-high", "Low risk") onto the closed set.
    pub fn from_loose(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("high") {
            RiskLevel::High
        } else if lower.contains("low") {
            RiskLevel::Low
        } else {
            RiskLevel::Medium
        }
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient::string(deserializer)?
            .map(|raw| RiskLevel::from_loose(&raw))
            .unwrap_or_default())
    }
}

/// A single savings recommendation. Immutable once delivered.
///
/// Missing or mistyped fields decode to their empty value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::number_or_zero")]
    pub estimated_savings: f64,
    /// Model confidence in `[0, 1]`
    #[serde(deserialize_with = "lenient::number_or_zero")]
    pub confidence: f64,
    pub risk_level: RiskLevel,
    #[serde(deserialize_with = "lenient::strings")]
    pub pros: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub cons: Vec<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::string(deserializer)?.unwrap_or_default())
}

impl Recommendation {
    /// Validates the numeric ranges of the recommendation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(CoreError::validation(format!(
                "confidence {} for '{}' is outside [0, 1]",
                self.confidence, self.id
            )));
        }
        if self.id.trim().is_empty() {
            return Err(CoreError::validation("recommendation id is empty"));
        }
        Ok(())
    }
}

/// Final output of one agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_type: AgentType,
    #[serde(default, deserialize_with = "lenient_recommendations")]
    pub recommendations: Vec<Recommendation>,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub total_savings: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: String,
}

/// Recommendations that are not JSON objects are skipped.
fn lenient_recommendations<'de, D>(deserializer: D) -> Result<Vec<Recommendation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter(serde_json::Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

// ============================================================================
// Per-agent state
// ============================================================================

/// Lifecycle status of one agent as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Thinking,
    Complete,
    Error,
}

impl AgentStatus {
    /// Whether no further thinking updates are accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStatus::Complete | AgentStatus::Error)
    }
}

/// Marker attached to a completion that came from fallback results instead of
/// the live analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedNotice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DegradedNotice {
    /// Notice text suitable for showing next to the agent's results.
    pub fn message(&self) -> String {
        match &self.reason {
            Some(reason) => format!("Showing fallback results: {}", reason),
            None => "Showing fallback results".to_string(),
        }
    }
}

/// Client-side view of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub status: AgentStatus,
    /// Progress percentage in `[0, 100]`
    pub progress: u8,
    pub steps: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub total_savings: f64,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegradedNotice>,
}

impl AgentState {
    /// The `idle` shape every agent starts from.
    pub fn idle(agent_type: AgentType) -> Self {
        Self {
            agent_type,
            status: AgentStatus::Idle,
            progress: 0,
            steps: Vec::new(),
            recommendations: Vec::new(),
            total_savings: 0.0,
            summary: String::new(),
            degraded: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == AgentStatus::Complete
    }
}
