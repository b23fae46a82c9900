//! Session DTOs
//!
//! Request/response shapes of the session collaborators (summary, listing,
//! voting). Shared between the server routes and the typed API client.

use serde::{Deserialize, Serialize};

use crate::agent::AgentType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSummary {
    pub vendor: String,
    pub total_spend: f64,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total_spend: f64,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub total_spend: f64,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub total_spend: f64,
}

/// Aggregated view of an uploaded spend dataset. This is what the agents
/// analyse; the raw rows never reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_spend: f64,
    pub row_count: u64,
    #[serde(default)]
    pub unique_vendor_count: u64,
    pub date_range: String,
    #[serde(default)]
    pub date_min: Option<String>,
    #[serde(default)]
    pub date_max: Option<String>,
    #[serde(default)]
    pub top_vendors: Vec<VendorSummary>,
    #[serde(default)]
    pub category_breakdown: Vec<CategorySummary>,
    #[serde(default)]
    pub department_breakdown: Vec<DepartmentSummary>,
    #[serde(default)]
    pub monthly_trends: Vec<MonthlyTrend>,
    #[serde(default)]
    pub duplicate_vendors: Vec<String>,
}

/// Listing entry for one stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub filename: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub row_count: u64,
    pub total_spend: f64,
    pub vote_count: u32,
}

/// Liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Whether agents run against canned results
    #[serde(default)]
    pub mock_agents: bool,
}

/// `{"sessions": [...]}` envelope of the listing endpoint, most recent first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionInfo>,
}

/// Response of the demo-session collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoSession {
    pub session_id: String,
    pub summary: DataSummary,
}

/// An upvote of one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub session_id: String,
    pub agent_type: AgentType,
    pub recommendation_id: String,
    pub recommendation_title: String,
    pub recommendation_description: String,
}

/// Per-agent vote counts for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub conservative: u32,
    pub aggressive: u32,
    pub balanced: u32,
}

impl VoteTally {
    pub fn record(&mut self, agent: AgentType) {
        match agent {
            AgentType::Conservative => self.conservative += 1,
            AgentType::Aggressive => self.aggressive += 1,
            AgentType::Balanced => self.balanced += 1,
        }
    }

    pub fn get(&self, agent: AgentType) -> u32 {
        match agent {
            AgentType::Conservative => self.conservative,
            AgentType::Aggressive => self.aggressive,
            AgentType::Balanced => self.balanced,
        }
    }

    pub fn total(&self) -> u32 {
        self.conservative + self.aggressive + self.balanced
    }
}

/// `{"votes": {...}}` envelope used by the vote endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VotesResponse {
    pub votes: VoteTally,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_tally_records_per_agent() {
        let mut tally = VoteTally::default();
        tally.record(AgentType::Balanced);
        tally.record(AgentType::Balanced);
        tally.record(AgentType::Aggressive);

        assert_eq!(tally.get(AgentType::Balanced), 2);
        assert_eq!(tally.get(AgentType::Aggressive), 1);
        assert_eq!(tally.get(AgentType::Conservative), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_votes_response_shape() {
        let response = VotesResponse {
            votes: VoteTally {
                conservative: 1,
                aggressive: 0,
                balanced: 2,
            },
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"votes": {"conservative": 1, "aggressive": 0, "balanced": 2}})
        );
    }

    #[test]
    fn test_summary_tolerates_missing_breakdowns() {
        let json = r#"{"total_spend": 10.5, "row_count": 3, "date_range": "2024-01-01 to 2024-01-31"}"#;
        let summary: DataSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.row_count, 3);
        assert!(summary.top_vendors.is_empty());
        assert!(summary.date_min.is_none());
    }
}
