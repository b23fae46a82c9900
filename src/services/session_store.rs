//! Session Store
//!
//! In-memory sessions with per-agent vote tallies and the preference context
//! derived from upvoted recommendations. Capped at `max_sessions`; saving past
//! the cap evicts the oldest session together with its votes.

use std::collections::{HashMap, VecDeque};

use spend_arena_core::{AgentResult, AgentType, SessionInfo, VoteRequest, VoteTally};
use tokio::sync::RwLock;

use crate::models::session::{Session, VotedRecommendation};
use crate::utils::error::{AppError, AppResult};

const PREFERENCE_HEADER: &str = "The user has previously upvoted the following recommendations, \
indicating areas they want you to focus on:";

const PREFERENCE_FOOTER: &str = "Prioritize analysis in these areas. Suggest deeper, more specific \
strategies related to these topics. Do NOT change your risk tolerance or personality. Keep your \
unique perspective, but focus your attention on the areas the user cares about most.";

/// Generate a short opaque session id (12 hex chars).
pub fn new_session_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

#[derive(Default)]
struct StoreInner {
    sessions: HashMap<String, Session>,
    /// Most recent first
    order: VecDeque<String>,
    votes: HashMap<String, VoteTally>,
    voted: HashMap<String, Vec<VotedRecommendation>>,
}

impl StoreInner {
    fn forget(&mut self, session_id: &str) -> bool {
        let existed = self.sessions.remove(session_id).is_some();
        self.votes.remove(session_id);
        self.voted.remove(session_id);
        self.order.retain(|id| id != session_id);
        existed
    }
}

pub struct SessionStore {
    inner: RwLock<StoreInner>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Store `session` as the most recent one, evicting the oldest past the cap.
    pub async fn save(&self, session_id: &str, session: Session) {
        let mut inner = self.inner.write().await;
        inner.order.retain(|id| id != session_id);
        inner.order.push_front(session_id.to_string());
        inner.sessions.insert(session_id.to_string(), session);

        while inner.order.len() > self.max_sessions {
            let Some(oldest) = inner.order.pop_back() else {
                break;
            };
            inner.forget(&oldest);
            tracing::info!(
                session_id = %oldest,
                max_sessions = self.max_sessions,
                "Evicted oldest session"
            );
        }
    }

    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.inner.read().await.sessions.get(session_id).cloned()
    }

    /// Like [`SessionStore::get`], but a missing session is a 404.
    pub async fn require(&self, session_id: &str) -> AppResult<Session> {
        self.get(session_id)
            .await
            .ok_or_else(|| AppError::not_found("Session not found"))
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.inner.read().await.sessions.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove a session and everything attached to it. Returns whether it existed.
    pub async fn delete(&self, session_id: &str) -> bool {
        let existed = self.inner.write().await.forget(session_id);
        if existed {
            tracing::info!(session_id, "Deleted session");
        }
        existed
    }

    /// Listing metadata, most recent first.
    pub async fn list(&self) -> Vec<SessionInfo> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| {
                let session = inner.sessions.get(id)?;
                let vote_count = inner.votes.get(id).map_or(0, VoteTally::total);
                Some(SessionInfo {
                    session_id: id.clone(),
                    filename: session.filename.clone(),
                    created_at: session.created_at.to_rfc3339(),
                    row_count: session.summary.row_count,
                    total_spend: session.summary.total_spend,
                    vote_count,
                })
            })
            .collect()
    }

    /// Keep the latest completed result of `agent` on the session.
    /// Returns `false` if the session is gone (deleted or evicted mid-stream).
    pub async fn record_result(&self, session_id: &str, result: AgentResult) -> bool {
        let mut inner = self.inner.write().await;
        match inner.sessions.get_mut(session_id) {
            Some(session) => {
                session.agent_results.insert(result.agent_type, result);
                true
            }
            None => false,
        }
    }

    /// Count an upvote. A recommendation contributes to the preference context
    /// once, however often it is voted for.
    pub async fn add_vote(&self, vote: &VoteRequest) -> AppResult<VoteTally> {
        let mut inner = self.inner.write().await;
        if !inner.sessions.contains_key(&vote.session_id) {
            return Err(AppError::not_found("Session not found"));
        }

        let tally = inner.votes.entry(vote.session_id.clone()).or_default();
        tally.record(vote.agent_type);
        let tally = *tally;

        let voted = inner.voted.entry(vote.session_id.clone()).or_default();
        if !voted
            .iter()
            .any(|r| r.recommendation_id == vote.recommendation_id)
        {
            voted.push(VotedRecommendation {
                recommendation_id: vote.recommendation_id.clone(),
                title: vote.recommendation_title.clone(),
                description: vote.recommendation_description.clone(),
            });
            tracing::info!(
                session_id = %vote.session_id,
                title = %vote.recommendation_title,
                "Preference recorded"
            );
        }

        Ok(tally)
    }

    /// Current tallies; all zero for a session without votes.
    pub async fn votes(&self, session_id: &str) -> VoteTally {
        self.inner
            .read()
            .await
            .votes
            .get(session_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn votes_for(&self, session_id: &str, agent: AgentType) -> u32 {
        self.votes(session_id).await.get(agent)
    }

    /// Natural-language summary of upvoted recommendations, handed to the
    /// analysis backend. Empty when nothing has been voted for.
    pub async fn preference_context(&self, session_id: &str) -> String {
        let inner = self.inner.read().await;
        let Some(voted) = inner.voted.get(session_id).filter(|v| !v.is_empty()) else {
            return String::new();
        };

        let mut lines = vec![PREFERENCE_HEADER.to_string()];
        lines.extend(
            voted
                .iter()
                .map(|r| format!("- {}: {}", r.title, r.description)),
        );
        lines.push(String::new());
        lines.push(PREFERENCE_FOOTER.to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo::demo_summary;

    fn session(name: &str) -> Session {
        Session::new(name, demo_summary())
    }

    fn vote(session_id: &str, agent: AgentType, rec: &str) -> VoteRequest {
        VoteRequest {
            session_id: session_id.to_string(),
            agent_type: agent,
            recommendation_id: rec.to_string(),
            recommendation_title: format!("Title {}", rec),
            recommendation_description: format!("Description {}", rec),
        }
    }

    #[test]
    fn test_new_session_id_shape() {
        let id = new_session_id();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_session_id());
    }

    #[tokio::test]
    async fn test_save_get_roundtrip() {
        let store = SessionStore::new(10);
        store.save("s1", session("a.csv")).await;
        let loaded = store.get("s1").await.unwrap();
        assert_eq!(loaded.filename, "a.csv");
        assert!(store.get("missing").await.is_none());
        assert!(matches!(
            store.require("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_eviction_drops_oldest() {
        let store = SessionStore::new(2);
        store.save("s1", session("1.csv")).await;
        store.add_vote(&vote("s1", AgentType::Balanced, "b1")).await.unwrap();
        store.save("s2", session("2.csv")).await;
        store.save("s3", session("3.csv")).await;

        assert_eq!(store.len().await, 2);
        assert!(!store.contains("s1").await);
        assert_eq!(store.votes("s1").await, VoteTally::default());
        assert_eq!(store.preference_context("s1").await, "");

        let ids: Vec<String> = store.list().await.into_iter().map(|s| s.session_id).collect();
        assert_eq!(ids, vec!["s3", "s2"]);
    }

    #[tokio::test]
    async fn test_resave_moves_to_front_without_duplicates() {
        let store = SessionStore::new(5);
        store.save("s1", session("1.csv")).await;
        store.save("s2", session("2.csv")).await;
        store.save("s1", session("1b.csv")).await;

        let listing = store.list().await;
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].session_id, "s1");
        assert_eq!(listing[0].filename, "1b.csv");
    }

    #[tokio::test]
    async fn test_delete_clears_votes_and_recommendations() {
        let store = SessionStore::new(5);
        store.save("s1", session("1.csv")).await;
        store.add_vote(&vote("s1", AgentType::Conservative, "c1")).await.unwrap();

        assert!(store.delete("s1").await);
        assert!(!store.delete("s1").await);
        assert_eq!(store.votes("s1").await.total(), 0);
        assert_eq!(store.preference_context("s1").await, "");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_vote_initializes_and_increments() {
        let store = SessionStore::new(5);
        store.save("s1", session("1.csv")).await;

        let tally = store.add_vote(&vote("s1", AgentType::Conservative, "c1")).await.unwrap();
        assert_eq!(tally.conservative, 1);
        let tally = store.add_vote(&vote("s1", AgentType::Conservative, "c1")).await.unwrap();
        assert_eq!(tally.conservative, 2);
        assert_eq!(tally.aggressive, 0);
        assert_eq!(store.votes_for("s1", AgentType::Conservative).await, 2);

        let listing = store.list().await;
        assert_eq!(listing[0].vote_count, 2);
    }

    #[tokio::test]
    async fn test_vote_for_unknown_session_is_not_found() {
        let store = SessionStore::new(5);
        let err = store
            .add_vote(&vote("ghost", AgentType::Aggressive, "a1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_preference_context_empty_when_no_votes() {
        let store = SessionStore::new(5);
        store.save("s1", session("1.csv")).await;
        assert_eq!(store.preference_context("s1").await, "");
    }

    #[tokio::test]
    async fn test_preference_context_lists_each_recommendation_once() {
        let store = SessionStore::new(5);
        store.save("s1", session("1.csv")).await;
        store.add_vote(&vote("s1", AgentType::Conservative, "c1")).await.unwrap();
        store.add_vote(&vote("s1", AgentType::Conservative, "c1")).await.unwrap();
        store.add_vote(&vote("s1", AgentType::Balanced, "b2")).await.unwrap();

        let context = store.preference_context("s1").await;
        assert!(context.starts_with(PREFERENCE_HEADER));
        assert_eq!(context.matches("- Title c1: Description c1").count(), 1);
        assert!(context.contains("- Title b2: Description b2"));
        assert!(context.ends_with(PREFERENCE_FOOTER));
    }

    #[tokio::test]
    async fn test_record_result_keeps_latest_per_agent() {
        let store = SessionStore::new(5);
        store.save("s1", session("1.csv")).await;

        let result = |total_savings| AgentResult {
            agent_type: AgentType::Aggressive,
            recommendations: vec![],
            total_savings,
            summary: String::new(),
        };
        assert!(store.record_result("s1", result(1.0)).await);
        assert!(store.record_result("s1", result(2.0)).await);
        assert!(!store.record_result("gone", result(3.0)).await);

        let session = store.get("s1").await.unwrap();
        assert_eq!(session.agent_results.len(), 1);
        assert_eq!(session.agent_results[&AgentType::Aggressive].total_savings, 2.0);
    }
}
