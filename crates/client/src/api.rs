//! Collaborator API Client
//!
//! Typed access to the non-streaming endpoints of the gateway: health,
//! demo sessions, session listing, summaries, and votes.

use std::time::Duration;

use serde::de::DeserializeOwned;
use spend_arena_core::{
    DataSummary, DemoSession, HealthStatus, SessionInfo, SessionsResponse, VoteRequest, VoteTally,
    VotesResponse,
};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::http_client::build_http_client;

/// Configuration for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiClientConfig) -> ClientResult<Self> {
        let http = build_http_client(Some(config.timeout), Some(config.timeout))?;
        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::HttpError {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let response = self.http.get(self.url(&["api", "health"])?).send().await?;
        Self::read_json(response).await
    }

    /// Create a session pre-loaded with the demo dataset.
    pub async fn start_demo(&self) -> ClientResult<DemoSession> {
        let response = self
            .http
            .post(self.url(&["api", "demo", "start"])?)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// All stored sessions, most recent first.
    pub async fn list_sessions(&self) -> ClientResult<Vec<SessionInfo>> {
        let response = self.http.get(self.url(&["api", "sessions"])?).send().await?;
        let listing: SessionsResponse = Self::read_json(response).await?;
        Ok(listing.sessions)
    }

    /// Returns `false` if the session did not exist.
    pub async fn delete_session(&self, session_id: &str) -> ClientResult<bool> {
        let response = self
            .http
            .delete(self.url(&["api", "sessions", session_id])?)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let _: serde_json::Value = Self::read_json(response).await?;
        Ok(true)
    }

    pub async fn get_summary(&self, session_id: &str) -> ClientResult<DataSummary> {
        let response = self
            .http
            .get(self.url(&["api", "sessions", session_id, "summary"])?)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Upvote one recommendation; returns the session's updated tallies.
    pub async fn cast_vote(&self, vote: &VoteRequest) -> ClientResult<VoteTally> {
        let response = self
            .http
            .post(self.url(&["api", "vote"])?)
            .json(vote)
            .send()
            .await?;
        let votes: VotesResponse = Self::read_json(response).await?;
        Ok(votes.votes)
    }

    pub async fn get_votes(&self, session_id: &str) -> ClientResult<VoteTally> {
        let response = self
            .http
            .get(self.url(&["api", "votes", session_id])?)
            .send()
            .await?;
        let votes: VotesResponse = Self::read_json(response).await?;
        Ok(votes.votes)
    }
}
