//! Collaborator API Integration Tests

use spend_arena_client::ClientError;
use spend_arena_core::{AgentType, VoteRequest};

use crate::common::spawn_gateway;

fn vote(session_id: &str, agent_type: AgentType, id: &str) -> VoteRequest {
    VoteRequest {
        session_id: session_id.to_string(),
        agent_type,
        recommendation_id: id.to_string(),
        recommendation_title: "Cloud Cost Optimization Program".to_string(),
        recommendation_description: "Reserved instances and rightsizing".to_string(),
    }
}

#[tokio::test]
async fn test_health_reports_mock_agents() {
    let gateway = spawn_gateway().await;
    let health = gateway.api().health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.mock_agents);
}

#[tokio::test]
async fn test_demo_session_lifecycle() {
    let gateway = spawn_gateway().await;
    let api = gateway.api();

    let demo = api.start_demo().await.unwrap();
    assert_eq!(demo.summary.total_spend, 1_284_750.0);

    let sessions = api.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, demo.session_id);
    assert_eq!(sessions[0].filename, "demo-data.csv");

    let summary = api.get_summary(&demo.session_id).await.unwrap();
    assert_eq!(summary, demo.summary);

    assert!(api.delete_session(&demo.session_id).await.unwrap());
    assert!(!api.delete_session(&demo.session_id).await.unwrap());
    assert!(api.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_votes_accumulate_per_agent() {
    let gateway = spawn_gateway().await;
    let api = gateway.api();
    let demo = api.start_demo().await.unwrap();

    assert_eq!(api.get_votes(&demo.session_id).await.unwrap().total(), 0);

    api.cast_vote(&vote(&demo.session_id, AgentType::Balanced, "b2"))
        .await
        .unwrap();
    let tally = api
        .cast_vote(&vote(&demo.session_id, AgentType::Conservative, "c1"))
        .await
        .unwrap();
    assert_eq!(tally.balanced, 1);
    assert_eq!(tally.conservative, 1);
    assert_eq!(tally.aggressive, 0);

    assert_eq!(api.get_votes(&demo.session_id).await.unwrap(), tally);
    assert_eq!(api.list_sessions().await.unwrap()[0].vote_count, 2);

    let context = gateway
        .state
        .sessions
        .preference_context(&demo.session_id)
        .await;
    assert!(context.contains("Cloud Cost Optimization Program"));
}

#[tokio::test]
async fn test_unknown_session_errors_are_404() {
    let gateway = spawn_gateway().await;
    let api = gateway.api();

    let err = api.get_summary("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::HttpError { status: 404, .. }));

    let err = api
        .cast_vote(&vote("missing", AgentType::Aggressive, "a1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::HttpError { status: 404, ref body } if body.contains("Session not found")));
}
