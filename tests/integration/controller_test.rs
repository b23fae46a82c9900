//! Session Controller Integration Tests

use spend_arena_client::{ArenaController, StreamClient, StreamClientConfig};
use spend_arena_core::{AgentStatus, AgentType, StreamPhase};

use crate::common::{closed_origin, finished_board, spawn_gateway, RUN_TIMEOUT};

#[tokio::test]
async fn test_repeated_activation_shares_one_stream() {
    let gateway = spawn_gateway().await;
    let demo = gateway.api().start_demo().await.unwrap();

    let mut controller = ArenaController::new(gateway.stream_client());
    let first = controller.ensure_started(&demo.session_id);
    let second = controller.ensure_started(&demo.session_id);
    assert!(first.same_channel(&second));
    assert!(controller.is_started(&demo.session_id));

    let board = finished_board(first).await;
    assert_eq!(board.phase(), &StreamPhase::Done);
    assert!(board.all_complete());
    assert_eq!(board.degraded().count(), 0);
}

#[tokio::test]
async fn test_switching_sessions_isolates_boards() {
    let gateway = spawn_gateway().await;
    let api = gateway.api();
    let first = api.start_demo().await.unwrap();
    let second = api.start_demo().await.unwrap();

    let mut controller = ArenaController::new(gateway.stream_client());
    let mut old_board = controller.ensure_started(&first.session_id);
    let new_board = controller.ensure_started(&second.session_id);
    assert!(!old_board.same_channel(&new_board));
    assert_eq!(controller.session_id(), Some(second.session_id.as_str()));

    let board = finished_board(new_board).await;
    assert!(board.all_complete());

    // The abandoned stream never reaches a terminal phase.
    tokio::time::timeout(RUN_TIMEOUT, async {
        while old_board.changed().await.is_ok() {}
    })
    .await
    .unwrap();
    assert!(!old_board.borrow().phase().is_finished());
}

#[tokio::test]
async fn test_reset_allows_a_fresh_run() {
    let gateway = spawn_gateway().await;
    let demo = gateway.api().start_demo().await.unwrap();

    let mut controller = ArenaController::new(gateway.stream_client());
    let board = finished_board(controller.ensure_started(&demo.session_id)).await;
    assert!(board.all_complete());

    controller.reset();
    assert!(!controller.is_started(&demo.session_id));

    let rerun = controller.ensure_started(&demo.session_id);
    assert_eq!(rerun.borrow().phase(), &StreamPhase::Connecting);
    assert!(finished_board(rerun).await.all_complete());
}

#[tokio::test]
async fn test_transport_failure_marks_every_agent() {
    let client = StreamClient::new(&StreamClientConfig {
        base_url: closed_origin(),
        ..Default::default()
    })
    .unwrap();

    let mut controller = ArenaController::new(client);
    let board = finished_board(controller.ensure_started("any")).await;

    assert!(matches!(board.phase(), StreamPhase::Failed { .. }));
    for agent in AgentType::ALL {
        assert_eq!(board.get(agent).status, AgentStatus::Error);
    }
}
