//! Terminal Watcher Integration Tests

use spend_arena::watch::{render_board, watch_session, WatchOptions};

use crate::common::spawn_gateway;

#[tokio::test]
async fn test_watch_demo_until_complete() {
    let gateway = spawn_gateway().await;
    let options = WatchOptions {
        base_url: gateway.base_url.clone(),
        session_id: None,
    };

    let mut frames = Vec::new();
    let board = watch_session(&options, |session_id, board| {
        frames.push(render_board(session_id, board));
    })
    .await
    .unwrap();

    assert!(board.all_complete());
    assert!(frames.len() >= 2);
    assert!(frames.last().unwrap().contains("all agents complete"));
    assert!(frames.last().unwrap().contains("$180,000.00 in 5 recommendations"));
    assert_eq!(gateway.state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_watch_unknown_session_fails() {
    let gateway = spawn_gateway().await;
    let options = WatchOptions {
        base_url: gateway.base_url.clone(),
        session_id: Some("missing".to_string()),
    };

    let board = watch_session(&options, |_, _| {}).await.unwrap();
    assert!(!board.all_complete());
    assert!(render_board("missing", &board).contains("connection lost"));
}
