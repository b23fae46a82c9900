//! Stream Client Integration Tests
//!
//! The client's callbacks against frames produced by the real gateway.

use std::sync::{Arc, Mutex};

use spend_arena_client::{callbacks, ClientError, StreamClient, StreamHandle};
use spend_arena_core::{AgentEvent, AgentType, ArenaBoard};

use crate::common::{closed_origin, spawn_gateway, RUN_TIMEOUT};

#[derive(Default)]
struct Calls {
    events: Vec<AgentEvent>,
    done: usize,
    errors: Vec<ClientError>,
}

fn open(client: &StreamClient, session_id: &str) -> (StreamHandle, Arc<Mutex<Calls>>) {
    let calls = Arc::new(Mutex::new(Calls::default()));
    let (on_event, on_done, on_error) = (calls.clone(), calls.clone(), calls.clone());
    let handle = client.open_stream(
        session_id,
        callbacks(
            move |event| on_event.lock().unwrap().events.push(event),
            move || on_done.lock().unwrap().done += 1,
            move |error| on_error.lock().unwrap().errors.push(error),
        ),
    );
    (handle, calls)
}

async fn join(handle: StreamHandle) {
    tokio::time::timeout(RUN_TIMEOUT, handle.join())
        .await
        .expect("stream did not finish in time");
}

#[tokio::test]
async fn test_full_run_reaches_done_once() {
    let gateway = spawn_gateway().await;
    let demo = gateway.api().start_demo().await.unwrap();

    let (handle, calls) = open(&gateway.stream_client(), &demo.session_id);
    join(handle).await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.done, 1);
    assert!(calls.errors.is_empty());
    assert_eq!(calls.events.len(), 15);

    let mut board = ArenaBoard::new();
    for event in &calls.events {
        board.apply_event(event);
    }
    assert!(board.all_complete());
    for agent in AgentType::ALL {
        let state = board.get(agent);
        assert_eq!(state.progress, 100);
        assert_eq!(state.steps.len(), 4);
        assert!(state.degraded.is_none());
    }
}

#[tokio::test]
async fn test_per_agent_progress_is_ordered() {
    let gateway = spawn_gateway().await;
    let demo = gateway.api().start_demo().await.unwrap();

    let (handle, calls) = open(&gateway.stream_client(), &demo.session_id);
    join(handle).await;

    let calls = calls.lock().unwrap();
    for agent in AgentType::ALL {
        let progress: Vec<f64> = calls
            .events
            .iter()
            .filter(|e| e.agent_type() == Some(agent))
            .filter_map(|e| e.progress)
            .collect();
        assert_eq!(progress, vec![20.0, 40.0, 60.0, 80.0, 100.0], "{}", agent);
    }
}

#[tokio::test]
async fn test_completed_results_are_recorded_on_the_session() {
    let gateway = spawn_gateway().await;
    let demo = gateway.api().start_demo().await.unwrap();

    let (handle, _calls) = open(&gateway.stream_client(), &demo.session_id);
    join(handle).await;

    let session = gateway.state.sessions.get(&demo.session_id).await.unwrap();
    assert_eq!(session.agent_results.len(), 3);
    assert_eq!(session.agent_results[&AgentType::Aggressive].total_savings, 180_000.0);
}

#[tokio::test]
async fn test_unknown_session_reports_error_once() {
    let gateway = spawn_gateway().await;

    let (handle, calls) = open(&gateway.stream_client(), "missing");
    join(handle).await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.done, 0);
    assert!(calls.events.is_empty());
    assert_eq!(calls.errors.len(), 1);
    assert!(matches!(calls.errors[0], ClientError::HttpError { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_gateway_reports_connect_failure() {
    let client = StreamClient::new(&spend_arena_client::StreamClientConfig {
        base_url: closed_origin(),
        ..Default::default()
    })
    .unwrap();

    let (handle, calls) = open(&client, "any");
    join(handle).await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.done, 0);
    assert_eq!(calls.errors.len(), 1);
    assert!(calls.errors[0].is_connect_failure());
}

#[tokio::test]
async fn test_cancelled_stream_is_silent() {
    let gateway = spawn_gateway().await;
    let demo = gateway.api().start_demo().await.unwrap();

    let (handle, calls) = open(&gateway.stream_client(), &demo.session_id);
    handle.cancel();
    handle.cancel();
    join(handle).await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.done, 0);
    assert!(calls.errors.is_empty());
}
