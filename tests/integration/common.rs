//! Test gateway harness

use std::time::Duration;

use spend_arena::{AppConfig, AppState};
use spend_arena_client::{ApiClient, ApiClientConfig, StreamClient, StreamClientConfig};
use spend_arena_core::ArenaBoard;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};

/// Upper bound for a full mock analysis run in tests.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestGateway {
    pub base_url: String,
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestGateway {
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&ApiClientConfig {
            base_url: self.base_url.clone(),
            ..Default::default()
        })
        .unwrap()
    }

    pub fn stream_client(&self) -> StreamClient {
        StreamClient::new(&StreamClientConfig {
            base_url: self.base_url.clone(),
            ..Default::default()
        })
        .unwrap()
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_gateway() -> TestGateway {
    let config = AppConfig {
        thinking_step_base_delay_ms: 5,
        thinking_step_jitter_ms: 0,
        ..Default::default()
    };
    let state = AppState::from_config(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let (tx, rx) = oneshot::channel::<()>();
    let server_state = state.clone();
    tokio::spawn(async move {
        spend_arena::serve(listener, server_state, async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });

    TestGateway {
        base_url,
        state,
        shutdown: Some(tx),
    }
}

/// An origin nothing listens on.
pub fn closed_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Wait until the board's stream has ended and return its final state.
pub async fn finished_board(mut board: watch::Receiver<ArenaBoard>) -> ArenaBoard {
    tokio::time::timeout(RUN_TIMEOUT, board.wait_for(|b| b.phase().is_finished()))
        .await
        .expect("stream did not finish in time")
        .expect("board writer dropped before the stream finished")
        .clone()
}
