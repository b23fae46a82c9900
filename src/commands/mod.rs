//! HTTP Commands
//!
//! Route handlers of the gateway. These are the entry points for the
//! browser client and the stream client.

pub mod analyze;
pub mod demo;
pub mod health;
pub mod sessions;
pub mod votes;

use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use analyze::analyze;
pub use demo::start_demo;
pub use health::get_health;
pub use sessions::{delete_session, get_summary, list_sessions};
pub use votes::{cast_vote, get_votes};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(tower_http::cors::Any)
}

/// The full gateway router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api/health", get(get_health))
        .route("/api/demo/start", post(start_demo))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/{session_id}", delete(delete_session))
        .route("/api/sessions/{session_id}/summary", get(get_summary))
        .route("/api/analyze/{session_id}", get(analyze))
        .route("/api/vote", post(cast_vote))
        .route("/api/votes/{session_id}", get(get_votes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
