//! Spend Arena Client
//!
//! Consumer side of the analysis event stream:
//!
//! - `frame` - Incremental decoding of the `data: <json>` wire format
//! - `stream` - `StreamClient::open_stream` with callback delivery and cancellation
//! - `controller` - `ArenaController`, one stream per session per view
//! - `api` - Typed client for the session/vote endpoints
//! - `http_client` - reqwest client factory

pub mod api;
pub mod controller;
pub mod error;
pub mod frame;
pub mod http_client;
pub mod stream;

pub use api::{ApiClient, ApiClientConfig};
pub use controller::{ArenaController, BoardWriter, StreamConnector};
pub use error::{ClientError, ClientResult};
pub use frame::{decode_frames, parse_frame_line, FrameDecoder};
pub use stream::{
    callbacks, drive, Callbacks, StreamClient, StreamClientConfig, StreamHandle, StreamHandler,
};
