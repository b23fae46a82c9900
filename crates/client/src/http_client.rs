//! HTTP Client Factory

use std::time::Duration;

use crate::error::ClientResult;

/// Build a `reqwest::Client` for talking to the gateway.
///
/// `request_timeout` bounds whole requests and must stay `None` for clients
/// that hold long-lived event streams open.
pub fn build_http_client(
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
