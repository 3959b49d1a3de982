//! HTTP access for the resource list and the per-resource CSV files.
//!
//! Everything that touches the network goes through [`HttpClient`], so the
//! pipeline can be driven by an in-memory client in tests.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use bytes::Bytes;
use tracing::debug;

use crate::error::FetchError;

/// Issues a GET for `url` and returns the full response body.
///
/// A non-success status is reported as [`FetchError::Network`]. The response
/// is owned by this function, so the connection is released on every return
/// path.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?.error_for_status()?;
    let body = resp.bytes().await?;

    debug!(url, bytes = body.len(), "Fetched response body");
    Ok(body)
}
