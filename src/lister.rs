//! Retrieval of the list of CSV resources to process.

use tracing::info;

use crate::error::FetchError;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::stats::ResourceLocator;

/// Fetches `endpoint` and decodes its body as a JSON array of URLs.
///
/// Document order is preserved. There is no retry: without this list the
/// run cannot proceed, so callers treat any error here as fatal.
///
/// # Errors
///
/// [`FetchError::Network`] if the request fails, [`FetchError::Decode`] if
/// the body is not a JSON array of strings.
#[tracing::instrument(skip(client))]
pub async fn list_resources<C: HttpClient>(
    client: &C,
    endpoint: &str,
) -> Result<Vec<ResourceLocator>, FetchError> {
    let body = fetch_bytes(client, endpoint).await?;
    let locators: Vec<ResourceLocator> = serde_json::from_slice(&body)?;

    info!(count = locators.len(), "Resource list fetched");
    Ok(locators)
}
