//! HTTP Client Utilities
//!
//! Shared HTTP client creation with consistent configuration.

use std::time::Duration;

use super::error::FetchError;

/// Per-request timeout for bundle downloads
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create a blocking reqwest HTTP client with standard configuration
///
/// - 30 second timeout
/// - `hearth/<version>` user agent
pub fn create_http_client() -> Result<reqwest::blocking::Client, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("hearth/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
