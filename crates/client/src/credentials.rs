//! Credential shape for the Gridbase open API.

use serde::{Deserialize, Serialize};

/// Default public endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://open.gridbase.io/api/v1";

/// API key + base URL pair used to authenticate every request.
///
/// The key becomes the `Authorization: Bearer <key>` header; the URL is the
/// prefix every relative endpoint is resolved against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Secret bearer token.
    pub api_key: String,
    /// Base URL for API requests.
    pub api_url: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
        }
    }

    /// Credentials against the default public endpoint.
    pub fn with_default_endpoint(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_API_ENDPOINT)
    }
}
