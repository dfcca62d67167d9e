//! The transport seam — one authenticated HTTP request per call.
//!
//! [`Transport`] is the boundary every higher layer talks through; the
//! production implementation is [`HttpTransport`], tests substitute
//! [`crate::mock::MockTransport`]. There is no retry, no backoff and no
//! timeout override: pacing between sequential calls is the caller's job
//! (see [`crate::pacing`]).

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{ClientError, Credentials};

pub use reqwest::Method;

/// Query-string parameters for one request.
pub type Query = Map<String, Value>;

/// Turns a `json!({ … })` object literal into a [`Query`].
///
/// Non-object values yield an empty query.
pub fn query_of(value: Value) -> Query {
    match value {
        Value::Object(map) => map,
        _ => Query::new(),
    }
}

/// Issues API requests on behalf of the connector.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request against a relative `endpoint` and return the
    /// decoded JSON body.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<Query>,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;
}

/// Production transport: resolves stored credentials and issues exactly one
/// bearer-authenticated JSON request to `{base_url}/{endpoint}`.
pub struct HttpTransport {
    http: reqwest::Client,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<Query>,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = format!(
            "{}/{}",
            self.credentials.api_url.trim_end_matches('/'),
            endpoint
        );

        debug!(%method, endpoint, "dispatching api request");

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.credentials.api_key))
            .header(CONTENT_TYPE, "application/json");

        if let Some(query) = &query {
            request = request.query(&query_pairs(query));
        }

        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Flattens JSON query values into the string pairs the URL carries.
/// Strings go through verbatim; everything else is rendered as JSON.
fn query_pairs(query: &Query) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

/// Pulls the human-readable message out of a JSON error body, falling back
/// to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}
