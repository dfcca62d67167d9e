//! Client-level error type.

use thiserror::Error;

/// Message the API attaches to a 404 for a record that does not exist.
/// Together with the status code it forms the one failure the connector
/// treats as control flow (the upsert create fallback).
pub const NOT_FOUND_MESSAGE: &str = "The requested resource could not be found.";

/// Errors returned by the transport layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response body could not be read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not the JSON shape this client understands.
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// `true` only for a 404 carrying the remote not-found message.
    ///
    /// Any other failure — including a 404 with a different message — is
    /// opaque and must be propagated unchanged.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::Api { status: 404, message } if message.contains(NOT_FOUND_MESSAGE)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_requires_status_and_message() {
        let hit = ClientError::Api {
            status: 404,
            message: format!("404 - {NOT_FOUND_MESSAGE}"),
        };
        assert!(hit.is_not_found());

        let wrong_message = ClientError::Api {
            status: 404,
            message: "forbidden".into(),
        };
        assert!(!wrong_message.is_not_found());

        let wrong_status = ClientError::Api {
            status: 500,
            message: NOT_FOUND_MESSAGE.into(),
        };
        assert!(!wrong_status.is_not_found());
    }
}
