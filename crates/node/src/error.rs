//! Node-level error type.

use thiserror::Error;

/// Errors surfaced to the embedding host.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The node is misconfigured — malformed identifier, nothing to map.
    /// Terminal for the whole operation; hosts present it as a warning
    /// rather than a crash.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failure from the client crate.
    #[error("transport error: {0}")]
    Transport(#[from] client::ClientError),

    /// A batch response did not line up with the submitted payloads.
    #[error("batch response carried {got} rows for {expected} payloads")]
    BatchShape { expected: usize, got: usize },
}
