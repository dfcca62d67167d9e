//! Batch executor for record-write operations.
//!
//! Items are accumulated in input order and flushed as one network call per
//! batch: after every K-th item and at the end of the stream. The response
//! array is fanned back by position — `response[j]` belongs to
//! `indexes[j]` — so result rows stay correlated with the caller's input
//! rows even though the call was per-batch. A pause between flushes keeps
//! the connector inside the remote rate limit.

use std::future::Future;

use serde_json::Value;
use tracing::{debug, warn};

use client::{ClientError, Pacing};

use crate::{NodeError, OutputItem};

/// Tuning knobs for the batch executor.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Flush after this many accumulated items.
    pub max_batch_size: usize,
    /// Abort the run on a failed batch (`false`), or emit per-item error
    /// rows for that batch and keep going (`true`).
    pub continue_on_fail: bool,
    /// Whether the inter-batch pause also follows the final flush.
    pub pause_after_last: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 20,
            continue_on_fail: false,
            pause_after_last: true,
        }
    }
}

/// One accumulated batch: `payloads[j]` came from input item `indexes[j]`.
#[derive(Debug, Default)]
pub struct Batch {
    pub indexes: Vec<usize>,
    pub payloads: Vec<Value>,
}

/// Run `dispatch` once per accumulated batch and fan the returned rows back
/// to their originating items.
///
/// `dispatch` receives the batch payloads and must return exactly one result
/// row per payload, in payload order. Rows are appended to `out` tagged with
/// the original item index. On a failed batch either every item of that
/// batch becomes an error row (`continue_on_fail`) or the error propagates —
/// `out` keeps the rows accumulated up to that point either way.
pub async fn run_batched<F, Fut>(
    items: Vec<(usize, Value)>,
    config: &BatchConfig,
    pacing: &dyn Pacing,
    mut dispatch: F,
    out: &mut Vec<OutputItem>,
) -> Result<(), NodeError>
where
    F: FnMut(Vec<Value>) -> Fut,
    Fut: Future<Output = Result<Vec<Value>, ClientError>>,
{
    let total = items.len();
    let mut batch = Batch::default();

    for (position, (index, payload)) in items.into_iter().enumerate() {
        batch.indexes.push(index);
        batch.payloads.push(payload);

        let submitted = position + 1;
        let is_last = submitted == total;

        if !is_last && submitted % config.max_batch_size != 0 {
            continue;
        }

        let indexes = std::mem::take(&mut batch.indexes);
        let payloads = std::mem::take(&mut batch.payloads);
        let batch_len = indexes.len();

        debug!(batch_len, submitted, total, "dispatching batch");

        match dispatch(payloads).await {
            Ok(rows) => {
                if rows.len() != batch_len {
                    return Err(NodeError::BatchShape {
                        expected: batch_len,
                        got: rows.len(),
                    });
                }
                for (index, row) in indexes.into_iter().zip(rows) {
                    out.push(OutputItem::new(index, row));
                }
            }
            Err(error) => {
                if !config.continue_on_fail {
                    return Err(error.into());
                }
                warn!(batch_len, %error, "batch failed, emitting error rows");
                for index in indexes {
                    out.push(OutputItem::from_error(index, error.to_string()));
                }
            }
        }

        if !is_last || config.pause_after_last {
            pacing.pause().await;
        }
    }

    Ok(())
}
