//! Create records in batches.

use serde_json::{json, Map, Value};

use client::{Method, Pacing, Transport};

use crate::batch::{run_batched, BatchConfig};
use crate::record::TableScope;
use crate::{NodeError, OutputItem};

/// Create one record per input payload, batched.
///
/// Each result row is the created record merged with the submitted custom
/// fields under `customFields` — the create response does not echo them.
pub async fn create_records(
    transport: &dyn Transport,
    pacing: &dyn Pacing,
    scope: &TableScope,
    items: Vec<Map<String, Value>>,
    config: &BatchConfig,
) -> Result<Vec<OutputItem>, NodeError> {
    let items: Vec<(usize, Value)> = items
        .into_iter()
        .enumerate()
        .map(|(index, fields)| (index, Value::Object(fields)))
        .collect();

    let mut out = Vec::with_capacity(items.len());

    run_batched(
        items,
        config,
        pacing,
        |payloads| {
            let query = scope.query();
            async move {
                let response = transport
                    .request(
                        Method::POST,
                        "records",
                        Some(query),
                        Some(json!({ "data": payloads.clone() })),
                    )
                    .await?;

                let created = response
                    .get("data")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();

                Ok(payloads
                    .into_iter()
                    .enumerate()
                    .map(|(j, fields)| {
                        let mut row = created
                            .get(j)
                            .and_then(Value::as_object)
                            .cloned()
                            .unwrap_or_default();
                        row.insert("customFields".into(), fields);
                        Value::Object(row)
                    })
                    .collect())
            }
        },
        &mut out,
    )
    .await?;

    Ok(out)
}
