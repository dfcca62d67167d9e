//! Delete records in batches.

use serde_json::{json, Value};

use client::{ids, Method, Pacing, Transport};

use crate::batch::{run_batched, BatchConfig};
use crate::record::TableScope;
use crate::{NodeError, OutputItem};

/// Delete one record per input ID, batched.
///
/// The delete response carries nothing per-record, so result rows echo the
/// submitted IDs back as `{ "id": … }`.
pub async fn delete_records(
    transport: &dyn Transport,
    pacing: &dyn Pacing,
    scope: &TableScope,
    record_ids: Vec<String>,
    config: &BatchConfig,
) -> Result<Vec<OutputItem>, NodeError> {
    for record_id in &record_ids {
        if !ids::is_valid_resource_id(record_id) {
            return Err(NodeError::Config(format!(
                "'{record_id}' is not a valid record ID"
            )));
        }
    }

    let items: Vec<(usize, Value)> = record_ids
        .into_iter()
        .enumerate()
        .map(|(index, id)| (index, Value::String(id)))
        .collect();

    let mut out = Vec::with_capacity(items.len());

    run_batched(
        items,
        config,
        pacing,
        |payloads| {
            let query = scope.query();
            async move {
                transport
                    .request(
                        Method::DELETE,
                        "records",
                        Some(query),
                        Some(json!({ "id": payloads.clone() })),
                    )
                    .await?;

                Ok(payloads
                    .into_iter()
                    .map(|id| json!({ "id": id }))
                    .collect())
            }
        },
        &mut out,
    )
    .await?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::mock::MockTransport;
    use client::NoDelay;

    fn scope() -> TableScope {
        TableScope::new("0BASE000000000000000000000", "0TAB0000000000000000000000").unwrap()
    }

    #[tokio::test]
    async fn ids_travel_as_one_body_and_come_back_as_rows() {
        let transport = MockTransport::new().reply_value(json!({}));

        let out = delete_records(
            &transport,
            &NoDelay,
            &scope(),
            vec![
                "0REC0000000000000000000001".to_string(),
                "0REC0000000000000000000002".to_string(),
            ],
            &BatchConfig::default(),
        )
        .await
        .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body.as_ref().unwrap()["id"],
            json!([
                "0REC0000000000000000000001",
                "0REC0000000000000000000002"
            ])
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].json, json!({ "id": "0REC0000000000000000000001" }));
        assert_eq!(out[1].json, json!({ "id": "0REC0000000000000000000002" }));
    }

    #[tokio::test]
    async fn malformed_record_id_fails_before_any_request() {
        let transport = MockTransport::new();

        let result = delete_records(
            &transport,
            &NoDelay,
            &scope(),
            vec!["bogus".to_string()],
            &BatchConfig::default(),
        )
        .await;

        assert!(matches!(result, Err(NodeError::Config(_))));
        assert_eq!(transport.call_count(), 0);
    }
}
