//! Create-or-update records.
//!
//! There is no existence pre-check: every upsert is an update probe that
//! falls back to create only on the remote not-found signal, so each item
//! costs at most two round-trips and exactly one of them succeeds (or the
//! item fails).

use serde_json::{json, Map, Value};
use tracing::debug;

use client::{ClientError, Method, Pacing, Transport};

use crate::item::remove_ignored_fields;
use crate::record::{TableScope, UpdateRow};
use crate::{NodeError, OutputItem};

/// Upsert one record per input row, sequentially, pausing between items.
pub async fn upsert_records(
    transport: &dyn Transport,
    pacing: &dyn Pacing,
    scope: &TableScope,
    rows: Vec<UpdateRow>,
    ignore_fields: &[String],
    continue_on_fail: bool,
) -> Result<Vec<OutputItem>, NodeError> {
    let mut out = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let UpdateRow { record_id, fields } = row;
        let fields = remove_ignored_fields(fields, ignore_fields);

        match upsert_one(transport, scope, &record_id, &fields).await {
            Ok(response) => {
                // The write response does not echo the submitted fields;
                // merge them back in to rebuild the full row.
                let mut merged = response_row(response);
                merged.insert("customFields".into(), Value::Object(fields));
                out.push(OutputItem::new(index, Value::Object(merged)));
            }
            Err(error) => {
                if !continue_on_fail {
                    return Err(error.into());
                }
                out.push(OutputItem::from_error(index, error.to_string()));
            }
        }

        pacing.pause().await;
    }

    Ok(out)
}

async fn upsert_one(
    transport: &dyn Transport,
    scope: &TableScope,
    record_id: &str,
    fields: &Map<String, Value>,
) -> Result<Value, ClientError> {
    let update = json!({ "data": [{ "id": record_id, "customFields": fields }] });

    match transport
        .request(Method::PATCH, "records", Some(scope.query()), Some(update))
        .await
    {
        Ok(response) => Ok(response),
        Err(error) if error.is_not_found() => {
            debug!(record_id, "record not found on update, falling back to create");

            // The create payload carries the fields at the top level, not
            // nested under customFields.
            let mut created = Map::new();
            created.insert("id".into(), Value::String(record_id.to_owned()));
            created.extend(fields.clone());

            transport
                .request(
                    Method::POST,
                    "records",
                    Some(scope.query()),
                    Some(json!({ "data": [created] })),
                )
                .await
        }
        Err(error) => Err(error),
    }
}

/// The response record as an object: the first element of a `data` array, or
/// the `data` object itself.
fn response_row(response: Value) -> Map<String, Value> {
    let data = response.get("data").cloned().unwrap_or(Value::Null);
    match data {
        Value::Array(mut rows) if !rows.is_empty() => match rows.remove(0) {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::error::NOT_FOUND_MESSAGE;
    use client::mock::MockTransport;
    use client::NoDelay;

    const RECORD_ID: &str = "0REC0000000000000000000001";

    fn scope() -> TableScope {
        TableScope::new("0BASE000000000000000000000", "0TAB0000000000000000000000").unwrap()
    }

    fn rows() -> Vec<UpdateRow> {
        let mut fields = Map::new();
        fields.insert("Name".into(), json!("a"));
        vec![UpdateRow {
            record_id: RECORD_ID.into(),
            fields,
        }]
    }

    #[tokio::test]
    async fn not_found_update_falls_back_to_exactly_one_create() {
        let transport = MockTransport::new()
            .reply_api_error(404, NOT_FOUND_MESSAGE)
            .reply_value(json!({
                "data": [{ "id": RECORD_ID, "createdAt": 1 }],
            }));

        let out = upsert_records(&transport, &NoDelay, &scope(), rows(), &[], false)
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, Method::PATCH);
        assert_eq!(calls[1].method, Method::POST);

        // The update nests fields under customFields…
        let update = calls[0].body.as_ref().unwrap();
        assert_eq!(update["data"][0]["customFields"]["Name"], "a");

        // …but the create fallback merges them at the top level.
        let create = calls[1].body.as_ref().unwrap();
        assert_eq!(create["data"][0]["id"], RECORD_ID);
        assert_eq!(create["data"][0]["Name"], "a");
        assert!(create["data"][0].get("customFields").is_none());

        // The result row merges the response with the outgoing payload.
        assert_eq!(out[0].json["createdAt"], 1);
        assert_eq!(out[0].json["customFields"]["Name"], "a");
    }

    #[tokio::test]
    async fn other_update_failures_perform_no_create() {
        let transport = MockTransport::new().reply_api_error(500, "internal");

        let result = upsert_records(&transport, &NoDelay, &scope(), rows(), &[], false).await;

        assert!(matches!(result, Err(NodeError::Transport(_))));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn a_404_without_the_not_found_message_is_opaque() {
        let transport = MockTransport::new().reply_api_error(404, "gone forever");

        let result = upsert_records(&transport, &NoDelay, &scope(), rows(), &[], false).await;

        assert!(matches!(result, Err(NodeError::Transport(_))));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn continue_on_fail_yields_an_error_row_per_failed_item() {
        let transport = MockTransport::new()
            .reply_api_error(500, "internal")
            .reply_value(json!({ "data": [{ "id": RECORD_ID }] }));

        let mut fields = Map::new();
        fields.insert("Name".into(), json!("b"));
        let rows = vec![
            rows().remove(0),
            UpdateRow {
                record_id: RECORD_ID.into(),
                fields,
            },
        ];

        let out = upsert_records(&transport, &NoDelay, &scope(), rows, &[], true)
            .await
            .unwrap();

        assert_eq!(out.len(), 2);
        assert!(out[0].is_error());
        assert!(!out[1].is_error());
    }
}
