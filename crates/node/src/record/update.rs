//! Update records in batches.

use serde_json::{json, Map, Value};

use client::{Method, Pacing, Transport};

use crate::batch::{run_batched, BatchConfig};
use crate::item::remove_ignored_fields;
use crate::record::TableScope;
use crate::{NodeError, OutputItem};

/// One update: the record to modify and its replacement custom fields.
#[derive(Debug, Clone)]
pub struct UpdateRow {
    pub record_id: String,
    pub fields: Map<String, Value>,
}

/// Update one record per input row, batched.
///
/// `ignore_fields` strips fields from every payload before submission (used
/// when rows were auto-mapped from upstream items and carry columns the
/// caller does not want written).
pub async fn update_records(
    transport: &dyn Transport,
    pacing: &dyn Pacing,
    scope: &TableScope,
    rows: Vec<UpdateRow>,
    ignore_fields: &[String],
    config: &BatchConfig,
) -> Result<Vec<OutputItem>, NodeError> {
    let items: Vec<(usize, Value)> = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let fields = remove_ignored_fields(row.fields, ignore_fields);
            (index, json!({ "id": row.record_id, "customFields": fields }))
        })
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
                        Method::PATCH,
                        "records",
                        Some(query),
                        Some(json!({ "data": payloads.clone() })),
                    )
                    .await?;

                let updated = response
                    .get("data")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();

                Ok(payloads
                    .into_iter()
                    .enumerate()
                    .map(|(j, payload)| {
                        let mut row = updated
                            .get(j)
                            .and_then(Value::as_object)
                            .cloned()
                            .unwrap_or_default();
                        let fields = payload.get("customFields").cloned().unwrap_or(Value::Null);
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

#[cfg(test)]
mod tests {
    use super::*;
    use client::mock::MockTransport;
    use client::NoDelay;

    fn scope() -> TableScope {
        TableScope::new("0BASE000000000000000000000", "0TAB0000000000000000000000").unwrap()
    }

    fn row(id: &str, key: &str, value: &str) -> UpdateRow {
        let mut fields = Map::new();
        fields.insert(key.into(), json!(value));
        UpdateRow {
            record_id: id.into(),
            fields,
        }
    }

    #[tokio::test]
    async fn payloads_nest_fields_under_custom_fields() {
        let transport = MockTransport::new().reply_value(json!({
            "data": [{ "id": "0REC0000000000000000000001", "updatedAt": 9 }],
        }));

        let out = update_records(
            &transport,
            &NoDelay,
            &scope(),
            vec![row("0REC0000000000000000000001", "Name", "new")],
            &[],
            &BatchConfig::default(),
        )
        .await
        .unwrap();

        let calls = transport.calls();
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["data"][0]["id"], "0REC0000000000000000000001");
        assert_eq!(body["data"][0]["customFields"]["Name"], "new");

        assert_eq!(out[0].json["updatedAt"], 9);
        assert_eq!(out[0].json["customFields"]["Name"], "new");
    }

    #[tokio::test]
    async fn ignored_fields_never_reach_the_wire() {
        let transport = MockTransport::new().reply_value(json!({ "data": [{}] }));

        let mut fields = Map::new();
        fields.insert("Name".into(), json!("x"));
        fields.insert("Internal".into(), json!("y"));

        update_records(
            &transport,
            &NoDelay,
            &scope(),
            vec![UpdateRow {
                record_id: "0REC0000000000000000000001".into(),
                fields,
            }],
            &["Internal".to_string()],
            &BatchConfig::default(),
        )
        .await
        .unwrap();

        let calls = transport.calls();
        let submitted = &calls[0].body.as_ref().unwrap()["data"][0]["customFields"];
        assert!(submitted.get("Name").is_some());
        assert!(submitted.get("Internal").is_none());
    }
}
