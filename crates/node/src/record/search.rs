//! Search records through the pagination walker.

use client::{fetch_records, ids, Pacing, RecordQuery, Transport};

use crate::item::flatten_custom_fields;
use crate::record::TableScope;
use crate::{NodeError, OutputItem};

/// Output shaping for a search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Restrict to a saved view.
    pub view_id: Option<String>,
    /// Key custom fields by field ID instead of name.
    pub return_fields_by_field_id: bool,
    /// Merge each record's `customFields` into the top level.
    pub expand_custom_fields: bool,
    /// Stop after this many records.
    pub limit: Option<usize>,
}

/// List matching records in the exact order the API returns them.
pub async fn search_records(
    transport: &dyn Transport,
    pacing: &dyn Pacing,
    scope: &TableScope,
    options: &SearchOptions,
) -> Result<Vec<OutputItem>, NodeError> {
    if let Some(view_id) = &options.view_id {
        if !ids::is_valid_resource_id(view_id) {
            return Err(NodeError::Config(format!(
                "'{view_id}' is not a valid view ID"
            )));
        }
    }

    let mut query = RecordQuery::new(&scope.base_id, &scope.table_id);
    query.view_id = options.view_id.clone();
    query.return_fields_by_field_id = options.return_fields_by_field_id;
    query.limit = options.limit;

    let records = fetch_records(transport, pacing, &query).await?;

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let row = if options.expand_custom_fields {
                flatten_custom_fields(record)
            } else {
                record
            };
            OutputItem::new(index, row)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use client::mock::MockTransport;
    use client::NoDelay;

    fn scope() -> TableScope {
        TableScope::new("0BASE000000000000000000000", "0TAB0000000000000000000000").unwrap()
    }

    #[tokio::test]
    async fn expansion_applies_to_every_row() {
        let transport = MockTransport::new().reply_value(json!({
            "data": [
                { "id": "0REC0000000000000000000001", "customFields": { "Name": "a" } },
                { "id": "0REC0000000000000000000002", "customFields": { "Name": "b" } },
            ],
            "sessionID": "s1",
        }));

        let options = SearchOptions {
            expand_custom_fields: true,
            ..SearchOptions::default()
        };

        let out = search_records(&transport, &NoDelay, &scope(), &options)
            .await
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].json["Name"], "a");
        assert_eq!(out[1].json["Name"], "b");
        assert!(out[0].json.get("customFields").is_none());
    }

    #[tokio::test]
    async fn malformed_view_id_fails_before_any_request() {
        let transport = MockTransport::new();

        let options = SearchOptions {
            view_id: Some("bogus".into()),
            ..SearchOptions::default()
        };

        let result = search_records(&transport, &NoDelay, &scope(), &options).await;

        assert!(matches!(result, Err(NodeError::Config(_))));
        assert_eq!(transport.call_count(), 0);
    }
}
