//! Fetch single records.

use serde_json::Value;

use client::{ids, Method, Transport};

use crate::item::flatten_custom_fields;
use crate::record::TableScope;
use crate::{NodeError, OutputItem};

/// Output shaping options for a get.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Restrict the returned custom fields to these names/IDs.
    pub output_custom_fields: Option<Vec<String>>,
    /// Key custom fields by field ID instead of name.
    pub return_fields_by_field_id: Option<bool>,
    /// Merge `customFields` into the top level of the row.
    pub expand_custom_fields: bool,
}

/// Fetch one record per input ID, sequentially.
pub async fn get_records(
    transport: &dyn Transport,
    scope: &TableScope,
    record_ids: &[String],
    options: &GetOptions,
    continue_on_fail: bool,
) -> Result<Vec<OutputItem>, NodeError> {
    let mut out = Vec::with_capacity(record_ids.len());

    for (index, record_id) in record_ids.iter().enumerate() {
        match fetch_one(transport, scope, record_id, options).await {
            Ok(row) => out.push(OutputItem::new(index, row)),
            Err(error) => {
                if !continue_on_fail {
                    return Err(error);
                }
                out.push(OutputItem::from_error(index, error.to_string()));
            }
        }
    }

    Ok(out)
}

async fn fetch_one(
    transport: &dyn Transport,
    scope: &TableScope,
    record_id: &str,
    options: &GetOptions,
) -> Result<Value, NodeError> {
    if !ids::is_valid_resource_id(record_id) {
        return Err(NodeError::Config(format!(
            "'{record_id}' is not a valid record ID"
        )));
    }

    let mut query = scope.query();
    if let Some(fields) = &options.output_custom_fields {
        query.insert("customFields".into(), Value::String(fields.join(",")));
    }
    if let Some(by_id) = options.return_fields_by_field_id {
        query.insert("returnFieldsByFieldID".into(), Value::Bool(by_id));
    }

    let response = transport
        .request(Method::GET, &format!("records/{record_id}"), Some(query), None)
        .await?;

    let record = response.get("data").cloned().unwrap_or(Value::Null);

    Ok(if options.expand_custom_fields {
        flatten_custom_fields(record)
    } else {
        record
    })
}
