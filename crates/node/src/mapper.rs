//! Field-metadata → UI schema mapping.
//!
//! At workflow-design time the host asks for a table's columns as typed,
//! matchable form fields. Types the connector cannot safely round-trip
//! through a plain value map (attachments, formulas, lookups, computed and
//! audit columns) are marked read-only and removed from write forms.

use serde::Serialize;
use serde_json::{json, Value};

use client::{query_of, ClientError, Method, Transport};

use crate::types::{Field, FieldKind};
use crate::NodeError;

/// UI input type a mapped field is rendered as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UiFieldType {
    Boolean,
    Number,
    DateTime,
    Array,
    String,
    Options,
}

/// One option of a single-select dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub name: String,
    pub value: Value,
}

/// A remote column translated into a host form field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedField {
    /// Submission key (the remote field name).
    pub id: String,
    pub display_name: String,
    pub required: bool,
    pub default_match: bool,
    pub can_be_used_to_match: bool,
    pub display: bool,
    #[serde(rename = "type")]
    pub ui_type: UiFieldType,
    /// Present only for single-select dropdowns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    pub read_only: bool,
    pub removed: bool,
}

/// Fetch the table's columns and map them for a write form.
///
/// # Errors
/// [`NodeError::Config`] when the table has no fields to map — terminal for
/// the form, not retried.
pub async fn fetch_mapped_fields(
    transport: &dyn Transport,
    base_id: &str,
    table_id: &str,
    require_by_config: bool,
) -> Result<Vec<MappedField>, NodeError> {
    let fields = fetch_fields(transport, base_id, table_id).await?;
    Ok(fields
        .iter()
        .map(|field| map_field(field, require_by_config))
        .collect())
}

/// Same as [`fetch_mapped_fields`], with a synthetic `ID` field prepended as
/// the match key. Update and upsert forms use this variant: they must be
/// able to identify an existing record.
pub async fn fetch_mapped_fields_with_record_id(
    transport: &dyn Transport,
    base_id: &str,
    table_id: &str,
    require_by_config: bool,
) -> Result<Vec<MappedField>, NodeError> {
    let mut fields =
        fetch_mapped_fields(transport, base_id, table_id, require_by_config).await?;
    fields.insert(0, record_id_field());
    Ok(fields)
}

/// Fetch the raw column metadata for a table.
pub(crate) async fn fetch_fields(
    transport: &dyn Transport,
    base_id: &str,
    table_id: &str,
) -> Result<Vec<Field>, NodeError> {
    let query = query_of(json!({ "baseID": base_id, "tableID": table_id }));
    let response = transport
        .request(Method::GET, "fields", Some(query), None)
        .await?;

    let fields: Vec<Field> = match response.get("data") {
        Some(data) => serde_json::from_value(data.clone()).map_err(ClientError::from)?,
        None => Vec::new(),
    };

    if fields.is_empty() {
        return Err(NodeError::Config(
            "no fields could be found for this table".into(),
        ));
    }

    Ok(fields)
}

fn map_field(field: &Field, require_by_config: bool) -> MappedField {
    let kind = FieldKind::from_code(field.data_type);

    let mut options = None;
    let ui_type = match kind {
        Some(FieldKind::Checkbox) => UiFieldType::Boolean,
        Some(
            FieldKind::Number | FieldKind::Currency | FieldKind::Rating | FieldKind::Progress,
        ) => UiFieldType::Number,
        Some(FieldKind::Date) => UiFieldType::DateTime,
        Some(FieldKind::People | FieldKind::Reference) => UiFieldType::Array,
        Some(FieldKind::Dropdown) => {
            if is_multiple_select(&field.params) {
                UiFieldType::Array
            } else {
                options = Some(dropdown_options(&field.params));
                UiFieldType::Options
            }
        }
        // Every remaining known type, and any unknown code, round-trips as
        // text.
        Some(_) | None => UiFieldType::String,
    };

    let unsupported = matches!(
        kind,
        Some(
            FieldKind::Attachment
                | FieldKind::Formula
                | FieldKind::Lookup
                | FieldKind::LastModifiedBy
                | FieldKind::LastModifiedTime
                | FieldKind::CreatedBy
                | FieldKind::CreatedTime
                | FieldKind::AutoNumber
        )
    );

    MappedField {
        id: field.name.clone(),
        display_name: format!("{} (ID: {})", field.name, field.id),
        required: require_by_config && field.is_required,
        default_match: false,
        can_be_used_to_match: false,
        display: true,
        ui_type,
        options,
        read_only: unsupported,
        removed: unsupported,
    }
}

fn is_multiple_select(params: &Value) -> bool {
    params
        .get("isMultipleSelect")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn dropdown_options(params: &Value) -> Vec<SelectOption> {
    params
        .get("options")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|option| {
                    let name = option.get("name").and_then(Value::as_str)?.to_owned();
                    let value = option
                        .get("id")
                        .cloned()
                        .unwrap_or_else(|| Value::String(name.clone()));
                    Some(SelectOption { name, value })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn record_id_field() -> MappedField {
    MappedField {
        id: "id".into(),
        display_name: "ID".into(),
        required: true,
        default_match: true,
        can_be_used_to_match: true,
        display: true,
        ui_type: UiFieldType::String,
        options: None,
        read_only: false,
        removed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::mock::MockTransport;

    const BASE_ID: &str = "0BASE000000000000000000000";
    const TABLE_ID: &str = "0TAB0000000000000000000000";

    fn field(name: &str, data_type: u8, required: bool, params: Value) -> Value {
        json!({
            "id": format!("0FLD{:0>22}", name.len()),
            "name": name,
            "dataType": data_type,
            "isRequired": required,
            "params": params,
        })
    }

    fn transport_with_fields(fields: Vec<Value>) -> MockTransport {
        MockTransport::new().reply_value(json!({ "data": fields }))
    }

    #[tokio::test]
    async fn checkbox_maps_to_boolean() {
        let transport = transport_with_fields(vec![field("Done", 2, false, json!({}))]);

        let mapped = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, false)
            .await
            .unwrap();

        assert_eq!(mapped[0].ui_type, UiFieldType::Boolean);
        assert!(!mapped[0].read_only);
        assert!(!mapped[0].removed);
    }

    #[tokio::test]
    async fn attachment_is_always_read_only_and_removed() {
        let transport = transport_with_fields(vec![field("Files", 4, true, json!({}))]);

        let mapped = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, true)
            .await
            .unwrap();

        assert!(mapped[0].read_only);
        assert!(mapped[0].removed);
        assert_eq!(mapped[0].ui_type, UiFieldType::String);
    }

    #[tokio::test]
    async fn unknown_code_takes_the_string_fallback() {
        let transport = transport_with_fields(vec![field("Mystery", 99, false, json!({}))]);

        let mapped = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, false)
            .await
            .unwrap();

        assert_eq!(mapped[0].ui_type, UiFieldType::String);
        assert!(!mapped[0].read_only);
    }

    #[tokio::test]
    async fn required_needs_both_the_opt_in_and_the_field_flag() {
        let fields = vec![
            field("A", 1, true, json!({})),
            field("B", 1, false, json!({})),
        ];

        let transport = transport_with_fields(fields.clone());
        let mapped = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, true)
            .await
            .unwrap();
        assert!(mapped[0].required);
        assert!(!mapped[1].required);

        let transport = transport_with_fields(fields);
        let mapped = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, false)
            .await
            .unwrap();
        assert!(!mapped[0].required);
        assert!(!mapped[1].required);
    }

    #[tokio::test]
    async fn dropdown_select_mode_decides_the_type() {
        let transport = transport_with_fields(vec![
            field("Tags", 5, false, json!({ "isMultipleSelect": true })),
            field(
                "Status",
                5,
                false,
                json!({
                    "isMultipleSelect": false,
                    "options": [
                        { "id": 1, "name": "Open" },
                        { "id": 2, "name": "Closed" },
                    ],
                }),
            ),
        ]);

        let mapped = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, false)
            .await
            .unwrap();

        assert_eq!(mapped[0].ui_type, UiFieldType::Array);
        assert!(mapped[0].options.is_none());

        assert_eq!(mapped[1].ui_type, UiFieldType::Options);
        let options = mapped[1].options.as_ref().unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].name, "Open");
        assert_eq!(options[0].value, json!(1));
    }

    #[tokio::test]
    async fn record_id_variant_prepends_the_match_key() {
        let transport = transport_with_fields(vec![field("Name", 1, false, json!({}))]);

        let mapped = fetch_mapped_fields_with_record_id(&transport, BASE_ID, TABLE_ID, false)
            .await
            .unwrap();

        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].id, "id");
        assert!(mapped[0].required);
        assert!(mapped[0].default_match);
        assert!(mapped[0].can_be_used_to_match);
        assert_eq!(mapped[0].ui_type, UiFieldType::String);
        assert_eq!(mapped[1].id, "Name");
    }

    #[tokio::test]
    async fn empty_field_list_is_a_configuration_error() {
        let transport = transport_with_fields(Vec::new());

        let result = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, false).await;

        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[tokio::test]
    async fn display_name_carries_the_field_id() {
        let transport = transport_with_fields(vec![field("Name", 1, false, json!({}))]);

        let mapped = fetch_mapped_fields(&transport, BASE_ID, TABLE_ID, false)
            .await
            .unwrap();

        assert!(mapped[0].display_name.starts_with("Name (ID: "));
    }
}
