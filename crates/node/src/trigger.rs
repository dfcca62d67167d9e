//! Webhook trigger lifecycle.
//!
//! Registration follows the host's hook callbacks: check whether a
//! subscription for this notification URL already exists, create one, tear
//! it down. Inbound deliveries carry only a pointer — the actual payload is
//! re-fetched by cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use client::{query_of, ClientError, Method, Transport};

use crate::NodeError;

/// Remote events a subscription can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "records:create")]
    RecordsCreate,
    #[serde(rename = "records:update")]
    RecordsUpdate,
    #[serde(rename = "records:delete")]
    RecordsDelete,
}

/// Subscription settings for one trigger node.
#[derive(Debug, Clone)]
pub struct TriggerSettings {
    pub base_id: String,
    pub table_id: String,
    /// Where the remote should POST notifications.
    pub notification_url: String,
    pub event_types: Vec<EventType>,
    /// Only fire when one of these fields changes.
    pub event_on_record_in_field_ids: Vec<String>,
    /// Include these fields' cell values in the notification payload.
    pub include_cell_values_in_field_ids: Vec<String>,
    /// Include the previous values of changed fields.
    pub include_previous_values: bool,
}

/// What the API hands back on subscription. The caller persists this: the
/// ID for teardown, the secret for signature checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRegistration {
    pub id: String,
    pub mac_secret_base64: String,
}

/// Whether a subscription pointing at `notification_url` already exists.
pub async fn webhook_exists(
    transport: &dyn Transport,
    base_id: &str,
    notification_url: &str,
) -> Result<bool, NodeError> {
    let query = query_of(json!({ "baseID": base_id }));
    let response = transport
        .request(Method::GET, "webhooks", Some(query), None)
        .await?;

    let hooks = response
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(hooks.iter().any(|hook| {
        hook.get("notificationUrl").and_then(Value::as_str) == Some(notification_url)
    }))
}

/// Create the subscription and return its registration.
pub async fn register_webhook(
    transport: &dyn Transport,
    settings: &TriggerSettings,
) -> Result<WebhookRegistration, NodeError> {
    let mut filters = Map::new();
    filters.insert(
        "eventTypes".into(),
        serde_json::to_value(&settings.event_types).map_err(ClientError::from)?,
    );
    filters.insert("eventOnTableIDs".into(), json!([settings.table_id]));
    if !settings.event_on_record_in_field_ids.is_empty() {
        filters.insert(
            "eventOnRecordInFieldIDs".into(),
            json!(settings.event_on_record_in_field_ids),
        );
    }

    let mut params = Map::new();
    params.insert("filters".into(), Value::Object(filters));

    let mut includes = Map::new();
    if !settings.include_cell_values_in_field_ids.is_empty() {
        includes.insert(
            "includeCellValuesInFieldIDs".into(),
            json!(settings.include_cell_values_in_field_ids),
        );
    }
    if settings.include_previous_values {
        includes.insert("includePreviousValues".into(), Value::Bool(true));
    }
    if !includes.is_empty() {
        params.insert("includes".into(), Value::Object(includes));
    }

    let body = json!({
        "notificationUrl": settings.notification_url,
        "params": params,
    });

    let query = query_of(json!({ "baseID": settings.base_id }));
    let response = transport
        .request(Method::POST, "webhooks", Some(query), Some(body))
        .await?;

    let registration: WebhookRegistration = match response.get("data") {
        Some(data) => serde_json::from_value(data.clone()).map_err(ClientError::from)?,
        None => {
            return Err(NodeError::Config(
                "webhook registration returned no data".into(),
            ))
        }
    };

    info!(webhook_id = %registration.id, "created webhook subscription");
    Ok(registration)
}

/// Tear the subscription down.
pub async fn unregister_webhook(
    transport: &dyn Transport,
    base_id: &str,
    webhook_id: &str,
) -> Result<(), NodeError> {
    let query = query_of(json!({ "baseID": base_id }));
    transport
        .request(
            Method::DELETE,
            &format!("webhooks/{webhook_id}"),
            Some(query),
            None,
        )
        .await?;

    info!(webhook_id, "deleted webhook subscription");
    Ok(())
}

/// One inbound push notification, as handed over by the embedding host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Delivery {
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub query: Map<String, Value>,
    #[serde(default)]
    pub body: Value,
}

/// Whether the run was started from a manual test or live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Test,
    Production,
}

/// What the trigger emits into the workflow for one delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEvent {
    pub headers: Map<String, Value>,
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Value,
    pub webhook_url: String,
    pub execution_mode: ExecutionMode,
    pub received_at: DateTime<Utc>,
    /// The re-fetched payload; `None` when the fetch failed or the
    /// notification carried no usable pointer. The delivery is acknowledged
    /// either way.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Handle one inbound delivery.
///
/// The notification body carries no payload, only `baseID`, `webhookID` and
/// a cursor; the payload is re-fetched through the API. Fetch failures are
/// swallowed so the delivery is always acknowledged.
pub async fn handle_delivery(
    transport: &dyn Transport,
    webhook_url: &str,
    execution_mode: ExecutionMode,
    delivery: Delivery,
) -> DeliveryEvent {
    let payload = fetch_delivery_payload(transport, &delivery.body).await;

    DeliveryEvent {
        headers: delivery.headers,
        params: delivery.params,
        query: delivery.query,
        body: delivery.body,
        webhook_url: webhook_url.to_owned(),
        execution_mode,
        received_at: Utc::now(),
        payload,
    }
}

async fn fetch_delivery_payload(transport: &dyn Transport, body: &Value) -> Option<Value> {
    let base_id = body.get("baseID").and_then(Value::as_str)?;
    let webhook_id = body.get("webhookID").and_then(Value::as_str)?;
    let cursor = body.get("cursor").cloned()?;

    let mut query = Map::new();
    query.insert("baseID".into(), Value::String(base_id.to_owned()));
    query.insert("cursor".into(), cursor);

    match transport
        .request(
            Method::GET,
            &format!("webhooks/payloads/{webhook_id}"),
            Some(query),
            None,
        )
        .await
    {
        Ok(payload) => Some(payload),
        Err(error) => {
            warn!(webhook_id, %error, "failed to fetch webhook payload, continuing without it");
            None
        }
    }
}
