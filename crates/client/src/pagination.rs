//! Record pagination walker.
//!
//! The API reports no total count: a page shorter than the requested size
//! is the sole termination signal. Each page's session token is carried to
//! the next request verbatim, and records accumulate in exactly the order
//! the API returns them.

use serde_json::{json, Value};
use tracing::debug;

use crate::pacing::Pacing;
use crate::transport::{query_of, Method, Transport};
use crate::ClientError;

/// Hard upper bound the API places on `pageSize`.
pub const MAX_PAGE_SIZE: usize = 50;

/// A record listing query.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    pub base_id: String,
    pub table_id: String,
    /// Restrict to a saved view.
    pub view_id: Option<String>,
    /// Key custom fields by field ID instead of name.
    pub return_fields_by_field_id: bool,
    /// Stop after this many records. `None` walks the full table.
    pub limit: Option<usize>,
}

impl RecordQuery {
    pub fn new(base_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            table_id: table_id.into(),
            view_id: None,
            return_fields_by_field_id: false,
            limit: None,
        }
    }
}

/// Fetch every record matching `query`, up to the optional limit.
///
/// Requests `pageSize = min(remaining, 50)` per page and keeps walking only
/// while pages come back exactly full. A limit of zero issues no requests.
pub async fn fetch_records(
    transport: &dyn Transport,
    pacing: &dyn Pacing,
    query: &RecordQuery,
) -> Result<Vec<Value>, ClientError> {
    let mut records: Vec<Value> = Vec::new();
    let mut page: u64 = 1;
    let mut session_id: Option<String> = None;

    loop {
        let remaining = match query.limit {
            Some(limit) => limit.saturating_sub(records.len()),
            None => usize::MAX,
        };
        let page_size = remaining.min(MAX_PAGE_SIZE);
        if page_size == 0 {
            break;
        }

        if page > 1 {
            pacing.pause().await;
        }

        let mut qs = query_of(json!({
            "baseID": query.base_id,
            "tableID": query.table_id,
            "returnFieldsByFieldID": query.return_fields_by_field_id,
            "page": page,
            "pageSize": page_size,
        }));
        if let Some(view_id) = &query.view_id {
            qs.insert("viewID".into(), Value::String(view_id.clone()));
        }
        if let Some(session_id) = &session_id {
            qs.insert("sessionID".into(), Value::String(session_id.clone()));
        }

        let response = transport
            .request(Method::GET, "records", Some(qs), None)
            .await?;

        let data = response
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let fetched = data.len();
        records.extend(data);

        debug!(page, fetched, total = records.len(), "fetched record page");

        // Anything other than an exactly-full page means the end.
        if fetched != page_size {
            break;
        }

        session_id = response
            .get("sessionID")
            .and_then(Value::as_str)
            .map(str::to_owned);
        page += 1;
    }

    // A page can only overshoot the limit if the API ignores pageSize; the
    // contract is "up to the limit" regardless.
    if let Some(limit) = query.limit {
        records.truncate(limit);
    }

    Ok(records)
}
