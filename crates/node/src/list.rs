//! List search for the host's resource pickers.
//!
//! Bases and tables page through the API with the opaque session cursor.
//! Views ride on table metadata: table searches opportunistically fill the
//! view cache, and view searches consult it before falling back to the API.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::debug;

use client::{query_of, ClientError, Method, Query, Transport};

use crate::types::{Table, View};
use crate::NodeError;

/// How many entries one list page carries.
const LIST_PAGE_SIZE: u64 = 50;

/// Opaque continuation token for list searches. Echoed back verbatim; the
/// offset is only ever advanced by one page size per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCursor {
    pub session_id: Option<String>,
    pub offset: u64,
}

/// One pickable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub name: String,
    pub value: String,
}

/// A page of list-search results plus the cursor for the next page.
#[derive(Debug, Clone)]
pub struct ListSearchResult {
    pub results: Vec<ListItem>,
    pub cursor: Option<ListCursor>,
}

/// One field as a `{ name, value, description }` picker option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub name: String,
    pub value: String,
    pub description: String,
}

/// Process-lifetime table → views cache.
///
/// Filled opportunistically by [`table_search`] and read by [`view_search`].
/// There is no TTL and no automatic invalidation: if a table's views change
/// mid-session the cache serves the stale list until [`ViewCache::invalidate`]
/// or [`ViewCache::clear`] is called.
#[derive(Debug, Default)]
pub struct ViewCache {
    inner: Mutex<HashMap<String, Vec<View>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, table_id: String, views: Vec<View>) {
        self.lock().insert(table_id, views);
    }

    pub fn get(&self, table_id: &str) -> Option<Vec<View>> {
        self.lock().get(table_id).cloned()
    }

    /// Forget one table's views.
    pub fn invalidate(&self, table_id: &str) {
        self.lock().remove(table_id);
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<View>>> {
        self.inner.lock().expect("view cache mutex poisoned")
    }
}

/// Search bases by name.
pub async fn base_search(
    transport: &dyn Transport,
    filter: Option<&str>,
    cursor: Option<ListCursor>,
) -> Result<ListSearchResult, NodeError> {
    let (data, next) = search_listing(transport, "bases", Query::new(), cursor).await?;
    Ok(ListSearchResult {
        results: filter_items(&data, filter),
        cursor: next,
    })
}

/// Search a base's tables by name. The returned tables embed their views;
/// those are remembered so the view picker can skip a round-trip later.
pub async fn table_search(
    transport: &dyn Transport,
    cache: &ViewCache,
    base_id: &str,
    filter: Option<&str>,
    cursor: Option<ListCursor>,
) -> Result<ListSearchResult, NodeError> {
    let query = query_of(json!({ "baseID": base_id }));
    let (data, next) = search_listing(transport, "tables", query, cursor).await?;

    for entry in &data {
        if let Ok(table) = serde_json::from_value::<Table>(entry.clone()) {
            cache.store(table.id, table.views);
        }
    }

    Ok(ListSearchResult {
        results: filter_items(&data, filter),
        cursor: next,
    })
}

/// Search a table's views by name, from the cache when possible.
pub async fn view_search(
    transport: &dyn Transport,
    cache: &ViewCache,
    base_id: &str,
    table_id: &str,
    filter: Option<&str>,
) -> Result<ListSearchResult, NodeError> {
    let views = match cache.get(table_id) {
        Some(views) => views,
        None => {
            debug!(table_id, "view cache miss, fetching table");
            let query = query_of(json!({ "baseID": base_id }));
            let response = transport
                .request(Method::GET, &format!("tables/{table_id}"), Some(query), None)
                .await?;

            let views = match response.get("data") {
                Some(data) => {
                    let table: Table =
                        serde_json::from_value(data.clone()).map_err(ClientError::from)?;
                    table.views
                }
                None => Vec::new(),
            };

            cache.store(table_id.to_owned(), views.clone());
            views
        }
    };

    let results = views
        .into_iter()
        .filter(|view| matches_filter(&view.name, filter))
        .map(|view| ListItem {
            name: view.name,
            value: view.id,
        })
        .collect();

    Ok(ListSearchResult {
        results,
        cursor: None,
    })
}

/// List a table's fields as picker options.
pub async fn field_options(
    transport: &dyn Transport,
    base_id: &str,
    table_id: &str,
) -> Result<Vec<FieldOption>, NodeError> {
    let fields = crate::mapper::fetch_fields(transport, base_id, table_id).await?;
    Ok(fields
        .into_iter()
        .map(|field| FieldOption {
            name: field.name,
            value: field.id,
            description: field.description,
        })
        .collect())
}

/// One listing request. A missing `data` array ends the listing (no cursor);
/// otherwise the next cursor carries the response's session token and the
/// offset advanced by one page.
async fn search_listing(
    transport: &dyn Transport,
    endpoint: &str,
    mut query: Query,
    cursor: Option<ListCursor>,
) -> Result<(Vec<Value>, Option<ListCursor>), NodeError> {
    let mut page: u64 = 0;

    if let Some(cursor) = cursor {
        page = cursor.offset;
        if let Some(session_id) = cursor.session_id {
            query.insert("sessionID".into(), Value::String(session_id));
        }
        query.insert("page".into(), json!(page));
        query.insert("pageSize".into(), json!(LIST_PAGE_SIZE));
    }

    let response = transport
        .request(Method::GET, endpoint, Some(query), None)
        .await?;

    let data = match response.get("data").and_then(Value::as_array) {
        Some(data) => data.clone(),
        None => return Ok((Vec::new(), None)),
    };

    let session_id = response
        .get("sessionID")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok((
        data,
        Some(ListCursor {
            session_id,
            offset: page + LIST_PAGE_SIZE,
        }),
    ))
}

fn filter_items(data: &[Value], filter: Option<&str>) -> Vec<ListItem> {
    let mut results = Vec::new();

    for entry in data {
        let name = match entry.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => continue,
        };
        let id = match entry.get("id").and_then(Value::as_str) {
            Some(id) => id,
            None => continue,
        };

        if matches_filter(name, filter) {
            results.push(ListItem {
                name: name.to_owned(),
                value: id.to_owned(),
            });
        }
    }

    results
}

fn matches_filter(name: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) => name.to_lowercase().contains(&filter.to_lowercase()),
        None => true,
    }
}
