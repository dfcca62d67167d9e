//! Record operations.
//!
//! Every operation runs against a validated [`TableScope`] and returns
//! per-item [`crate::OutputItem`] rows in input order.

mod create;
mod delete;
mod get;
mod search;
mod update;
mod upsert;

pub use create::create_records;
pub use delete::delete_records;
pub use get::{get_records, GetOptions};
pub use search::{search_records, SearchOptions};
pub use update::{update_records, UpdateRow};
pub use upsert::upsert_records;

use serde_json::json;

use client::{ids, query_of, Query};

use crate::NodeError;

/// Validated base/table pair every record operation is scoped to.
#[derive(Debug, Clone)]
pub struct TableScope {
    pub base_id: String,
    pub table_id: String,
}

impl TableScope {
    /// # Errors
    /// [`NodeError::Config`] when either identifier is malformed.
    pub fn new(
        base_id: impl Into<String>,
        table_id: impl Into<String>,
    ) -> Result<Self, NodeError> {
        let base_id = base_id.into();
        let table_id = table_id.into();

        if !ids::is_valid_resource_id(&base_id) {
            return Err(NodeError::Config(format!(
                "'{base_id}' is not a valid base ID"
            )));
        }
        if !ids::is_valid_resource_id(&table_id) {
            return Err(NodeError::Config(format!(
                "'{table_id}' is not a valid table ID"
            )));
        }

        Ok(Self { base_id, table_id })
    }

    /// The query parameters shared by every record call.
    pub(crate) fn query(&self) -> Query {
        query_of(json!({ "baseID": self.base_id, "tableID": self.table_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_identifiers_are_rejected_up_front() {
        assert!(matches!(
            TableScope::new("not-an-id", "0TAB0000000000000000000000"),
            Err(NodeError::Config(_))
        ));
        assert!(matches!(
            TableScope::new("0BASE000000000000000000000", "nope"),
            Err(NodeError::Config(_))
        ));
        assert!(TableScope::new(
            "0BASE000000000000000000000",
            "0TAB0000000000000000000000"
        )
        .is_ok());
    }
}
