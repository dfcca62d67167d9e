//! Remote resource shapes.
//!
//! These mirror what the API returns; anything without a fixed schema
//! (record bodies, type-specific field params) stays `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A top-level workspace container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub id: String,
    pub name: String,
}

/// A table, with its views embedded the way the listing endpoint returns
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub views: Vec<View>,
}

/// A saved filter/sort configuration over a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    pub name: String,
}

/// One column definition within a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Wire code of the declared data type; see [`FieldKind`].
    pub data_type: u8,
    #[serde(default)]
    pub is_required: bool,
    /// Type-specific parameters (dropdown options, select mode, …).
    #[serde(default)]
    pub params: Value,
}

/// Remote field data types, by wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
    Paragraph,
    Attachment,
    Dropdown,
    Number,
    Date,
    Phone,
    Link,
    Email,
    Currency,
    People,
    Rating,
    Progress,
    Reference,
    Formula,
    Lookup,
    LastModifiedBy,
    LastModifiedTime,
    CreatedBy,
    CreatedTime,
    AutoNumber,
}

impl FieldKind {
    /// Decode the wire code. Code 17 is unassigned; unknown codes return
    /// `None` and take the string fallback downstream.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::Text,
            2 => Self::Checkbox,
            3 => Self::Paragraph,
            4 => Self::Attachment,
            5 => Self::Dropdown,
            6 => Self::Number,
            7 => Self::Date,
            8 => Self::Phone,
            9 => Self::Link,
            10 => Self::Email,
            11 => Self::Currency,
            12 => Self::People,
            13 => Self::Rating,
            14 => Self::Progress,
            15 => Self::Reference,
            16 => Self::Formula,
            18 => Self::Lookup,
            19 => Self::LastModifiedBy,
            20 => Self::LastModifiedTime,
            21 => Self::CreatedBy,
            22 => Self::CreatedTime,
            23 => Self::AutoNumber,
            _ => return None,
        })
    }
}
