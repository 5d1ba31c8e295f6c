//! Record lookups used by the `unique` and `exists` validation rules.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RepoError;

/// Columns that validation rules may probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupColumn {
    UserEmail,
    UserId,
    PostSlug,
}

impl LookupColumn {
    /// `table.column` form, used in logs.
    pub fn qualified_name(&self) -> &'static str {
        match self {
            LookupColumn::UserEmail => "users.email",
            LookupColumn::UserId => "users.id",
            LookupColumn::PostSlug => "posts.slug",
        }
    }
}

/// A scalar extracted from a request body for a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupValue {
    Text(String),
    Integer(i64),
}

impl LookupValue {
    /// Convert a JSON scalar. Objects, arrays, booleans and null yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(LookupValue::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(LookupValue::Integer),
            _ => None,
        }
    }

    /// Interpret the value as an id, accepting numeric strings.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            LookupValue::Integer(id) => Some(*id),
            LookupValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            LookupValue::Text(s) => s.clone(),
            LookupValue::Integer(i) => i.to_string(),
        }
    }
}

/// Counts stored rows matching a column value.
///
/// Soft-deleted rows are counted too.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Count rows whose `column` equals `value`, skipping the row with id `except_id`.
    async fn count(
        &self,
        column: LookupColumn,
        value: &LookupValue,
        except_id: Option<i64>,
    ) -> Result<u64, RepoError>;
}
