use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side record backing an issued bearer token.
///
/// A token stays valid for as long as this record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a new token record with a generated ID.
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
