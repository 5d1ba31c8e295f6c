use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movie entity. Stands alone: no relations and no soft-delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub title: String,
    /// Free-text credit, not a reference to a user.
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieInput {
    pub name: String,
    pub title: String,
    pub author: String,
}
