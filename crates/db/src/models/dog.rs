//! Dog entity model.

use guau_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `dogs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dog {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub breed: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
