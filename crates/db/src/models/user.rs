//! User contact projection.

use guau_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// The fields needed to notify an owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserContact {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
}
