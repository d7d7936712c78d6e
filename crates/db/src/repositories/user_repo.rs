//! Repository for the `users` table.

use guau_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::UserContact;

pub struct UserRepo;

impl UserRepo {
    /// Load the notification contact for a user.
    pub async fn find_contact(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserContact>, sqlx::Error> {
        sqlx::query_as::<_, UserContact>("SELECT id, email, name FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
