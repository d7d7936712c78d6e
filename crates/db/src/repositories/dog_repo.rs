//! Repository for the `dogs` table.

use guau_core::types::DbId;
use sqlx::PgPool;

use crate::models::dog::Dog;

const COLUMNS: &str = "id, user_id, name, breed, created_at, updated_at";

pub struct DogRepo;

impl DogRepo {
    /// Find a dog by ID, only if it belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        dog_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Dog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dogs WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Dog>(&query)
            .bind(dog_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
