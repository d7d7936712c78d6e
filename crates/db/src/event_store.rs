//! Postgres-backed [`EventStore`].

use async_trait::async_trait;
use guau_core::behavior::{EventStore, SevereEvent, StoreError};
use guau_core::types::{DogId, OwnerId, Timestamp};

use crate::repositories::AnalysisRepo;
use crate::DbPool;

/// Serves alert history queries from the `analyses` table.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: DbPool,
}

impl PgEventStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Turn word roots into `ILIKE` substring patterns.
fn contains_patterns(roots: &[String]) -> Vec<String> {
    roots
        .iter()
        .map(|root| {
            let escaped = root
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
        .collect()
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn count_with_labels(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        labels: &[String],
        since: Timestamp,
    ) -> Result<i64, StoreError> {
        AnalysisRepo::count_with_labels(&self.pool, owner_id, dog_id, labels, since)
            .await
            .map_err(unavailable)
    }

    async fn count_matching_roots(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        roots: &[String],
        since: Timestamp,
    ) -> Result<i64, StoreError> {
        let patterns = contains_patterns(roots);
        AnalysisRepo::count_matching_patterns(&self.pool, owner_id, dog_id, &patterns, since)
            .await
            .map_err(unavailable)
    }

    async fn list_recent(
        &self,
        owner_id: OwnerId,
        labels: &[String],
        intensities: &[String],
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<SevereEvent>, StoreError> {
        let rows = AnalysisRepo::list_recent_severe(
            &self.pool,
            owner_id,
            labels,
            intensities,
            since,
            limit,
        )
        .await
        .map_err(unavailable)?;
        Ok(rows.into_iter().map(SevereEvent::from).collect())
    }
}
