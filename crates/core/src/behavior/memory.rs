//! In-process [`EventStore`] backed by a vector.
//!
//! Mirrors the Postgres store's matching rules (lowercase equality, substring
//! roots, exclusive `since`). Counts every query it serves and can be told to
//! fail or stall, which makes it the store of choice for tests and local runs
//! without a database.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::store::{EventStore, SevereEvent, StoreError};
use crate::types::{DbId, DogId, OwnerId, Timestamp};

/// One classification event held by [`InMemoryEventStore`].
#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub id: DbId,
    pub owner_id: OwnerId,
    pub dog_id: DogId,
    pub dog_name: Option<String>,
    pub emotional_state: Option<String>,
    pub intensity: Option<String>,
    pub interpreted_message: Option<String>,
    pub owner_recommendation: Option<String>,
    pub created_at: Timestamp,
}

/// Append-only in-memory event store.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<StoredEvent>>,
    queries: AtomicUsize,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event with the given labels. Returns the assigned id.
    pub fn record(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        emotional_state: &str,
        intensity: &str,
        created_at: Timestamp,
    ) -> DbId {
        self.insert(StoredEvent {
            id: 0,
            owner_id,
            dog_id,
            dog_name: None,
            emotional_state: Some(emotional_state.to_string()),
            intensity: Some(intensity.to_string()),
            interpreted_message: None,
            owner_recommendation: None,
            created_at,
        })
    }

    /// Append a fully specified event. The `id` field is overwritten and
    /// labels are trimmed, as the Postgres store does on insert.
    pub fn insert(&self, mut event: StoredEvent) -> DbId {
        event.emotional_state = trimmed(event.emotional_state);
        event.intensity = trimmed(event.intensity);

        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let id = events.len() as DbId + 1;
        event.id = id;
        events.push(event);
        id
    }

    /// Make every subsequent query fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every subsequent query by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of queries served (or refused) so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn begin_query(&self) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let latency_ms = self.latency_ms.load(Ordering::SeqCst);
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn count_where(&self, predicate: impl Fn(&StoredEvent) -> bool) -> i64 {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events.iter().filter(|e| predicate(*e)).count() as i64
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn lowercase(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::to_lowercase)
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn count_with_labels(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        labels: &[String],
        since: Timestamp,
    ) -> Result<i64, StoreError> {
        self.begin_query().await?;
        Ok(self.count_where(|e| {
            e.owner_id == owner_id
                && e.dog_id == dog_id
                && e.created_at > since
                && lowercase(&e.emotional_state).is_some_and(|state| labels.contains(&state))
        }))
    }

    async fn count_matching_roots(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        roots: &[String],
        since: Timestamp,
    ) -> Result<i64, StoreError> {
        self.begin_query().await?;
        Ok(self.count_where(|e| {
            e.owner_id == owner_id
                && e.dog_id == dog_id
                && e.created_at > since
                && lowercase(&e.emotional_state)
                    .is_some_and(|state| roots.iter().any(|root| state.contains(root.as_str())))
        }))
    }

    async fn list_recent(
        &self,
        owner_id: OwnerId,
        labels: &[String],
        intensities: &[String],
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<SevereEvent>, StoreError> {
        self.begin_query().await?;

        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching: Vec<&StoredEvent> = events
            .iter()
            .filter(|e| {
                e.owner_id == owner_id
                    && e.created_at > since
                    && lowercase(&e.emotional_state).is_some_and(|s| labels.contains(&s))
                    && lowercase(&e.intensity).is_some_and(|i| intensities.contains(&i))
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|e| SevereEvent {
                id: e.id,
                dog_id: e.dog_id,
                dog_name: e.dog_name.clone(),
                emotional_state: e.emotional_state.clone().unwrap_or_default(),
                intensity: e.intensity.clone().unwrap_or_default(),
                interpreted_message: e.interpreted_message.clone(),
                owner_recommendation: e.owner_recommendation.clone(),
                created_at: e.created_at,
            })
            .collect())
    }
}
