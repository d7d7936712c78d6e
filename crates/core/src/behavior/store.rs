//! Read-only contract for the classification event store.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{DbId, DogId, OwnerId, Timestamp};

/// Failure talking to the event store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The backing store rejected the query or could not be reached.
    #[error("Event store unavailable: {0}")]
    Unavailable(String),

    /// The query did not complete within the configured timeout.
    #[error("Event store query timed out after {0:?}")]
    Timeout(Duration),

    /// The window start falls outside the representable time range, so no
    /// query was issued.
    #[error("Query window of {0} reaches past the earliest representable time")]
    WindowOutOfRange(chrono::Duration),
}

/// A stored high-severity event, as listed for the owner's alert feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SevereEvent {
    pub id: DbId,
    pub dog_id: DogId,
    pub dog_name: Option<String>,
    pub emotional_state: String,
    pub intensity: String,
    pub interpreted_message: Option<String>,
    pub owner_recommendation: Option<String>,
    pub created_at: Timestamp,
}

/// Windowed, owner-scoped reads over classification events.
///
/// Label comparisons are case-insensitive; `labels`, `roots` and
/// `intensities` are always passed lowercase. `since` is exclusive.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Count events for the owner/dog pair whose emotional state equals one
    /// of `labels`.
    async fn count_with_labels(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        labels: &[String],
        since: Timestamp,
    ) -> Result<i64, StoreError>;

    /// Count events for the owner/dog pair whose emotional state contains any
    /// of `roots` as a substring.
    async fn count_matching_roots(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        roots: &[String],
        since: Timestamp,
    ) -> Result<i64, StoreError>;

    /// List the owner's events matching `labels` and `intensities`, newest
    /// first, at most `limit` rows.
    async fn list_recent(
        &self,
        owner_id: OwnerId,
        labels: &[String],
        intensities: &[String],
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<SevereEvent>, StoreError>;
}
