//! Read path for the owner's recent high-severity events.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;

use super::catalog::PatternCatalog;
use super::evaluator::DEFAULT_QUERY_TIMEOUT;
use super::store::{EventStore, SevereEvent, StoreError};
use crate::emotion::Intensity;
use crate::types::{OwnerId, Timestamp};

/// Lists severe, high-intensity events for display.
///
/// Only immediate-concern style events surface here; windowed pattern
/// detections are never stored and so never listed.
#[derive(Clone)]
pub struct AlertQueryService {
    store: Arc<dyn EventStore>,
    catalog: Arc<PatternCatalog>,
    query_timeout: StdDuration,
}

impl AlertQueryService {
    pub fn new(store: Arc<dyn EventStore>, catalog: Arc<PatternCatalog>) -> Self {
        Self {
            store,
            catalog,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: StdDuration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub async fn recent_alerts(&self, owner_id: OwnerId) -> Vec<SevereEvent> {
        self.recent_alerts_at(owner_id, Utc::now()).await
    }

    /// Newest first, bounded by the catalog's window and limit. Store
    /// failures and timeouts yield an empty list.
    pub async fn recent_alerts_at(&self, owner_id: OwnerId, now: Timestamp) -> Vec<SevereEvent> {
        match self.load(owner_id, now).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(owner_id, error = %e, "Failed to load recent alerts");
                Vec::new()
            }
        }
    }

    async fn load(&self, owner_id: OwnerId, now: Timestamp) -> Result<Vec<SevereEvent>, StoreError> {
        let window = self.catalog.recent_window();
        let since = now
            .checked_sub_signed(window)
            .ok_or(StoreError::WindowOutOfRange(window))?;
        let labels = self.catalog.severe_emotions().labels();
        let intensities = Intensity::High.labels();

        let query = self.store.list_recent(
            owner_id,
            &labels,
            &intensities,
            since,
            self.catalog.recent_limit(),
        );

        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| StoreError::Timeout(self.query_timeout))?
    }
}
