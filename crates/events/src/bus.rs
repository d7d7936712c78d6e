//! In-process alert bus backed by a `tokio::sync::broadcast` channel.
//!
//! The request that raised an alert publishes an [`AlertNotice`] and returns;
//! delivery happens on whichever tasks subscribed. Shared as `Arc<AlertBus>`.

use chrono::{DateTime, Utc};
use guau_core::alert::{AlertLevel, BehaviorAlert};
use guau_core::types::{DbId, DogId, OwnerId};
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// AlertNotice
// ---------------------------------------------------------------------------

/// An alert raised for one analysis, with everything a notifier needs
/// besides the owner's contact details.
#[derive(Debug, Clone, Serialize)]
pub struct AlertNotice {
    pub owner_id: OwnerId,
    pub dog_id: DogId,
    pub analysis_id: DbId,
    /// Raw emotional state label of the triggering analysis.
    pub emotional_state: Option<String>,
    pub alert: BehaviorAlert,
    /// Link to the shareable analysis page.
    pub deep_link: String,
    pub raised_at: DateTime<Utc>,
}

impl AlertNotice {
    pub fn new(
        owner_id: OwnerId,
        dog_id: DogId,
        analysis_id: DbId,
        emotional_state: Option<String>,
        alert: BehaviorAlert,
        public_base_url: &str,
    ) -> Self {
        Self {
            owner_id,
            dog_id,
            analysis_id,
            emotional_state,
            alert,
            deep_link: share_link(public_base_url, analysis_id),
            raised_at: Utc::now(),
        }
    }

    /// Only high-severity alerts leave the app.
    pub fn needs_notification(&self) -> bool {
        self.alert.level == AlertLevel::High
    }
}

/// `{base}/share/{analysis_id}`, tolerating a trailing slash on `base`.
pub fn share_link(public_base_url: &str, analysis_id: DbId) -> String {
    format!(
        "{}/share/{analysis_id}",
        public_base_url.trim_end_matches('/')
    )
}

// ---------------------------------------------------------------------------
// AlertBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for [`AlertNotice`]s.
pub struct AlertBus {
    sender: broadcast::Sender<AlertNotice>,
}

impl AlertBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers that fall more than `capacity` notices behind observe
    /// `RecvError::Lagged` and lose the oldest notices.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notice to all current subscribers.
    pub fn publish(&self, notice: AlertNotice) {
        // Only fails when nobody is subscribed.
        if self.sender.send(notice).is_err() {
            tracing::debug!("Alert notice dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertNotice> {
        self.sender.subscribe()
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
