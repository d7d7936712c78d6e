//! Rule-chain evaluation for a single classification event.
//!
//! The evaluator walks the [`PatternCatalog`] in priority order and stops at
//! the first rule that fires. Immediate rules are decided from the event
//! alone; windowed rules issue one owner/dog scoped count against the
//! [`EventStore`]. The triggering event must already be persisted so that
//! windowed counts include it.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;

use super::catalog::{HistoryMatcher, PatternCatalog, RuleKind};
use super::event::ClassificationEvent;
use super::store::{EventStore, StoreError};
use crate::alert::{AlertType, BehaviorAlert};
use crate::types::{DogId, OwnerId, Timestamp};

/// Upper bound for a single history query before it counts as failed.
pub const DEFAULT_QUERY_TIMEOUT: StdDuration = StdDuration::from_secs(2);

/// Result of evaluating one event.
///
/// Callers that only care about the alert use [`Evaluation::into_alert`],
/// which collapses every non-alert outcome to `None`.
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// A rule fired.
    Alert(BehaviorAlert),
    /// Every rule was checked and none fired.
    Clear,
    /// Owner or dog identity was missing; nothing was checked.
    Skipped,
    /// A history query failed, so evaluation stopped at `alert_type`.
    Degraded {
        alert_type: AlertType,
        error: StoreError,
    },
}

impl Evaluation {
    pub fn into_alert(self) -> Option<BehaviorAlert> {
        match self {
            Evaluation::Alert(alert) => Some(alert),
            Evaluation::Clear | Evaluation::Skipped | Evaluation::Degraded { .. } => None,
        }
    }

    pub fn alert(&self) -> Option<&BehaviorAlert> {
        match self {
            Evaluation::Alert(alert) => Some(alert),
            _ => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Evaluation::Degraded { .. })
    }
}

/// Decides whether a new classification event warrants an alert.
///
/// Stateless between calls: the same stored history evaluated at the same
/// instant always yields the same [`Evaluation`].
#[derive(Clone)]
pub struct AlertEvaluator {
    store: Arc<dyn EventStore>,
    catalog: Arc<PatternCatalog>,
    query_timeout: StdDuration,
}

impl AlertEvaluator {
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

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Evaluate `event` against history ending now.
    pub async fn evaluate(
        &self,
        owner_id: Option<OwnerId>,
        dog_id: Option<DogId>,
        event: &ClassificationEvent,
    ) -> Evaluation {
        self.evaluate_at(owner_id, dog_id, event, Utc::now()).await
    }

    /// Evaluate `event` against history windows ending at `now`.
    pub async fn evaluate_at(
        &self,
        owner_id: Option<OwnerId>,
        dog_id: Option<DogId>,
        event: &ClassificationEvent,
        now: Timestamp,
    ) -> Evaluation {
        let (Some(owner_id), Some(dog_id)) = (owner_id, dog_id) else {
            return Evaluation::Skipped;
        };

        for rule in self.catalog.rules() {
            let fired = match &rule.kind {
                RuleKind::Immediate { .. } => rule.matches_event(event),
                RuleKind::WindowedCount {
                    window,
                    threshold,
                    matcher,
                } => {
                    let counted = match now.checked_sub_signed(*window) {
                        Some(since) => self.count(owner_id, dog_id, matcher, since).await,
                        None => Err(StoreError::WindowOutOfRange(*window)),
                    };
                    match counted {
                        Ok(count) => count >= *threshold,
                        Err(error) => {
                            tracing::warn!(
                                owner_id,
                                dog_id,
                                alert_type = %rule.alert_type,
                                error = %error,
                                "Alert history query failed, skipping remaining rules"
                            );
                            return Evaluation::Degraded {
                                alert_type: rule.alert_type,
                                error,
                            };
                        }
                    }
                }
            };

            if fired {
                tracing::debug!(owner_id, dog_id, alert_type = %rule.alert_type, "Alert rule fired");
                return Evaluation::Alert(rule.build_alert(event));
            }
        }

        Evaluation::Clear
    }

    async fn count(
        &self,
        owner_id: OwnerId,
        dog_id: DogId,
        matcher: &HistoryMatcher,
        since: Timestamp,
    ) -> Result<i64, StoreError> {
        let query = async {
            match matcher {
                HistoryMatcher::Emotions(set) => {
                    self.store
                        .count_with_labels(owner_id, dog_id, &set.labels(), since)
                        .await
                }
                HistoryMatcher::Roots(roots) => {
                    self.store
                        .count_matching_roots(owner_id, dog_id, roots, since)
                        .await
                }
            }
        };

        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| StoreError::Timeout(self.query_timeout))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
