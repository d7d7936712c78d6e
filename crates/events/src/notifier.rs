//! Owner notification service.
//!
//! [`AlertNotifier`] subscribes to the [`AlertBus`](crate::bus::AlertBus) and
//! emails the owner for every high-severity notice. Lookups and delivery
//! failures are logged and dropped; nothing flows back to the request that
//! raised the alert. The loop ends when the bus is dropped.

use guau_db::repositories::{DogRepo, UserRepo};
use guau_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::AlertNotice;
use crate::delivery::email::EmailDelivery;

/// Name used in the email when the dog row has gone missing.
const FALLBACK_DOG_NAME: &str = "Tu perro";

/// Background service that turns alert notices into owner emails.
pub struct AlertNotifier {
    pool: DbPool,
    email: Option<EmailDelivery>,
}

impl AlertNotifier {
    /// `email` is `None` when SMTP is not configured; notices are then
    /// logged and skipped.
    pub fn new(pool: DbPool, email: Option<EmailDelivery>) -> Self {
        Self { pool, email }
    }

    /// Run the notification loop until the bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<AlertNotice>) {
        loop {
            match receiver.recv().await {
                Ok(notice) => self.handle(&notice).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Alert notifier lagged, some owners were not notified");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Alert bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    async fn handle(&self, notice: &AlertNotice) {
        if !notice.needs_notification() {
            return;
        }
        let Some(email) = &self.email else {
            tracing::debug!(
                owner_id = notice.owner_id,
                analysis_id = notice.analysis_id,
                "SMTP not configured, skipping alert email"
            );
            return;
        };

        if let Err(e) = self.notify(email, notice).await {
            tracing::error!(
                error = %e,
                owner_id = notice.owner_id,
                analysis_id = notice.analysis_id,
                "Failed to send behavior alert email"
            );
        }
    }

    async fn notify(&self, email: &EmailDelivery, notice: &AlertNotice) -> Result<(), NotifyError> {
        let Some(contact) = UserRepo::find_contact(&self.pool, notice.owner_id).await? else {
            tracing::warn!(owner_id = notice.owner_id, "Alert owner not found, skipping email");
            return Ok(());
        };
        let dog_name = DogRepo::find_owned(&self.pool, notice.dog_id, notice.owner_id)
            .await?
            .map(|dog| dog.name)
            .unwrap_or_else(|| FALLBACK_DOG_NAME.to_string());

        email
            .deliver_behavior_alert(&contact.email, &dog_name, notice)
            .await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum NotifyError {
    #[error("Recipient lookup failed: {0}")]
    Lookup(#[from] sqlx::Error),

    #[error(transparent)]
    Email(#[from] crate::delivery::email::EmailError),
}
