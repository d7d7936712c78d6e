//! Guau alert fan-out and owner notification.
//!
//! - [`AlertBus`]: in-process publish/subscribe hub for [`AlertNotice`]s,
//!   backed by `tokio::sync::broadcast`.
//! - [`AlertNotifier`]: background task that emails owners about
//!   high-severity alerts.
//! - [`delivery`]: external delivery channels (SMTP email).

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{AlertBus, AlertNotice};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use notifier::AlertNotifier;
