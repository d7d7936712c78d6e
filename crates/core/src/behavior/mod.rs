//! Behavioral alert engine.
//!
//! Decides, for each freshly recorded classification, whether the owner
//! should be alerted. Rules are evaluated in fixed priority order by
//! [`evaluator::AlertEvaluator`]; the display path for recent severe events is
//! [`recent::AlertQueryService`]. History is read through the
//! [`store::EventStore`] trait so the engine never touches SQL directly.

pub mod catalog;
pub mod evaluator;
pub mod event;
pub mod memory;
pub mod recent;
pub mod store;

pub use catalog::{HistoryMatcher, PatternCatalog, PatternRule, PatternThresholds, RuleKind};
pub use evaluator::{AlertEvaluator, Evaluation, DEFAULT_QUERY_TIMEOUT};
pub use event::ClassificationEvent;
pub use memory::{InMemoryEventStore, StoredEvent};
pub use recent::AlertQueryService;
pub use store::{EventStore, SevereEvent, StoreError};
