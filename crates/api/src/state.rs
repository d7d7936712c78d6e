use std::sync::Arc;

use guau_core::behavior::{AlertEvaluator, AlertQueryService, EventStore, PatternCatalog};
use guau_core::error::CoreError;
use guau_events::AlertBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: guau_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Decides whether a freshly recorded analysis raises an alert.
    pub evaluator: Arc<AlertEvaluator>,
    /// Owner-facing feed of recent severe analyses.
    pub alert_query: Arc<AlertQueryService>,
    /// Fan-out for raised alerts (email notifier subscribes).
    pub alert_bus: Arc<AlertBus>,
}

impl AppState {
    /// Build the catalog from `config.alerts` and wire the alert engine to
    /// `store`.
    pub fn new(
        pool: guau_db::DbPool,
        config: ServerConfig,
        store: Arc<dyn EventStore>,
        alert_bus: Arc<AlertBus>,
    ) -> Result<Self, CoreError> {
        let catalog = Arc::new(PatternCatalog::new(config.alerts.thresholds)?);
        let evaluator = AlertEvaluator::new(Arc::clone(&store), Arc::clone(&catalog))
            .with_query_timeout(config.alerts.query_timeout);
        let alert_query = AlertQueryService::new(store, catalog)
            .with_query_timeout(config.alerts.query_timeout);

        Ok(Self {
            pool,
            config: Arc::new(config),
            evaluator: Arc::new(evaluator),
            alert_query: Arc::new(alert_query),
            alert_bus,
        })
    }
}
