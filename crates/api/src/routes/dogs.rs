//! Mounted at `/dogs` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// ```text
/// POST   /{dog_id}/analyses         -> record_analysis
/// GET    /{dog_id}/alerts/current   -> current_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{dog_id}/analyses", post(analysis::record_analysis))
        .route("/{dog_id}/alerts/current", get(analysis::current_alert))
}
