pub mod alerts;
pub mod dogs;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /dogs/{dog_id}/analyses          record analysis + evaluate (POST)
/// /dogs/{dog_id}/alerts/current    re-evaluate latest analysis (GET)
/// /alerts/recent                   severe events, last 24h (GET)
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dogs", dogs::router())
        .nest("/alerts", alerts::router())
}
