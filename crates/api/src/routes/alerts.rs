//! Mounted at `/alerts` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/recent", get(alerts::recent_alerts))
}
