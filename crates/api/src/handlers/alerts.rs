//! Owner alert feed.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /alerts/recent
// ---------------------------------------------------------------------------

/// Severe, high-intensity analyses across the caller's dogs from the last
/// 24 hours, newest first. Store failures produce an empty list.
pub async fn recent_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let events = state.alert_query.recent_alerts(auth.user_id).await;
    Ok(Json(DataResponse { data: events }))
}
