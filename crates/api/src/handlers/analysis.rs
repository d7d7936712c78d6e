//! Handlers for recording classifier results and evaluating alerts.
//!
//! The analysis row is always persisted before evaluation so the windowed
//! rules count the event that triggered them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use guau_core::alert::BehaviorAlert;
use guau_core::error::CoreError;
use guau_core::types::{DbId, DogId, OwnerId};
use guau_core::validation::{validate_label, validate_unit_range};
use guau_db::models::analysis::{Analysis, CreateAnalysis};
use guau_db::models::dog::Dog;
use guau_db::repositories::{AnalysisRepo, DogRepo};
use guau_events::AlertNotice;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a recorded analysis.
#[derive(Debug, Serialize)]
pub struct RecordedAnalysis {
    pub analysis: Analysis,
    /// `null` when no rule fired or evaluation degraded.
    pub alert: Option<BehaviorAlert>,
}

/// Response body for an on-demand evaluation.
#[derive(Debug, Serialize)]
pub struct CurrentAlert {
    /// The analysis that was re-evaluated, `null` if the dog has none.
    pub analysis_id: Option<DbId>,
    pub alert: Option<BehaviorAlert>,
}

/// Reject payloads the classifier could not have produced.
fn validate_input(input: &CreateAnalysis) -> Result<(), CoreError> {
    validate_unit_range(input.confidence, "confidence")?;
    let labels = [
        (&input.emotional_state, "emotional_state"),
        (&input.intensity, "intensity"),
        (&input.need, "need"),
        (&input.vocalization_type, "vocalization_type"),
    ];
    for (value, name) in labels {
        if let Some(value) = value {
            validate_label(value, name)?;
        }
    }
    Ok(())
}

async fn find_owned_dog(state: &AppState, dog_id: DogId, owner_id: OwnerId) -> AppResult<Dog> {
    DogRepo::find_owned(&state.pool, dog_id, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Dog",
            id: dog_id,
        }))
}

// ---------------------------------------------------------------------------
// POST /dogs/{dog_id}/analyses
// ---------------------------------------------------------------------------

/// Record a classifier result for one of the caller's dogs, then evaluate
/// it. High-severity alerts are also published for owner notification.
pub async fn record_analysis(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(dog_id): Path<DogId>,
    Json(input): Json<CreateAnalysis>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let dog = find_owned_dog(&state, dog_id, auth.user_id).await?;

    let analysis = AnalysisRepo::create(&state.pool, auth.user_id, dog.id, &input).await?;
    tracing::info!(
        analysis_id = analysis.id,
        owner_id = auth.user_id,
        dog_id = dog.id,
        "Analysis recorded"
    );

    let alert = state
        .evaluator
        .evaluate(Some(auth.user_id), Some(dog.id), &analysis.to_event())
        .await
        .into_alert();

    if let Some(alert) = &alert {
        let notice = AlertNotice::new(
            auth.user_id,
            dog.id,
            analysis.id,
            analysis.emotional_state.clone(),
            alert.clone(),
            &state.config.public_base_url,
        );
        if notice.needs_notification() {
            state.alert_bus.publish(notice);
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RecordedAnalysis { analysis, alert },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /dogs/{dog_id}/alerts/current
// ---------------------------------------------------------------------------

/// Re-evaluate the dog's most recent analysis against current history.
pub async fn current_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(dog_id): Path<DogId>,
) -> AppResult<impl IntoResponse> {
    let dog = find_owned_dog(&state, dog_id, auth.user_id).await?;

    let Some(latest) = AnalysisRepo::latest_for_dog(&state.pool, auth.user_id, dog.id).await?
    else {
        return Ok(Json(DataResponse {
            data: CurrentAlert {
                analysis_id: None,
                alert: None,
            },
        }));
    };

    let alert = state
        .evaluator
        .evaluate(Some(auth.user_id), Some(dog.id), &latest.to_event())
        .await
        .into_alert();

    Ok(Json(DataResponse {
        data: CurrentAlert {
            analysis_id: Some(latest.id),
            alert,
        },
    }))
}
