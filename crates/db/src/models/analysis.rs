//! Analysis entity model and DTOs.

use guau_core::behavior::{ClassificationEvent, SevereEvent};
use guau_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `analyses` table: one interpreted vocalization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Analysis {
    pub id: DbId,
    pub user_id: DbId,
    pub dog_id: DbId,
    pub emotional_state: Option<String>,
    pub need: Option<String>,
    pub intensity: Option<String>,
    pub confidence: f64,
    pub interpreted_message: Option<String>,
    pub owner_recommendation: Option<String>,
    pub vocalization_type: Option<String>,
    pub created_at: Timestamp,
}

impl Analysis {
    /// The subset of this row the alert rules look at.
    pub fn to_event(&self) -> ClassificationEvent {
        ClassificationEvent::from_labels(
            self.emotional_state.as_deref(),
            self.intensity.as_deref(),
            self.owner_recommendation.clone(),
        )
    }
}

/// DTO for recording a classifier result.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnalysis {
    pub emotional_state: Option<String>,
    pub need: Option<String>,
    pub intensity: Option<String>,
    pub confidence: f64,
    pub interpreted_message: Option<String>,
    pub owner_recommendation: Option<String>,
    pub vocalization_type: Option<String>,
}

/// A severe analysis joined with its dog's name, for the alert feed.
#[derive(Debug, Clone, FromRow)]
pub struct SevereAnalysisRow {
    pub id: DbId,
    pub dog_id: DbId,
    pub dog_name: Option<String>,
    pub emotional_state: Option<String>,
    pub intensity: Option<String>,
    pub interpreted_message: Option<String>,
    pub owner_recommendation: Option<String>,
    pub created_at: Timestamp,
}

impl From<SevereAnalysisRow> for SevereEvent {
    fn from(row: SevereAnalysisRow) -> Self {
        SevereEvent {
            id: row.id,
            dog_id: row.dog_id,
            dog_name: row.dog_name,
            emotional_state: row.emotional_state.unwrap_or_default(),
            intensity: row.intensity.unwrap_or_default(),
            interpreted_message: row.interpreted_message,
            owner_recommendation: row.owner_recommendation,
            created_at: row.created_at,
        }
    }
}
