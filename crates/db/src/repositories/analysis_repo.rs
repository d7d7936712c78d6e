//! Repository for the `analyses` table.
//!
//! Besides plain inserts and lookups this holds the windowed counts behind
//! the behavior alert rules. Label comparisons lowercase the stored value;
//! callers pass lowercase labels and patterns.

use guau_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::analysis::{Analysis, CreateAnalysis, SevereAnalysisRow};

/// Column list for `analyses` queries.
const COLUMNS: &str = "\
    id, user_id, dog_id, emotional_state, need, intensity, confidence, \
    interpreted_message, owner_recommendation, vocalization_type, created_at";

fn trimmed(label: &Option<String>) -> Option<&str> {
    label.as_deref().map(str::trim)
}

/// Provides persistence and history queries for analyses.
pub struct AnalysisRepo;

impl AnalysisRepo {
    /// Insert a new analysis, returning the full row. Vocabulary labels are
    /// stored trimmed so history counts see the same value the rules parse.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        dog_id: DbId,
        input: &CreateAnalysis,
    ) -> Result<Analysis, sqlx::Error> {
        let query = format!(
            "INSERT INTO analyses \
                (user_id, dog_id, emotional_state, need, intensity, confidence, \
                 interpreted_message, owner_recommendation, vocalization_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Analysis>(&query)
            .bind(user_id)
            .bind(dog_id)
            .bind(trimmed(&input.emotional_state))
            .bind(trimmed(&input.need))
            .bind(trimmed(&input.intensity))
            .bind(input.confidence)
            .bind(&input.interpreted_message)
            .bind(&input.owner_recommendation)
            .bind(trimmed(&input.vocalization_type))
            .fetch_one(pool)
            .await
    }

    /// The most recent analysis for a dog owned by `user_id`.
    pub async fn latest_for_dog(
        pool: &PgPool,
        user_id: DbId,
        dog_id: DbId,
    ) -> Result<Option<Analysis>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM analyses \
             WHERE user_id = $1 AND dog_id = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Analysis>(&query)
            .bind(user_id)
            .bind(dog_id)
            .fetch_optional(pool)
            .await
    }

    /// Count analyses for the user/dog pair created after `since` whose
    /// emotional state is one of `labels`.
    pub async fn count_with_labels(
        pool: &PgPool,
        user_id: DbId,
        dog_id: DbId,
        labels: &[String],
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM analyses \
             WHERE user_id = $1 AND dog_id = $2 \
               AND LOWER(emotional_state) = ANY($3) \
               AND created_at > $4",
        )
        .bind(user_id)
        .bind(dog_id)
        .bind(labels)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// Count analyses for the user/dog pair created after `since` whose
    /// emotional state matches any `ILIKE` pattern.
    pub async fn count_matching_patterns(
        pool: &PgPool,
        user_id: DbId,
        dog_id: DbId,
        patterns: &[String],
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM analyses \
             WHERE user_id = $1 AND dog_id = $2 \
               AND emotional_state ILIKE ANY($3) \
               AND created_at > $4",
        )
        .bind(user_id)
        .bind(dog_id)
        .bind(patterns)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// Severe analyses across all of the user's dogs, newest first.
    pub async fn list_recent_severe(
        pool: &PgPool,
        user_id: DbId,
        labels: &[String],
        intensities: &[String],
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<SevereAnalysisRow>, sqlx::Error> {
        sqlx::query_as::<_, SevereAnalysisRow>(
            "SELECT a.id, a.dog_id, d.name AS dog_name, a.emotional_state, a.intensity, \
                    a.interpreted_message, a.owner_recommendation, a.created_at \
             FROM analyses a \
             LEFT JOIN dogs d ON d.id = a.dog_id \
             WHERE a.user_id = $1 \
               AND LOWER(a.emotional_state) = ANY($2) \
               AND LOWER(a.intensity) = ANY($3) \
               AND a.created_at > $4 \
             ORDER BY a.created_at DESC, a.id DESC \
             LIMIT $5",
        )
        .bind(user_id)
        .bind(labels)
        .bind(intensities)
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
