//! Repository and event-store tests against a real database.
//!
//! Require `DATABASE_URL` pointing at a Postgres instance the test user can
//! create databases on. Run with `cargo test -p guau-db -- --ignored`.

use chrono::{Duration, Utc};
use guau_core::behavior::{
    AlertEvaluator, AlertQueryService, EventStore, Evaluation, InMemoryEventStore, PatternCatalog,
};
use guau_core::alert::AlertType;
use guau_db::models::analysis::CreateAnalysis;
use guau_db::repositories::{AnalysisRepo, DogRepo, UserRepo};
use guau_db::PgEventStore;
use sqlx::PgPool;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_owner(pool: &PgPool, email: &str, dog: &str) -> (i64, i64) {
    let user_id: i64 =
        sqlx::query_scalar("INSERT INTO users (email, name) VALUES ($1, 'Ana') RETURNING id")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap();
    let dog_id: i64 =
        sqlx::query_scalar("INSERT INTO dogs (user_id, name) VALUES ($1, $2) RETURNING id")
            .bind(user_id)
            .bind(dog)
            .fetch_one(pool)
            .await
            .unwrap();
    (user_id, dog_id)
}

fn analysis(state: &str, intensity: &str) -> CreateAnalysis {
    CreateAnalysis {
        emotional_state: Some(state.to_string()),
        need: None,
        intensity: Some(intensity.to_string()),
        confidence: 0.9,
        interpreted_message: Some("Ladrido corto".to_string()),
        owner_recommendation: Some("Revisa su pata".to_string()),
        vocalization_type: Some("bark".to_string()),
    }
}

async fn backdate(pool: &PgPool, id: i64, age: Duration) {
    sqlx::query("UPDATE analyses SET created_at = $2 WHERE id = $1")
        .bind(id)
        .bind(Utc::now() - age)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn create_and_fetch_latest(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;

    let first = AnalysisRepo::create(&pool, user_id, dog_id, &analysis("feliz", "baja"))
        .await
        .unwrap();
    backdate(&pool, first.id, Duration::minutes(5)).await;
    let second = AnalysisRepo::create(&pool, user_id, dog_id, &analysis("ansioso", "media"))
        .await
        .unwrap();

    let latest = AnalysisRepo::latest_for_dog(&pool, user_id, dog_id)
        .await
        .unwrap()
        .expect("latest analysis");
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.emotional_state.as_deref(), Some("ansioso"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn dog_lookup_is_owner_scoped(pool: PgPool) {
    let (owner, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    let (stranger, _) = seed_owner(&pool, "luis@example.com", "Nala").await;

    assert!(DogRepo::find_owned(&pool, dog_id, owner).await.unwrap().is_some());
    assert!(DogRepo::find_owned(&pool, dog_id, stranger).await.unwrap().is_none());

    let contact = UserRepo::find_contact(&pool, owner).await.unwrap().unwrap();
    assert_eq!(contact.email, "ana@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn label_counts_are_case_insensitive_and_windowed(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    AnalysisRepo::create(&pool, user_id, dog_id, &analysis("ANSIOSO", "media"))
        .await
        .unwrap();
    let old = AnalysisRepo::create(&pool, user_id, dog_id, &analysis("ansioso", "media"))
        .await
        .unwrap();
    backdate(&pool, old.id, Duration::hours(2)).await;

    let since = Utc::now() - Duration::hours(1);
    let count = AnalysisRepo::count_with_labels(
        &pool,
        user_id,
        dog_id,
        &["ansioso".to_string()],
        since,
    )
    .await
    .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Event store + engine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn chronic_anxiety_fires_from_postgres_history(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    for hours in [20, 15, 10, 5] {
        let row = AnalysisRepo::create(&pool, user_id, dog_id, &analysis("ansioso", "baja"))
            .await
            .unwrap();
        backdate(&pool, row.id, Duration::hours(hours)).await;
    }
    let current = AnalysisRepo::create(&pool, user_id, dog_id, &analysis("Anxious", "low"))
        .await
        .unwrap();

    let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool.clone()));
    let evaluator = AlertEvaluator::new(store, Arc::new(PatternCatalog::default()));
    let outcome = evaluator
        .evaluate(Some(user_id), Some(dog_id), &current.to_event())
        .await;

    match outcome {
        Evaluation::Alert(alert) => assert_eq!(alert.alert_type, AlertType::ChronicAnxiety),
        other => panic!("expected chronic anxiety alert, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn recent_feed_joins_dog_name(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    AnalysisRepo::create(&pool, user_id, dog_id, &analysis("dolorido", "alta"))
        .await
        .unwrap();
    AnalysisRepo::create(&pool, user_id, dog_id, &analysis("feliz", "alta"))
        .await
        .unwrap();

    let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool.clone()));
    let service = AlertQueryService::new(store, Arc::new(PatternCatalog::default()));
    let rows = service.recent_alerts(user_id).await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].dog_name.as_deref(), Some("Toby"));
    assert_eq!(rows[0].emotional_state, "dolorido");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn padded_labels_are_stored_trimmed(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    let row = AnalysisRepo::create(&pool, user_id, dog_id, &analysis(" scared ", "high "))
        .await
        .unwrap();
    assert_eq!(row.emotional_state.as_deref(), Some("scared"));
    assert_eq!(row.intensity.as_deref(), Some("high"));

    let store = PgEventStore::new(pool.clone());
    let count = store
        .count_with_labels(
            user_id,
            dog_id,
            &["scared".to_string()],
            Utc::now() - Duration::hours(1),
        )
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn postgres_and_memory_stores_agree(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    let memory = InMemoryEventStore::new();
    let now = Utc::now();
    for state in ["ANSIOSO", "anxious", "ansi_x", "a_%b", "a\\b", "Frustrado"] {
        AnalysisRepo::create(&pool, user_id, dog_id, &analysis(state, "media"))
            .await
            .unwrap();
        memory.record(user_id, dog_id, state, "media", now);
    }
    let postgres = PgEventStore::new(pool.clone());
    let since = now - Duration::hours(1);

    let roots = vec!["ansi".to_string(), "anxi".to_string(), "_%".to_string(), "\\".to_string()];
    for root in roots.chunks(1) {
        let pg = postgres
            .count_matching_roots(user_id, dog_id, root, since)
            .await
            .unwrap();
        let mem = memory
            .count_matching_roots(user_id, dog_id, root, since)
            .await
            .unwrap();
        assert_eq!(pg, mem, "root {root:?}");
    }

    let labels = vec!["ansioso".to_string(), "frustrado".to_string()];
    let pg = postgres
        .count_with_labels(user_id, dog_id, &labels, since)
        .await
        .unwrap();
    let mem = memory
        .count_with_labels(user_id, dog_id, &labels, since)
        .await
        .unwrap();
    assert_eq!(pg, 2);
    assert_eq!(pg, mem);
}
