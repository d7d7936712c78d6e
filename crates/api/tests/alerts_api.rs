//! Integration tests for the alert endpoints.
//!
//! The first group runs against the in-memory event store and needs no
//! database. The second group needs Postgres and is ignored by default; run
//! it with `cargo test -p guau-api -- --ignored`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{bearer, body_json, get, post_json};
use guau_core::behavior::{InMemoryEventStore, StoredEvent};
use serde_json::json;
use sqlx::PgPool;

fn severe_event(owner_id: i64, dog_id: i64, dog_name: &str, minutes_ago: i64) -> StoredEvent {
    StoredEvent {
        id: 0,
        owner_id,
        dog_id,
        dog_name: Some(dog_name.to_string()),
        emotional_state: Some("dolorido".to_string()),
        intensity: Some("alta".to_string()),
        interpreted_message: Some("Me duele la pata".to_string()),
        owner_recommendation: Some("Revisa su pata trasera".to_string()),
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

// ---------------------------------------------------------------------------
// GET /api/v1/alerts/recent (in-memory store)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recent_alerts_lists_only_callers_severe_events() {
    let store = Arc::new(InMemoryEventStore::new());
    store.insert(severe_event(1, 10, "Toby", 30));
    store.insert(severe_event(1, 11, "Nala", 5));
    store.insert(severe_event(2, 20, "Rex", 1));
    store.record(1, 10, "feliz", "alta", Utc::now());

    let (app, _bus) = common::build_memory_app(store);
    let auth = bearer(1);
    let response = get(app, "/api/v1/alerts/recent", Some(&auth)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().expect("data array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["dog_name"], "Nala");
    assert_eq!(rows[1]["dog_name"], "Toby");
    assert_eq!(rows[0]["emotional_state"], "dolorido");
}

#[tokio::test]
async fn recent_alerts_is_empty_when_store_fails() {
    let store = Arc::new(InMemoryEventStore::new());
    store.insert(severe_event(1, 10, "Toby", 1));
    store.set_unavailable(true);

    let (app, _bus) = common::build_memory_app(store);
    let auth = bearer(1);
    let response = get(app, "/api/v1/alerts/recent", Some(&auth)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn recent_alerts_is_empty_when_store_stalls() {
    let store = Arc::new(InMemoryEventStore::new());
    store.insert(severe_event(1, 10, "Toby", 1));
    store.set_latency(std::time::Duration::from_secs(10));

    let (app, _bus) = common::build_memory_app(store);
    let auth = bearer(1);
    let response = get(app, "/api/v1/alerts/recent", Some(&auth)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn recent_alerts_requires_authentication() {
    let (app, _bus) = common::build_memory_app(Arc::new(InMemoryEventStore::new()));
    let response = get(app, "/api/v1/alerts/recent", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn recent_alerts_rejects_bad_token() {
    let (app, _bus) = common::build_memory_app(Arc::new(InMemoryEventStore::new()));
    let response = get(app, "/api/v1/alerts/recent", Some("Bearer not-a-jwt")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// POST /api/v1/dogs/{dog_id}/analyses validation (no database reached)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn record_analysis_rejects_out_of_range_confidence() {
    let store = Arc::new(InMemoryEventStore::new());
    let (app, _bus) = common::build_memory_app(Arc::clone(&store));
    let auth = bearer(1);
    let body = json!({
        "emotional_state": "dolorido",
        "intensity": "alta",
        "confidence": 1.4
    });

    let response = post_json(app, "/api/v1/dogs/10/analyses", Some(&auth), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn record_analysis_requires_authentication() {
    let (app, _bus) = common::build_memory_app(Arc::new(InMemoryEventStore::new()));
    let body = json!({ "emotional_state": "ansioso", "confidence": 0.5 });

    let response = post_json(app, "/api/v1/dogs/10/analyses", None, body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Database-backed flows
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

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn severe_analysis_raises_immediate_alert_and_notice(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    let (app, bus) = common::build_test_app(pool);
    let mut notices = bus.subscribe();
    let auth = bearer(user_id);

    let body = json!({
        "emotional_state": "asustado",
        "intensity": "alta",
        "confidence": 0.92,
        "owner_recommendation": "Háblale con calma"
    });
    let uri = format!("/api/v1/dogs/{dog_id}/analyses");
    let response = post_json(app, &uri, Some(&auth), body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["alert"]["level"], "high");
    assert_eq!(json["data"]["alert"]["type"], "immediate_concern");
    assert_eq!(
        json["data"]["alert"]["message"],
        "⚠️ ASUSTADO con intensidad alta detectado"
    );
    assert_eq!(json["data"]["alert"]["recommendation"], "Háblale con calma");

    let notice = notices.try_recv().expect("high alert should be published");
    assert_eq!(notice.dog_id, dog_id);
    assert_eq!(
        notice.deep_link,
        format!("https://guau.test/share/{}", json["data"]["analysis"]["id"])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn third_stress_signal_raises_repeated_stress(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    let (app, bus) = common::build_test_app(pool);
    let mut notices = bus.subscribe();
    let auth = bearer(user_id);
    let uri = format!("/api/v1/dogs/{dog_id}/analyses");

    let mut last = serde_json::Value::Null;
    for state in ["ansioso", "frustrado", "ansioso"] {
        let body = json!({ "emotional_state": state, "intensity": "media", "confidence": 0.7 });
        let response = post_json(app.clone(), &uri, Some(&auth), body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        last = body_json(response).await;
    }

    assert_eq!(last["data"]["alert"]["type"], "repeated_stress");
    assert_eq!(last["data"]["alert"]["level"], "medium");
    assert!(notices.try_recv().is_err(), "medium alerts are not published");

    let current = get(
        app,
        &format!("/api/v1/dogs/{dog_id}/alerts/current"),
        Some(&auth),
    )
    .await;
    let current = body_json(current).await;
    assert_eq!(current["data"]["alert"]["type"], "repeated_stress");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn analyses_for_another_owners_dog_are_rejected(pool: PgPool) {
    let (_, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    let (stranger, _) = seed_owner(&pool, "luis@example.com", "Nala").await;
    let (app, _bus) = common::build_test_app(pool);
    let auth = bearer(stranger);

    let body = json!({ "emotional_state": "feliz", "confidence": 0.4 });
    let response = post_json(
        app,
        &format!("/api/v1/dogs/{dog_id}/analyses"),
        Some(&auth),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn current_alert_is_null_without_analyses(pool: PgPool) {
    let (user_id, dog_id) = seed_owner(&pool, "ana@example.com", "Toby").await;
    let (app, _bus) = common::build_test_app(pool);
    let auth = bearer(user_id);

    let response = get(
        app,
        &format!("/api/v1/dogs/{dog_id}/alerts/current"),
        Some(&auth),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["analysis_id"].is_null());
    assert!(json["data"]["alert"].is_null());
}
