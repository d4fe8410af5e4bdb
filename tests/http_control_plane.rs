//! Facade-level tests for the control plane's request validation (§8
//! scenario 6). These exercise only the paths that fail before any sink
//! construction is attempted, since the Kafka/Postgres sinks need live
//! infrastructure the unit suite can't assume.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use eventer::http::{router, AppState};
use eventer_core::{DestinationDesc, DestinationKind, EventDesc, KafkaConfig};
use eventer_generator::GeneratorRegistry;
use eventer_kafka::KafkaSinkPool;
use eventer_sql::SqlSinkPool;
use tower::ServiceExt;

fn test_state() -> AppState {
    AppState {
        registry: Arc::new(GeneratorRegistry::new("test-instance")),
        kafka_pool: Arc::new(KafkaSinkPool::new(KafkaConfig::default())),
        sql_pool: Arc::new(SqlSinkPool::new(Default::default())),
    }
}

fn event(id: &str) -> EventDesc {
    EventDesc {
        id: id.to_string(),
        dataset: "ds".to_string(),
        schema: r#"{"id": get_integer(1, 1000)}"#.to_string(),
        count: 1,
        interval: "100ms".to_string(),
    }
}

fn destination(id: &str) -> DestinationDesc {
    DestinationDesc {
        id: id.to_string(),
        kind: DestinationKind::Kafka,
        kafka: Some(KafkaConfig {
            bootstrap_servers: "localhost:9092".to_string(),
            topic: "events".to_string(),
        }),
        postgres: None,
    }
}

async fn post(app: axum::Router, path: &str, body: serde_json::Value) -> StatusCode {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn add_rejects_unknown_event_id_with_no_registrations() {
    let app = router(test_state());
    let body = serde_json::json!({
        "events": [event("e1")],
        "destinations": [destination("d1")],
        "schedules": [{"destination_id": "d1", "event_id": "does-not-exist"}],
    });
    assert_eq!(post(app, "/generator/add", body).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_rejects_unknown_destination_id() {
    let app = router(test_state());
    let body = serde_json::json!({
        "events": [event("e1")],
        "destinations": [destination("d1")],
        "schedules": [{"destination_id": "does-not-exist", "event_id": "e1"}],
    });
    assert_eq!(post(app, "/generator/add", body).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_rejects_a_bad_second_schedule_before_registering_anything() {
    // Upfront validation runs across every schedule before registration
    // starts, so a bad reference later in the list still stops the whole
    // request with nothing registered.
    let app = router(test_state());
    let body = serde_json::json!({
        "events": [event("e1")],
        "destinations": [destination("d1")],
        "schedules": [
            {"destination_id": "d1", "event_id": "e1"},
            {"destination_id": "d1", "event_id": "does-not-exist"},
        ],
    });
    assert_eq!(post(app, "/generator/add", body).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remove_unknown_generator_is_not_found() {
    let app = router(test_state());
    let body = serde_json::json!({"id": "123456"});
    assert_eq!(post(app, "/generator/remove", body).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_of_unknown_generator_is_not_found() {
    let app = router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/generator/status?id=123456")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
