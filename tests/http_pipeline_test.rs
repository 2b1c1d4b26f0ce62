mod common;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use axum::routing;
use cardio_sentinel::AppState;
use cardio_sentinel::adapters::router::{AUTH_PREFIX, ApiRoutes, Pipeline, build_app};
use cardio_sentinel::config::Config;
use cardio_sentinel::infra::memory::MemoryRecordStore;
use common::*;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

// ── health check ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_check_reports_running() {
    let (_store, app) = memory_app(&Config::default());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Cardio Sentinel API is running");
    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{ts}");
}

#[tokio::test]
async fn health_check_ignores_storage_outage() {
    let app = app_with(
        Arc::new(DownStore),
        ApiRoutes::default(),
        &Config::default(),
        CLIENT_A,
    );

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);
}

// ── middleware ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn responses_carry_security_headers() {
    let (_store, app) = memory_app(&Config::default());

    let response = app.oneshot(get("/health")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (_store, app) = memory_app(&Config::default());

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://dashboard.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let (_store, app) = memory_app(&Config::default());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/doctor/feedback")
        .header(header::ORIGIN, "https://dashboard.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS)
    );
}

// ── rate limiting ──────────────────────────────────────────────────────────

#[tokio::test]
async fn quota_exhaustion_returns_429() {
    let config = config_with_limit(3, Duration::from_secs(600));
    let (_store, app) = memory_app(&config);

    for _ in 0..3 {
        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 600);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "rate_limited");
}

#[tokio::test]
async fn rate_limited_request_has_no_side_effects() {
    let config = config_with_limit(1, Duration::from_secs(600));
    let (store, app) = memory_app(&config);
    let feedback = serde_json::json!({"doctor": "docA", "healthRecord": "recB"});

    let response = app
        .clone()
        .oneshot(post_json("/api/doctor/feedback", feedback.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.feedback_count(), 1);
    assert_eq!(store.audit_count(), 1);

    let response = app
        .oneshot(post_json("/api/doctor/feedback", feedback))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(store.feedback_count(), 1);
    assert_eq!(store.audit_count(), 1);
}

#[tokio::test]
async fn clients_have_separate_quotas() {
    let config = config_with_limit(1, Duration::from_secs(600));
    // No MockConnectInfo here: each request carries its own peer address.
    let app = build_app(
        AppState::new(Arc::new(MemoryRecordStore::new())),
        ApiRoutes::default(),
        Pipeline::new(&config),
    );

    let from = |client: &str| {
        let addr: SocketAddr = client.parse().unwrap();
        let mut request = get("/health");
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    };

    let a = app.clone().oneshot(from(CLIENT_A)).await.unwrap();
    let b = app.clone().oneshot(from(CLIENT_B)).await.unwrap();
    let a_again = app.oneshot(from(CLIENT_A)).await.unwrap();

    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);
    assert_eq!(a_again.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn injected_peer_addresses_are_rate_limited_separately() {
    let config = config_with_limit(1, Duration::from_secs(600));
    let pipeline = Pipeline::new(&config);
    let state = AppState::new(Arc::new(MemoryRecordStore::new()));
    let app_for = |client: &str| {
        let addr: SocketAddr = client.parse().unwrap();
        build_app(state.clone(), ApiRoutes::default(), pipeline.clone())
            .layer(MockConnectInfo(addr))
    };
    let (a, b) = (app_for(CLIENT_A), app_for(CLIENT_B));

    let first_a = a.clone().oneshot(get("/health")).await.unwrap();
    let first_b = b.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(first_a.status(), StatusCode::OK);
    assert_eq!(first_b.status(), StatusCode::OK);
    assert_eq!(
        a.oneshot(get("/health")).await.unwrap().status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
        b.oneshot(get("/health")).await.unwrap().status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(pipeline.limiter.tracked_clients(), 2);
}

#[tokio::test(start_paused = true)]
async fn quota_recovers_after_window() {
    let config = config_with_limit(2, Duration::from_secs(600));
    let (_store, app) = memory_app(&config);

    for _ in 0..2 {
        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    tokio::time::advance(Duration::from_secs(601)).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ── routing & error handling ───────────────────────────────────────────────

#[tokio::test]
async fn unmounted_prefix_is_uniform_404() {
    let (_store, app) = memory_app(&Config::default());

    for uri in ["/api/auth/login", "/api/alerts", "/api/dashboard/summary", "/nope"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "not_found");
    }
}

async fn whoami() -> &'static str {
    "auth collaborator"
}

async fn explode() -> &'static str {
    panic!("secret internal detail")
}

#[tokio::test]
async fn mounted_collaborator_receives_its_prefix() {
    let routes = ApiRoutes::default().mount(
        AUTH_PREFIX,
        Router::new().route("/whoami", routing::get(whoami)),
    );
    let app = app_with(
        Arc::new(MemoryRecordStore::new()),
        routes,
        &Config::default(),
        CLIENT_A,
    );

    let response = app.oneshot(get("/api/auth/whoami")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"auth collaborator");
}

#[tokio::test]
async fn handler_panic_becomes_generic_500() {
    let routes = ApiRoutes::default().mount(
        AUTH_PREFIX,
        Router::new().route("/explode", routing::get(explode)),
    );
    let app = app_with(
        Arc::new(MemoryRecordStore::new()),
        routes,
        &Config::default(),
        CLIENT_A,
    );

    let response = app.oneshot(get("/api/auth/explode")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error_code"], "internal_error");
    assert!(!body.to_string().contains("secret internal detail"));
}

#[tokio::test]
async fn storage_failure_hides_detail() {
    let app = app_with(
        Arc::new(DownStore),
        ApiRoutes::default(),
        &Config::default(),
        CLIENT_A,
    );

    let response = app
        .oneshot(post_json(
            "/api/doctor/feedback",
            serde_json::json!({"doctor": "docA", "healthRecord": "recB"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "internal error");
    assert!(!body.to_string().contains("pool"));
}

#[tokio::test]
async fn unreadable_stored_record_is_internal_error() {
    let app = app_with(
        Arc::new(CorruptStore),
        ApiRoutes::default(),
        &Config::default(),
        CLIENT_A,
    );
    let id = uuid::Uuid::now_v7();

    for uri in [
        format!("/api/doctor/feedback/{id}"),
        format!("/api/doctor/audit/{id}"),
    ] {
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "internal_error");
        assert_eq!(body["message"], "internal error");
        assert!(!body.to_string().contains("maybe"));
    }
}

#[tokio::test]
async fn malformed_json_is_validation_error() {
    let (store, app) = memory_app(&Config::default());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/doctor/feedback")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "validation_error");
    assert_eq!(store.feedback_count(), 0);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = Config {
        body_limit: 64,
        ..Config::default()
    };
    let (store, app) = memory_app(&config);

    let response = app
        .oneshot(post_json(
            "/api/doctor/feedback",
            serde_json::json!({
                "doctor": "docA",
                "healthRecord": "recB",
                "comments": "x".repeat(256),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error_code"], "validation_error");
    assert_eq!(store.feedback_count(), 0);
}
