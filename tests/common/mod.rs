#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, Response, header::CONTENT_TYPE},
};
use cardio_sentinel::AppState;
use cardio_sentinel::adapters::router::{ApiRoutes, Pipeline, build_app};
use cardio_sentinel::config::{Config, RateLimitConfig};
use cardio_sentinel::domain::audit::AuditEntry;
use cardio_sentinel::domain::error::{Collection, ServiceError};
use cardio_sentinel::domain::feedback::FeedbackEntry;
use cardio_sentinel::domain::store::{RecordStore, StoreFuture};
use cardio_sentinel::infra::memory::MemoryRecordStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const CLIENT_A: &str = "10.0.0.1:40000";
pub const CLIENT_B: &str = "10.0.0.2:40000";

/// Store whose backend is permanently unreachable.
pub struct DownStore;

fn down<T>() -> Result<T, ServiceError> {
    Err(ServiceError::Database(sqlx::Error::PoolTimedOut))
}

impl RecordStore for DownStore {
    fn insert_audit<'a>(&'a self, _entry: &'a AuditEntry) -> StoreFuture<'a, ()> {
        Box::pin(async { down() })
    }

    fn find_audit(&self, _id: Uuid) -> StoreFuture<'_, AuditEntry> {
        Box::pin(async { down() })
    }

    fn insert_feedback<'a>(&'a self, _entry: &'a FeedbackEntry) -> StoreFuture<'a, ()> {
        Box::pin(async { down() })
    }

    fn find_feedback(&self, _id: Uuid) -> StoreFuture<'_, FeedbackEntry> {
        Box::pin(async { down() })
    }
}

/// Store that accepts writes but whose stored rows fail to load.
pub struct CorruptStore;

pub const CORRUPT_DETAIL: &str =
    "usefulness must be one of useful, neutral, incorrect; got: maybe";

impl RecordStore for CorruptStore {
    fn insert_audit<'a>(&'a self, _entry: &'a AuditEntry) -> StoreFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }

    fn find_audit(&self, id: Uuid) -> StoreFuture<'_, AuditEntry> {
        Box::pin(async move {
            Err(ServiceError::corrupt(
                Collection::AuditLog,
                id,
                CORRUPT_DETAIL,
            ))
        })
    }

    fn insert_feedback<'a>(&'a self, _entry: &'a FeedbackEntry) -> StoreFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }

    fn find_feedback(&self, id: Uuid) -> StoreFuture<'_, FeedbackEntry> {
        Box::pin(async move {
            Err(ServiceError::corrupt(
                Collection::Feedback,
                id,
                CORRUPT_DETAIL,
            ))
        })
    }
}

pub fn config_with_limit(max_requests: u32, window: Duration) -> Config {
    Config {
        rate_limit: RateLimitConfig {
            max_requests,
            window,
        },
        ..Config::default()
    }
}

/// App wired the same way `main` does, with every request appearing to come
/// from `client`.
pub fn app_with(
    store: Arc<dyn RecordStore>,
    routes: ApiRoutes,
    config: &Config,
    client: &str,
) -> Router {
    let addr: SocketAddr = client.parse().expect("valid socket address");
    build_app(AppState::new(store), routes, Pipeline::new(config)).layer(MockConnectInfo(addr))
}

pub fn memory_app(config: &Config) -> (Arc<MemoryRecordStore>, Router) {
    let store = Arc::new(MemoryRecordStore::new());
    let app = app_with(store.clone(), ApiRoutes::default(), config, CLIENT_A);
    (store, app)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header("user-agent", "integration-test/1.0")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
