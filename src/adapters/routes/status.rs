use {
    axum::Json,
    chrono::{SecondsFormat, Utc},
};

pub const STATUS_MESSAGE: &str = "Cardio Sentinel API is running";

/// Liveness probe. Never touches storage.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": STATUS_MESSAGE,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
