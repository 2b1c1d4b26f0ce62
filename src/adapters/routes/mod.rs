pub mod doctor;
pub mod health;
pub mod status;

use {
    crate::{
        domain::{
            audit::AuditContext,
            error::{Collection, ServiceError},
        },
        services::audit_logger::AuditLogger,
    },
    axum::Json,
    serde::Serialize,
    uuid::Uuid,
};

/// `{"success": true, "data": ...}` envelope used by every successful API
/// response.
pub fn success<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "data": data,
    }))
}

/// Path ids that are not UUIDs can never match a stored record.
pub fn parse_id(collection: Collection, raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::not_found(collection, raw))
}

/// Audit side effects of a request must not undo work that already
/// committed, so a failed audit write is logged instead of returned.
pub async fn audit_best_effort(audit: &AuditLogger, action: &str, context: AuditContext) {
    if let Err(err) = audit.record(action, context).await {
        tracing::warn!(target: "audit", action, error = %err, "failed to persist audit entry");
    }
}
