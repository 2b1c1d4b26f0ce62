use {
    super::{audit_best_effort, parse_id, success},
    crate::{
        AppState,
        adapters::{
            api_errors::ApiError,
            extract::{AppJson, RequestMeta},
        },
        domain::{audit::AuditContext, error::Collection, id::Reference},
        services::feedback_recorder::FeedbackSubmission,
    },
    axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::{get, post},
    },
    serde::Deserialize,
};

pub const FEEDBACK_SUBMITTED: &str = "FEEDBACK_SUBMITTED";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[serde(default)]
    pub doctor: String,
    #[serde(default)]
    pub health_record: String,
    pub alert: Option<String>,
    pub usefulness: Option<String>,
    pub comments: Option<String>,
}

impl From<FeedbackRequest> for FeedbackSubmission {
    fn from(req: FeedbackRequest) -> Self {
        FeedbackSubmission {
            doctor: req.doctor,
            health_record: req.health_record,
            usefulness: req.usefulness,
            comments: req.comments,
            alert: req.alert,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(submit_feedback))
        .route("/feedback/{id}", get(get_feedback))
        .route("/audit/{id}", get(get_audit_entry))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    meta: RequestMeta,
    AppJson(req): AppJson<FeedbackRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let entry = state.feedback.record(req.into()).await?;

    let resource_id = Reference::new(entry.id().to_string())?;
    let mut context = AuditContext::default()
        .user(entry.doctor().clone())
        .resource("Feedback", resource_id);
    context.ip_address = meta.ip_address;
    context.user_agent = meta.user_agent;
    audit_best_effort(&state.audit, FEEDBACK_SUBMITTED, context).await;

    Ok((StatusCode::CREATED, success(&entry)))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(Collection::Feedback, &id)?;
    let entry = state.feedback.find(id).await?;
    Ok(success(&entry))
}

pub async fn get_audit_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(Collection::AuditLog, &id)?;
    let entry = state.audit.find(id).await?;
    Ok(success(&entry))
}
