use {
    super::{audit_best_effort, success},
    crate::{
        AppState,
        adapters::{
            api_errors::ApiError,
            extract::{AppJson, RequestMeta},
        },
        domain::{
            analysis::{HealthRecord, Vitals, calculate_cardio_risk, detect_trends},
            audit::{AuditContext, Metadata},
            id::Reference,
        },
    },
    axum::{Json, Router, extract::State, routing::post},
    serde::{Deserialize, Serialize},
};

pub const RISK_ANALYZED: &str = "RISK_ANALYZED";
pub const TRENDS_ANALYZED: &str = "TRENDS_ANALYZED";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub patient_id: Reference,
    pub record_data: Vitals,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongitudinalRequest {
    pub patient_id: Reference,
    pub records: Vec<HealthRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RiskResponse {
    patient_id: Reference,
    risk_score: u32,
    risk_factors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendResponse {
    patient_id: Reference,
    trends: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/trends", post(trends))
}

fn patient_context(patient: &Reference, meta: RequestMeta, metadata: Metadata) -> AuditContext {
    let mut context = AuditContext::default()
        .resource("Patient", patient.clone())
        .metadata(metadata);
    context.ip_address = meta.ip_address;
    context.user_agent = meta.user_agent;
    context
}

pub async fn analyze(
    State(state): State<AppState>,
    meta: RequestMeta,
    AppJson(req): AppJson<AnalyzeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let risk = calculate_cardio_risk(&req.record_data);

    let mut metadata = Metadata::new();
    metadata.insert("riskScore".into(), risk.risk_score.into());
    audit_best_effort(
        &state.audit,
        RISK_ANALYZED,
        patient_context(&req.patient_id, meta, metadata),
    )
    .await;

    Ok(success(RiskResponse {
        patient_id: req.patient_id,
        risk_score: risk.risk_score,
        risk_factors: risk.risk_factors,
    }))
}

pub async fn trends(
    State(state): State<AppState>,
    meta: RequestMeta,
    AppJson(req): AppJson<LongitudinalRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let trends = detect_trends(&req.records);

    let mut metadata = Metadata::new();
    metadata.insert("records".into(), req.records.len().into());
    metadata.insert("trendCount".into(), trends.len().into());
    audit_best_effort(
        &state.audit,
        TRENDS_ANALYZED,
        patient_context(&req.patient_id, meta, metadata),
    )
    .await;

    Ok(success(TrendResponse {
        patient_id: req.patient_id,
        trends,
    }))
}
