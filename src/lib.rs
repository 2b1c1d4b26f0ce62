pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use {
    domain::store::RecordStore,
    services::{audit_logger::AuditLogger, feedback_recorder::FeedbackRecorder},
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub audit: AuditLogger,
    pub feedback: FeedbackRecorder,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            audit: AuditLogger::new(store.clone()),
            feedback: FeedbackRecorder::new(store),
        }
    }
}
