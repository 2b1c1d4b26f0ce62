use {
    crate::domain::error::ServiceError,
    crate::domain::feedback::{FeedbackEntry, Usefulness},
    crate::domain::id::Reference,
    crate::domain::store::RecordStore,
    std::sync::Arc,
    uuid::Uuid,
};

/// Raw feedback as submitted by a reviewer, before validation.
#[derive(Debug, Clone, Default)]
pub struct FeedbackSubmission {
    pub doctor: String,
    pub health_record: String,
    pub usefulness: Option<String>,
    pub comments: Option<String>,
    pub alert: Option<String>,
}

impl FeedbackSubmission {
    pub fn new(doctor: impl Into<String>, health_record: impl Into<String>) -> Self {
        Self {
            doctor: doctor.into(),
            health_record: health_record.into(),
            ..Self::default()
        }
    }

    pub fn usefulness(mut self, usefulness: impl Into<String>) -> Self {
        self.usefulness = Some(usefulness.into());
        self
    }

    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    pub fn alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = Some(alert.into());
        self
    }

    fn validate(self) -> Result<FeedbackEntry, ServiceError> {
        let doctor = Reference::new(self.doctor)
            .map_err(|_| ServiceError::Validation("doctor is required".into()))?;
        let health_record = Reference::new(self.health_record)
            .map_err(|_| ServiceError::Validation("healthRecord is required".into()))?;
        let alert = self.alert.map(Reference::new).transpose()?;
        let usefulness = self
            .usefulness
            .as_deref()
            .map(Usefulness::try_from)
            .transpose()?;

        Ok(FeedbackEntry::new(
            doctor,
            health_record,
            usefulness,
            self.comments,
            alert,
        ))
    }
}

/// Writes doctor feedback. Referenced doctor, record and alert are not
/// checked for existence; orphaned references are accepted.
#[derive(Clone)]
pub struct FeedbackRecorder {
    store: Arc<dyn RecordStore>,
}

impl FeedbackRecorder {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<FeedbackEntry, ServiceError> {
        let entry = submission.validate()?;
        self.store.insert_feedback(&entry).await?;

        tracing::info!(
            feedback_id = %entry.id(),
            doctor = %entry.doctor(),
            health_record = %entry.health_record(),
            usefulness = ?entry.usefulness(),
            "feedback recorded"
        );
        Ok(entry)
    }

    pub async fn find(&self, id: Uuid) -> Result<FeedbackEntry, ServiceError> {
        self.store.find_feedback(id).await
    }
}
