use {
    crate::domain::audit::{AuditContext, AuditEntry},
    crate::domain::error::ServiceError,
    crate::domain::store::RecordStore,
    std::sync::Arc,
    uuid::Uuid,
};

/// Append-only writer for the audit log.
#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn RecordStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Appends one entry for `action`. Every call writes a new entry, even
    /// for identical arguments.
    pub async fn record(
        &self,
        action: &str,
        context: AuditContext,
    ) -> Result<AuditEntry, ServiceError> {
        let entry = AuditEntry::new(action, context)?;
        self.store.insert_audit(&entry).await?;

        tracing::info!(
            target: "audit",
            audit_id = %entry.id(),
            action = %entry.action(),
            user = ?entry.user().map(|u| u.as_str()),
            resource_type = ?entry.resource_type(),
            "audit entry recorded"
        );
        Ok(entry)
    }

    pub async fn find(&self, id: Uuid) -> Result<AuditEntry, ServiceError> {
        self.store.find_audit(id).await
    }
}
