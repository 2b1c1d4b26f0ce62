use {
    crate::domain::audit::AuditEntry,
    crate::domain::error::{Collection, ServiceError},
    crate::domain::feedback::FeedbackEntry,
    crate::domain::store::{RecordStore, StoreFuture},
    std::{
        collections::HashMap,
        sync::{Mutex, MutexGuard, PoisonError},
    },
    uuid::Uuid,
};

/// In-process record store for local runs without `DATABASE_URL` and for tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    audit: Mutex<HashMap<Uuid, AuditEntry>>,
    feedback: Mutex<HashMap<Uuid, FeedbackEntry>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audit_count(&self) -> usize {
        lock(&self.audit).len()
    }

    pub fn feedback_count(&self) -> usize {
        lock(&self.feedback).len()
    }

    /// Snapshot of all audit entries, oldest first.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        let mut entries: Vec<_> = lock(&self.audit).values().cloned().collect();
        entries.sort_by_key(|e| (e.timestamp(), e.id()));
        entries
    }
}

impl RecordStore for MemoryRecordStore {
    fn insert_audit<'a>(&'a self, entry: &'a AuditEntry) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            lock(&self.audit).insert(entry.id(), entry.clone());
            Ok(())
        })
    }

    fn find_audit(&self, id: Uuid) -> StoreFuture<'_, AuditEntry> {
        Box::pin(async move {
            lock(&self.audit)
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(Collection::AuditLog, id))
        })
    }

    fn insert_feedback<'a>(&'a self, entry: &'a FeedbackEntry) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            lock(&self.feedback).insert(entry.id(), entry.clone());
            Ok(())
        })
    }

    fn find_feedback(&self, id: Uuid) -> StoreFuture<'_, FeedbackEntry> {
        Box::pin(async move {
            lock(&self.feedback)
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(Collection::Feedback, id))
        })
    }
}
