use {
    super::audit::AuditEntry,
    super::error::ServiceError,
    super::feedback::FeedbackEntry,
    std::{future::Future, pin::Pin},
    uuid::Uuid,
};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

/// Durable home of audit and feedback documents.
///
/// Documents arrive fully built (id and timestamp already assigned), so
/// `insert_*` is a plain append. There are no update or delete operations.
pub trait RecordStore: Send + Sync {
    fn insert_audit<'a>(&'a self, entry: &'a AuditEntry) -> StoreFuture<'a, ()>;

    fn find_audit(&self, id: Uuid) -> StoreFuture<'_, AuditEntry>;

    fn insert_feedback<'a>(&'a self, entry: &'a FeedbackEntry) -> StoreFuture<'a, ()>;

    fn find_feedback(&self, id: Uuid) -> StoreFuture<'_, FeedbackEntry>;
}
