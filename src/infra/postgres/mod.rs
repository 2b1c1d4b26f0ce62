pub mod audit_repo;
pub mod feedback_repo;

use {
    crate::domain::audit::AuditEntry,
    crate::domain::feedback::FeedbackEntry,
    crate::domain::store::{RecordStore, StoreFuture},
    sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions},
    std::time::Duration,
    uuid::Uuid,
};

/// PostgreSQL-backed record store. The pool is the only state shared across
/// request tasks.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl RecordStore for PgRecordStore {
    fn insert_audit<'a>(&'a self, entry: &'a AuditEntry) -> StoreFuture<'a, ()> {
        Box::pin(audit_repo::insert_audit_entry(&self.pool, entry))
    }

    fn find_audit(&self, id: Uuid) -> StoreFuture<'_, AuditEntry> {
        Box::pin(audit_repo::find_audit_entry(&self.pool, id))
    }

    fn insert_feedback<'a>(&'a self, entry: &'a FeedbackEntry) -> StoreFuture<'a, ()> {
        Box::pin(feedback_repo::insert_feedback(&self.pool, entry))
    }

    fn find_feedback(&self, id: Uuid) -> StoreFuture<'_, FeedbackEntry> {
        Box::pin(feedback_repo::find_feedback(&self.pool, id))
    }
}
