use {
    crate::domain::audit::{AuditEntry, Metadata},
    crate::domain::error::{Collection, ServiceError},
    crate::domain::id::Reference,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    user_ref: Option<String>,
    action: String,
    resource_type: Option<String>,
    resource_id: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    timestamp: DateTime<Utc>,
    metadata: Option<serde_json::Value>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = ServiceError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let metadata = row
            .metadata
            .map(serde_json::from_value::<Metadata>)
            .transpose()?;

        Ok(AuditEntry::restore(
            row.id,
            row.user_ref.map(Reference::new).transpose()?,
            row.action,
            row.resource_type,
            row.resource_id.map(Reference::new).transpose()?,
            row.ip_address,
            row.user_agent,
            row.timestamp,
            metadata,
        ))
    }
}

pub async fn insert_audit_entry(pool: &PgPool, entry: &AuditEntry) -> Result<(), ServiceError> {
    let metadata = entry
        .metadata()
        .map(|m| serde_json::Value::Object(m.clone()));

    sqlx::query(
        r#"
        INSERT INTO audit_log
            (id, user_ref, action, resource_type, resource_id,
             ip_address, user_agent, timestamp, metadata)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(entry.id())
    .bind(entry.user().map(Reference::as_str))
    .bind(entry.action())
    .bind(entry.resource_type())
    .bind(entry.resource_id().map(Reference::as_str))
    .bind(entry.ip_address())
    .bind(entry.user_agent())
    .bind(entry.timestamp())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_audit_entry(pool: &PgPool, id: Uuid) -> Result<AuditEntry, ServiceError> {
    let row = sqlx::query_as::<_, AuditRow>(
        r#"
        SELECT id, user_ref, action, resource_type, resource_id,
               ip_address, user_agent, timestamp, metadata
        FROM audit_log
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found(Collection::AuditLog, id))?;

    AuditEntry::try_from(row).map_err(|err| ServiceError::corrupt(Collection::AuditLog, id, err))
}
