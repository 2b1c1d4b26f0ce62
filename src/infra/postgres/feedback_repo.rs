use {
    crate::domain::error::{Collection, ServiceError},
    crate::domain::feedback::{FeedbackEntry, Usefulness},
    crate::domain::id::Reference,
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    doctor: String,
    health_record: String,
    alert: Option<String>,
    usefulness: Option<String>,
    comments: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<FeedbackRow> for FeedbackEntry {
    type Error = ServiceError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        Ok(FeedbackEntry::restore(
            row.id,
            Reference::new(row.doctor)?,
            Reference::new(row.health_record)?,
            row.alert.map(Reference::new).transpose()?,
            row.usefulness
                .as_deref()
                .map(Usefulness::try_from)
                .transpose()?,
            row.comments,
            row.created_at,
        ))
    }
}

pub async fn insert_feedback(pool: &PgPool, entry: &FeedbackEntry) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO feedback
            (id, doctor, health_record, alert, usefulness, comments, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.id())
    .bind(entry.doctor().as_str())
    .bind(entry.health_record().as_str())
    .bind(entry.alert().map(Reference::as_str))
    .bind(entry.usefulness().map(|u| u.as_str()))
    .bind(entry.comments())
    .bind(entry.created_at())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_feedback(pool: &PgPool, id: Uuid) -> Result<FeedbackEntry, ServiceError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        r#"
        SELECT id, doctor, health_record, alert, usefulness, comments, created_at
        FROM feedback
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::not_found(Collection::Feedback, id))?;

    FeedbackEntry::try_from(row)
        .map_err(|err| ServiceError::corrupt(Collection::Feedback, id, err))
}
