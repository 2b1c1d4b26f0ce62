use {std::fmt, thiserror::Error};

/// Named collections owned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    AuditLog,
    Feedback,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuditLog => "AuditLog",
            Self::Feedback => "Feedback",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// A stored record no longer satisfies the domain invariants.
    #[error("corrupt {collection} record {id}: {detail}")]
    Corrupt {
        collection: Collection,
        id: String,
        detail: String,
    },

    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u64 },

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn not_found(collection: Collection, id: impl fmt::Display) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    pub fn corrupt(
        collection: Collection,
        id: impl fmt::Display,
        detail: impl fmt::Display,
    ) -> Self {
        Self::Corrupt {
            collection,
            id: id.to_string(),
            detail: detail.to_string(),
        }
    }
}
