use {
    super::error::ServiceError,
    super::id::Reference,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

/// A reviewer's rating of how useful an alert or analysis turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usefulness {
    Useful,
    Neutral,
    Incorrect,
}

impl Usefulness {
    pub const ALL: [Usefulness; 3] = [Self::Useful, Self::Neutral, Self::Incorrect];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Useful => "useful",
            Self::Neutral => "neutral",
            Self::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for Usefulness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Usefulness {
    type Error = ServiceError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "useful" => Ok(Self::Useful),
            "neutral" => Ok(Self::Neutral),
            "incorrect" => Ok(Self::Incorrect),
            other => Err(ServiceError::Validation(format!(
                "usefulness must be one of useful, neutral, incorrect; got: {other}"
            ))),
        }
    }
}

/// Doctor annotation on a health record, optionally tied to the alert that
/// triggered the review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    id: Uuid,
    doctor: Reference,
    health_record: Reference,
    alert: Option<Reference>,
    usefulness: Option<Usefulness>,
    comments: Option<String>,
    created_at: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn new(
        doctor: Reference,
        health_record: Reference,
        usefulness: Option<Usefulness>,
        comments: Option<String>,
        alert: Option<Reference>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            doctor,
            health_record,
            alert,
            usefulness,
            comments,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn restore(
        id: Uuid,
        doctor: Reference,
        health_record: Reference,
        alert: Option<Reference>,
        usefulness: Option<Usefulness>,
        comments: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            doctor,
            health_record,
            alert,
            usefulness,
            comments,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn doctor(&self) -> &Reference {
        &self.doctor
    }

    pub fn health_record(&self) -> &Reference {
        &self.health_record
    }

    pub fn alert(&self) -> Option<&Reference> {
        self.alert.as_ref()
    }

    pub fn usefulness(&self) -> Option<Usefulness> {
        self.usefulness
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
