use {
    super::error::ServiceError,
    derive_more::Display,
    serde::{Deserialize, Deserializer, Serialize},
};

/// Weak reference to a record in another collection (user, health record,
/// alert, arbitrary resource). Opaque token: existence is never checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    pub fn new(id: impl Into<String>) -> Result<Self, ServiceError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation(
                "reference must not be blank".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Reference::new(raw).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&str> for Reference {
    type Error = ServiceError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}
