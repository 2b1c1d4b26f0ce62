use {
    super::error::ServiceError,
    super::id::Reference,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    uuid::Uuid,
};

/// Free-form key/value bag attached to an audit entry.
pub type Metadata = Map<String, Value>;

/// Optional request/actor context for a tracked action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditContext {
    pub user: Option<Reference>,
    pub resource_type: Option<String>,
    pub resource_id: Option<Reference>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<Metadata>,
}

impl AuditContext {
    pub fn user(mut self, user: Reference) -> Self {
        self.user = Some(user);
        self
    }

    pub fn resource(mut self, resource_type: impl Into<String>, resource_id: Reference) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id);
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Immutable record of one tracked action. Append-only: there is no way to
/// change an entry once it has been built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    id: Uuid,
    user: Option<Reference>,
    action: String,
    resource_type: Option<String>,
    resource_id: Option<Reference>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    timestamp: DateTime<Utc>,
    metadata: Option<Metadata>,
}

impl AuditEntry {
    /// Builds a new entry; id and timestamp are assigned here.
    pub fn new(action: impl Into<String>, context: AuditContext) -> Result<Self, ServiceError> {
        let action = action.into();
        if action.trim().is_empty() {
            return Err(ServiceError::Validation("action is required".into()));
        }

        Ok(Self {
            id: Uuid::now_v7(),
            user: context.user,
            action,
            resource_type: non_blank(context.resource_type),
            resource_id: context.resource_id,
            ip_address: non_blank(context.ip_address),
            user_agent: non_blank(context.user_agent),
            timestamp: Utc::now(),
            metadata: context.metadata,
        })
    }

    /// Rehydrates a persisted entry. Only the store calls this.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: Uuid,
        user: Option<Reference>,
        action: String,
        resource_type: Option<String>,
        resource_id: Option<Reference>,
        ip_address: Option<String>,
        user_agent: Option<String>,
        timestamp: DateTime<Utc>,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            id,
            user,
            action,
            resource_type,
            resource_id,
            ip_address,
            user_agent,
            timestamp,
            metadata,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> Option<&Reference> {
        self.user.as_ref()
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    pub fn resource_id(&self) -> Option<&Reference> {
        self.resource_id.as_ref()
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
