use crate::types::{AuthorityLevel, MemoryScope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persistent AI persona scoped to a company.
///
/// A role only participates in autonomous ticks while `is_activated` is
/// set. Roles are never hard-deleted by this layer; deactivation is the
/// off switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Display name, e.g. "Chief of Staff".
    pub name: String,
    /// Standing instructions the role reasons from.
    pub mandate: String,
    pub authority: AuthorityLevel,
    pub memory_scope: MemoryScope,
    pub is_activated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(company_id: Uuid, name: impl Into<String>, mandate: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: name.into(),
            mandate: mandate.into(),
            authority: AuthorityLevel::Advisor,
            memory_scope: MemoryScope::Role,
            is_activated: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn activate(&mut self) {
        self.is_activated = true;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.is_activated = false;
        self.updated_at = Utc::now();
    }

    pub fn set_mandate(&mut self, mandate: impl Into<String>) {
        self.mandate = mandate.into();
        self.updated_at = Utc::now();
    }

    /// Whether approved actions proposed by this role may be executed
    /// on its behalf.
    pub fn can_execute(&self) -> bool {
        self.authority.can_execute()
    }
}
