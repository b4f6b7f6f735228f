use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shared text snippet fed into every role's prompt context for a
/// company. Pinned entries survive pruning and sort first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyMemory {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Role that recorded the entry, if it wasn't a human.
    pub source_role_id: Option<Uuid>,
    pub label: Option<String>,
    pub content: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

impl CompanyMemory {
    pub fn new(company_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            source_role_id: None,
            label: None,
            content: content.into(),
            pinned: false,
            created_at: Utc::now(),
        }
    }
}

/// Assemble memory entries into the shared-context block placed ahead of
/// AI prompts.
///
/// Deterministic: pinned entries first, then newest first; labels become
/// `[label]` prefixes. Returns an empty string for an empty slice so
/// callers can splice unconditionally.
pub fn render_context(entries: &[CompanyMemory]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut sorted: Vec<&CompanyMemory> = entries.iter().collect();
    sorted.sort_by_key(|m| (!m.pinned, std::cmp::Reverse(m.created_at)));

    let mut out = String::from("Company memory:\n");
    for entry in sorted {
        match &entry.label {
            Some(label) => out.push_str(&format!("- [{}] {}\n", label, entry.content)),
            None => out.push_str(&format!("- {}\n", entry.content)),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
