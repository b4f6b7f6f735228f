use crate::error::{AxisError, Result};
use crate::types::{RequestStatus, RequestType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit note written when the tick approves a request without a human.
pub const AUTO_APPROVE_NOTE: &str = "Auto-approved by autonomy tick";

// ---------------------------------------------------------------------------
// WorkflowRequest
// ---------------------------------------------------------------------------

/// A proposed action awaiting review before it takes effect.
///
/// Created by the external reasoning service on behalf of a role. The
/// `payload` carries type-specific fields (task id, memo recipient, new
/// mandate text) and is interpreted by the approval gateway when the
/// request is approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Role that proposed the action, if any.
    pub role_id: Option<Uuid>,
    pub request_type: RequestType,
    pub status: RequestStatus,
    /// One-line human-readable description of the proposal.
    pub summary: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl WorkflowRequest {
    pub fn new(
        company_id: Uuid,
        role_id: Option<Uuid>,
        request_type: RequestType,
        summary: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            role_id,
            request_type,
            status: RequestStatus::Pending,
            summary: summary.into(),
            payload,
            review_notes: None,
            created_at: Utc::now(),
            reviewed_at: None,
        }
    }

    /// Transition `Pending → Approved`, recording the review note.
    ///
    /// A resolved request never moves again; callers retrying against a
    /// row that already left `Pending` get a conflict, which is what lets
    /// overlapping ticks degrade to wasted work instead of double
    /// side effects.
    pub fn approve(&mut self, notes: Option<String>) -> Result<()> {
        self.ensure_pending()?;
        self.status = RequestStatus::Approved;
        self.review_notes = notes;
        self.reviewed_at = Some(Utc::now());
        Ok(())
    }

    /// Transition `Pending → Rejected`, recording the review note.
    pub fn reject(&mut self, notes: Option<String>) -> Result<()> {
        self.ensure_pending()?;
        self.status = RequestStatus::Rejected;
        self.review_notes = notes;
        self.reviewed_at = Some(Utc::now());
        Ok(())
    }

    fn ensure_pending(&self) -> Result<()> {
        if self.status != RequestStatus::Pending {
            return Err(AxisError::RequestAlreadyResolved {
                id: self.id.to_string(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Payload views
// ---------------------------------------------------------------------------

/// Typed view over the payload of task-bound request types.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPayload {
    pub task_id: Uuid,
}

/// Typed view over a `send_memo` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoPayload {
    pub recipient_user_id: Uuid,
    pub subject: String,
    pub body: String,
}

/// Typed view over a `suggest_next_task` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestTaskPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

/// Typed view over an `update_role_mandate` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MandatePayload {
    pub role_id: Uuid,
    pub mandate: String,
}

/// Typed view over a `publish_announcement` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementPayload {
    pub recipient_user_id: Uuid,
    pub title: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
