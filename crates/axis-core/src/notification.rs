use crate::types::NotificationKind;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// Per-user notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        company_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            company_id,
            kind,
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this notification belongs in the "important" subset the
    /// inbox surfaces first.
    ///
    /// Approval traffic and system alerts always qualify; everything else
    /// qualifies only when the title or message matches the urgency
    /// patterns.
    pub fn is_important(&self) -> bool {
        match self.kind {
            NotificationKind::WorkflowRequest | NotificationKind::SystemAlert => true,
            _ => {
                let re = urgency_regex();
                re.is_match(&self.title) || re.is_match(&self.message)
            }
        }
    }
}

fn urgency_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(urgent|blocked|failed|approval|action required|awaiting review|escalat)")
            .expect("urgency pattern is valid")
    })
}

/// Filter a notification list down to the important subset, unread first.
pub fn important<'a>(notifications: &'a [Notification]) -> Vec<&'a Notification> {
    let mut out: Vec<&Notification> = notifications.iter().filter(|n| n.is_important()).collect();
    out.sort_by_key(|n| (n.is_read, std::cmp::Reverse(n.created_at)));
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn note(kind: NotificationKind, title: &str, message: &str) -> Notification {
        Notification::new(Uuid::new_v4(), Uuid::new_v4(), kind, title, message)
    }

    #[test]
    fn workflow_request_always_important() {
        let n = note(NotificationKind::WorkflowRequest, "hello", "world");
        assert!(n.is_important());
    }

    #[test]
    fn system_alert_always_important() {
        let n = note(NotificationKind::SystemAlert, "hello", "world");
        assert!(n.is_important());
    }

    #[test]
    fn memo_with_urgent_title_is_important() {
        let n = note(NotificationKind::MemoReceived, "URGENT: payroll", "see attached");
        assert!(n.is_important());
    }

    #[test]
    fn memo_with_urgent_message_is_important() {
        let n = note(
            NotificationKind::MemoReceived,
            "weekly digest",
            "the deploy failed twice",
        );
        assert!(n.is_important());
    }

    #[test]
    fn plain_memo_is_not_important() {
        let n = note(NotificationKind::MemoReceived, "lunch menu", "tacos on friday");
        assert!(!n.is_important());
    }

    #[test]
    fn task_completed_needs_a_pattern_hit() {
        assert!(!note(NotificationKind::TaskCompleted, "done", "all good").is_important());
        assert!(note(
            NotificationKind::TaskCompleted,
            "done, but blocked follow-up",
            "next step is blocked"
        )
        .is_important());
    }

    #[test]
    fn important_sorts_unread_first_then_newest() {
        let mut read = note(NotificationKind::SystemAlert, "old", "x");
        read.is_read = true;
        let unread_old = {
            let mut n = note(NotificationKind::SystemAlert, "unread old", "x");
            n.created_at = Utc::now() - chrono::Duration::hours(1);
            n
        };
        let unread_new = note(NotificationKind::SystemAlert, "unread new", "x");
        let plain = note(NotificationKind::Invitation, "come join", "team offsite");

        let all = vec![read.clone(), unread_old.clone(), unread_new.clone(), plain];
        let filtered = important(&all);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].title, "unread new");
        assert_eq!(filtered[1].title, "unread old");
        assert_eq!(filtered[2].title, "old");
    }
}
