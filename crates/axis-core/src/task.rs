use crate::error::{AxisError, Result};
use crate::types::{AttemptVerdict, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TaskAttempt
// ---------------------------------------------------------------------------

/// One execution attempt of a task. Attempts are append-only; the verdict
/// is filled in when the attempt is evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAttempt {
    /// 1-based attempt number.
    pub number: u32,
    pub verdict: Option<AttemptVerdict>,
    pub summary: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A unit of autonomous work assigned to a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub company_id: Uuid,
    pub role_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub max_attempts: u32,
    /// 0 until the first attempt opens.
    pub current_attempt: u32,
    pub blocker: Option<String>,
    #[serde(default)]
    pub attempts: Vec<TaskAttempt>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

impl Task {
    pub fn new(company_id: Uuid, role_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            role_id,
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            current_attempt: 0,
            blocker: None,
            attempts: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Transition `Pending → Running` and open attempt 1.
    pub fn start(&mut self) -> Result<()> {
        if self.status != TaskStatus::Pending {
            return Err(AxisError::InvalidTransition {
                from: self.status.to_string(),
                to: TaskStatus::Running.to_string(),
                reason: "only a pending task can start".into(),
            });
        }
        self.status = TaskStatus::Running;
        self.started_at = Some(Utc::now());
        self.open_attempt();
        Ok(())
    }

    /// Open the next attempt on a running or blocked task.
    ///
    /// Exhausting `max_attempts` blocks the task instead of opening an
    /// attempt, so a `continue_task` approval can never loop forever.
    pub fn begin_attempt(&mut self) -> Result<u32> {
        match self.status {
            TaskStatus::Running | TaskStatus::Blocked => {}
            other => {
                return Err(AxisError::InvalidTransition {
                    from: other.to_string(),
                    to: TaskStatus::Running.to_string(),
                    reason: "only a running or blocked task can continue".into(),
                });
            }
        }
        if self.current_attempt >= self.max_attempts {
            self.status = TaskStatus::Blocked;
            self.blocker = Some(format!("exhausted {} attempts", self.max_attempts));
            return Err(AxisError::AttemptsExhausted {
                task: self.id.to_string(),
                max: self.max_attempts,
            });
        }
        self.status = TaskStatus::Running;
        self.blocker = None;
        Ok(self.open_attempt())
    }

    /// Record the evaluation of the current attempt.
    ///
    /// `Pass` completes the task. `Fail` leaves it running while attempts
    /// remain, otherwise blocks it. `Unclear` always blocks, handing the
    /// task back to a human.
    pub fn record_verdict(
        &mut self,
        verdict: AttemptVerdict,
        summary: Option<String>,
    ) -> Result<()> {
        let attempt = self
            .attempts
            .last_mut()
            .ok_or_else(|| AxisError::InvalidTransition {
                from: self.status.to_string(),
                to: self.status.to_string(),
                reason: "no attempt open".into(),
            })?;
        attempt.verdict = Some(verdict);
        attempt.summary = summary;
        attempt.finished_at = Some(Utc::now());

        match verdict {
            AttemptVerdict::Pass => {
                self.status = TaskStatus::Completed;
                self.completed_at = Some(Utc::now());
            }
            AttemptVerdict::Fail => {
                if self.current_attempt >= self.max_attempts {
                    self.status = TaskStatus::Blocked;
                    self.blocker = Some(format!("failed all {} attempts", self.max_attempts));
                }
            }
            AttemptVerdict::Unclear => {
                self.status = TaskStatus::Blocked;
                self.blocker = Some("attempt outcome unclear".into());
            }
        }
        Ok(())
    }

    /// Halt the task regardless of state. Terminal.
    pub fn stop(&mut self) -> Result<()> {
        match self.status {
            TaskStatus::Completed | TaskStatus::Stopped => Err(AxisError::InvalidTransition {
                from: self.status.to_string(),
                to: TaskStatus::Stopped.to_string(),
                reason: "task already finished".into(),
            }),
            _ => {
                self.status = TaskStatus::Stopped;
                Ok(())
            }
        }
    }

    fn open_attempt(&mut self) -> u32 {
        self.current_attempt += 1;
        self.attempts.push(TaskAttempt {
            number: self.current_attempt,
            verdict: None,
            summary: None,
            started_at: Utc::now(),
            finished_at: None,
        });
        self.current_attempt
    }
}

// ---------------------------------------------------------------------------
// Task list helpers
// ---------------------------------------------------------------------------

/// The active (pending or running) task for a role, if any.
///
/// The UI keeps at most one task active per role; this is a convention,
/// not a database constraint, so ties break to the oldest task.
pub fn active_for_role(tasks: &[Task], role_id: Uuid) -> Option<&Task> {
    tasks
        .iter()
        .filter(|t| t.role_id == role_id && t.status.is_active())
        .min_by_key(|t| t.created_at)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
