use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AuthorityLevel
// ---------------------------------------------------------------------------

/// How much a role is trusted to do on its own.
///
/// Ordered: `Observer < Advisor < Operator < Executive < Orchestrator`.
/// Roles below `Operator` may propose but never execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityLevel {
    Observer,
    Advisor,
    Operator,
    Executive,
    Orchestrator,
}

impl AuthorityLevel {
    pub fn all() -> &'static [AuthorityLevel] {
        &[
            AuthorityLevel::Observer,
            AuthorityLevel::Advisor,
            AuthorityLevel::Operator,
            AuthorityLevel::Executive,
            AuthorityLevel::Orchestrator,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthorityLevel::Observer => "observer",
            AuthorityLevel::Advisor => "advisor",
            AuthorityLevel::Operator => "operator",
            AuthorityLevel::Executive => "executive",
            AuthorityLevel::Orchestrator => "orchestrator",
        }
    }

    /// Whether this level is allowed to execute approved actions itself.
    pub fn can_execute(self) -> bool {
        self >= AuthorityLevel::Operator
    }
}

impl fmt::Display for AuthorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuthorityLevel {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "observer" => Ok(AuthorityLevel::Observer),
            "advisor" => Ok(AuthorityLevel::Advisor),
            "operator" => Ok(AuthorityLevel::Operator),
            "executive" => Ok(AuthorityLevel::Executive),
            "orchestrator" => Ok(AuthorityLevel::Orchestrator),
            _ => Err(crate::error::AxisError::InvalidAuthority(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryScope
// ---------------------------------------------------------------------------

/// Where a role's remembered context is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryScope {
    /// Private to the role.
    Role,
    /// Shared with every role in the company.
    Company,
}

impl MemoryScope {
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryScope::Role => "role",
            MemoryScope::Company => "company",
        }
    }
}

impl fmt::Display for MemoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryScope {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "role" => Ok(MemoryScope::Role),
            "company" => Ok(MemoryScope::Company),
            _ => Err(crate::error::AxisError::InvalidMemoryScope(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

/// The action a workflow request proposes.
///
/// Only the low-risk subset returned by [`RequestType::auto_approvable`]
/// may ever be approved without a human reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    SendMemo,
    StartTask,
    SuggestNextTask,
    ContinueTask,
    StopTask,
    UpdateRoleMandate,
    PublishAnnouncement,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::SendMemo => "send_memo",
            RequestType::StartTask => "start_task",
            RequestType::SuggestNextTask => "suggest_next_task",
            RequestType::ContinueTask => "continue_task",
            RequestType::StopTask => "stop_task",
            RequestType::UpdateRoleMandate => "update_role_mandate",
            RequestType::PublishAnnouncement => "publish_announcement",
        }
    }

    /// The fixed allow-list of request types the tick may approve without
    /// a human reviewer. Everything else goes through the review UI.
    pub fn auto_approvable() -> &'static [RequestType] {
        &[
            RequestType::SendMemo,
            RequestType::StartTask,
            RequestType::SuggestNextTask,
            RequestType::ContinueTask,
        ]
    }

    pub fn is_auto_approvable(self) -> bool {
        Self::auto_approvable().contains(&self)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send_memo" => Ok(RequestType::SendMemo),
            "start_task" => Ok(RequestType::StartTask),
            "suggest_next_task" => Ok(RequestType::SuggestNextTask),
            "continue_task" => Ok(RequestType::ContinueTask),
            "stop_task" => Ok(RequestType::StopTask),
            "update_role_mandate" => Ok(RequestType::UpdateRoleMandate),
            "publish_announcement" => Ok(RequestType::PublishAnnouncement),
            _ => Err(crate::error::AxisError::InvalidRequestType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Review state of a workflow request.
///
/// Transitions: `Pending → Approved | Rejected`. Resolved requests never
/// move again; retrying a resolved request is a conflict, which is what
/// makes re-processing on a later tick safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(crate::error::AxisError::InvalidRequestStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ApprovalAction
// ---------------------------------------------------------------------------

/// The verb a reviewer (human or tick) sends to the approval gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl ApprovalAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApprovalAction {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(ApprovalAction::Approve),
            "reject" => Ok(ApprovalAction::Reject),
            _ => Err(crate::error::AxisError::InvalidApprovalAction(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Blocked,
    Stopped,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Stopped => "stopped",
        }
    }

    /// Pending and running tasks count as active for the
    /// one-active-task-per-role convention.
    pub fn is_active(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            "stopped" => Ok(TaskStatus::Stopped),
            _ => Err(crate::error::AxisError::InvalidTaskStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AttemptVerdict
// ---------------------------------------------------------------------------

/// Evaluation of one task attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptVerdict {
    Pass,
    Fail,
    Unclear,
}

impl AttemptVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            AttemptVerdict::Pass => "pass",
            AttemptVerdict::Fail => "fail",
            AttemptVerdict::Unclear => "unclear",
        }
    }
}

impl fmt::Display for AttemptVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttemptVerdict {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(AttemptVerdict::Pass),
            "fail" => Ok(AttemptVerdict::Fail),
            "unclear" => Ok(AttemptVerdict::Unclear),
            _ => Err(crate::error::AxisError::InvalidVerdict(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WorkflowRequest,
    TaskCompleted,
    Invitation,
    MemoReceived,
    ObjectiveComplete,
    SystemAlert,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::WorkflowRequest => "workflow_request",
            NotificationKind::TaskCompleted => "task_completed",
            NotificationKind::Invitation => "invitation",
            NotificationKind::MemoReceived => "memo_received",
            NotificationKind::ObjectiveComplete => "objective_complete",
            NotificationKind::SystemAlert => "system_alert",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = crate::error::AxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflow_request" => Ok(NotificationKind::WorkflowRequest),
            "task_completed" => Ok(NotificationKind::TaskCompleted),
            "invitation" => Ok(NotificationKind::Invitation),
            "memo_received" => Ok(NotificationKind::MemoReceived),
            "objective_complete" => Ok(NotificationKind::ObjectiveComplete),
            "system_alert" => Ok(NotificationKind::SystemAlert),
            _ => Err(crate::error::AxisError::InvalidNotificationKind(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
