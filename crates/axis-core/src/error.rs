use thiserror::Error;

#[derive(Debug, Error)]
pub enum AxisError {
    #[error("role not found: {0}")]
    RoleNotFound(String),

    #[error("workflow request not found: {0}")]
    RequestNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("workflow request {id} already resolved (status: {status})")]
    RequestAlreadyResolved { id: String, status: String },

    #[error("invalid authority level: {0}")]
    InvalidAuthority(String),

    #[error("invalid memory scope: {0}")]
    InvalidMemoryScope(String),

    #[error("invalid request type: {0}")]
    InvalidRequestType(String),

    #[error("invalid request status: {0}")]
    InvalidRequestStatus(String),

    #[error("invalid task status: {0}")]
    InvalidTaskStatus(String),

    #[error("invalid attempt verdict: {0}")]
    InvalidVerdict(String),

    #[error("invalid notification kind: {0}")]
    InvalidNotificationKind(String),

    #[error("invalid approval action '{0}': expected 'approve' or 'reject'")]
    InvalidApprovalAction(String),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("task {task} has exhausted its {max} attempts")]
    AttemptsExhausted { task: String, max: u32 },

    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AxisError>;
