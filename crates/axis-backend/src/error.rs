use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    /// True when the failure is a well-formed non-2xx response rather
    /// than a transport problem.
    pub fn is_status(&self) -> bool {
        matches!(self, BackendError::Status { .. })
    }
}
