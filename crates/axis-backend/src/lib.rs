//! `axis-backend` — HTTP clients for everything outside this process.
//!
//! Two collaborators, one crate:
//!
//! ```text
//! BackendClient    ← rows API of the managed backend ({url}/rest/v1/…)
//!     │               companies, roles, workflow_requests, tasks,
//!     │               notifications, company_memory
//!     ▼
//! FunctionsClient  ← sibling function invocations ({functions_url}/…)
//!                     role-autonomous-loop, workflow-approve
//! ```
//!
//! Both are thin: build the request, attach the service credential,
//! surface non-2xx as [`BackendError::Status`]. Retry policy belongs to
//! callers; the tick deliberately never retries within a round.

pub mod client;
pub mod error;
pub mod functions;

pub use client::BackendClient;
pub use error::BackendError;
pub use functions::FunctionsClient;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, BackendError>;
