use axis_backend::BackendError;
use axis_core::error::AxisError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `AxisError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<AxisError>() {
            match e {
                AxisError::RoleNotFound(_)
                | AxisError::RequestNotFound(_)
                | AxisError::TaskNotFound(_) => StatusCode::NOT_FOUND,
                AxisError::RequestAlreadyResolved { .. } => StatusCode::CONFLICT,
                AxisError::InvalidAuthority(_)
                | AxisError::InvalidMemoryScope(_)
                | AxisError::InvalidRequestType(_)
                | AxisError::InvalidRequestStatus(_)
                | AxisError::InvalidTaskStatus(_)
                | AxisError::InvalidVerdict(_)
                | AxisError::InvalidNotificationKind(_)
                | AxisError::InvalidApprovalAction(_) => StatusCode::BAD_REQUEST,
                AxisError::InvalidTransition { .. } | AxisError::AttemptsExhausted { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AxisError::MissingConfig(_) | AxisError::Io(_) | AxisError::Yaml(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            // Backend transport/status failures and anything unexpected
            // are structural: 500 with the cause chain in `details`.
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            match self.0.source() {
                Some(source) => serde_json::json!({
                    "error": self.0.to_string(),
                    "details": source.to_string(),
                }),
                None => serde_json::json!({ "error": self.0.to_string() }),
            }
        } else {
            serde_json::json!({ "error": self.0.to_string() })
        };
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Convenience: BackendError already converts via anyhow, but make the
// common `?` on backend calls explicit about which errors they carry.
pub fn backend(err: BackendError) -> AppError {
    AppError(anyhow::Error::new(err).context("backend request failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_not_found_maps_to_404() {
        let err = AppError(AxisError::RequestNotFound("abc".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn already_resolved_maps_to_409() {
        let err = AppError(
            AxisError::RequestAlreadyResolved {
                id: "abc".into(),
                status: "approved".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_action_maps_to_400() {
        let err = AppError(AxisError::InvalidApprovalAction("waive".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_transition_maps_to_422() {
        let err = AppError(
            AxisError::InvalidTransition {
                from: "completed".into(),
                to: "running".into(),
                reason: "task already finished".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn attempts_exhausted_maps_to_422() {
        let err = AppError(
            AxisError::AttemptsExhausted {
                task: "t".into(),
                max: 3,
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn backend_status_maps_to_500() {
        let err = backend(BackendError::Status {
            status: 503,
            body: "row api unavailable".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("invalid send_memo payload");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn task_not_found_maps_to_404() {
        let err = AppError(AxisError::TaskNotFound("t1".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
