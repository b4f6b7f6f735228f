use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use axis_core::error::AxisError;
use axis_core::notification::Notification;
use axis_core::task::Task;
use axis_core::types::{ApprovalAction, NotificationKind, RequestType};
use axis_core::workflow::{
    AnnouncementPayload, MandatePayload, MemoPayload, SuggestTaskPayload, TaskPayload,
    WorkflowRequest,
};

use crate::error::{backend, AppError};
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ReviewBody {
    pub request_id: Uuid,
    pub action: String,
    #[serde(default)]
    pub review_notes: Option<String>,
}

/// POST /functions/workflow-approve — resolve a pending workflow request.
///
/// Approval applies the side effect first and only then moves the row
/// out of `pending`: if the side effect fails, the request stays pending
/// and a later tick (or reviewer) can safely retry. A row that already
/// left `pending` is a 409, never a second side effect.
pub async fn review_request(
    State(app): State<AppState>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let action: ApprovalAction = body.action.parse()?;

    let mut request = app
        .backend
        .fetch_workflow_request(body.request_id)
        .await
        .map_err(backend)?
        .ok_or_else(|| AxisError::RequestNotFound(body.request_id.to_string()))?;

    let side_effect = match action {
        ApprovalAction::Approve => {
            // Fail early on an already-resolved row, before side effects.
            if request.status != axis_core::types::RequestStatus::Pending {
                return Err(AxisError::RequestAlreadyResolved {
                    id: request.id.to_string(),
                    status: request.status.to_string(),
                }
                .into());
            }
            let effect = apply_side_effect(&app, &request).await?;
            request.approve(body.review_notes.clone())?;
            app.backend
                .update_workflow_request(&request)
                .await
                .map_err(backend)?;
            Some(effect)
        }
        ApprovalAction::Reject => {
            request.reject(body.review_notes.clone())?;
            app.backend
                .update_workflow_request(&request)
                .await
                .map_err(backend)?;
            None
        }
    };

    tracing::info!(
        request_id = %request.id,
        action = %action,
        request_type = %request.request_type,
        "workflow request resolved"
    );

    let mut response = serde_json::json!({
        "request_id": request.id,
        "status": request.status,
    });
    if let Some(effect) = side_effect {
        response["side_effect"] = serde_json::Value::String(effect.to_string());
    }
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Side effects
// ---------------------------------------------------------------------------

/// Execute what the request type implies. Returns a short slug naming
/// the effect for the response body.
async fn apply_side_effect(
    app: &AppState,
    request: &WorkflowRequest,
) -> Result<&'static str, AppError> {
    match request.request_type {
        RequestType::SendMemo => {
            let memo: MemoPayload = parse_payload(request)?;
            let note = Notification::new(
                memo.recipient_user_id,
                request.company_id,
                NotificationKind::MemoReceived,
                format!("Memo: {}", memo.subject),
                memo.body,
            );
            app.backend
                .insert_notification(&note)
                .await
                .map_err(backend)?;
            Ok("memo_delivered")
        }
        RequestType::StartTask => {
            let payload: TaskPayload = parse_payload(request)?;
            let mut task = fetch_task(app, payload.task_id).await?;
            task.start()?;
            app.backend.update_task(&task).await.map_err(backend)?;
            Ok("task_started")
        }
        RequestType::ContinueTask => {
            let payload: TaskPayload = parse_payload(request)?;
            let mut task = fetch_task(app, payload.task_id).await?;
            match task.begin_attempt() {
                Ok(_) => {
                    app.backend.update_task(&task).await.map_err(backend)?;
                    Ok("task_continued")
                }
                Err(e @ AxisError::AttemptsExhausted { .. }) => {
                    // Persist the blocked state so the exhaustion sticks.
                    app.backend.update_task(&task).await.map_err(backend)?;
                    Err(e.into())
                }
                Err(e) => Err(e.into()),
            }
        }
        RequestType::SuggestNextTask => {
            let payload: SuggestTaskPayload = parse_payload(request)?;
            let role_id = request.role_id.ok_or_else(|| {
                AppError::bad_request("suggest_next_task requires a proposing role")
            })?;
            let mut task = Task::new(request.company_id, role_id, payload.title);
            task.description = payload.description;
            if let Some(max) = payload.max_attempts {
                task.max_attempts = max.max(1);
            }
            app.backend.insert_task(&task).await.map_err(backend)?;
            Ok("task_suggested")
        }
        RequestType::StopTask => {
            let payload: TaskPayload = parse_payload(request)?;
            let mut task = fetch_task(app, payload.task_id).await?;
            task.stop()?;
            app.backend.update_task(&task).await.map_err(backend)?;
            Ok("task_stopped")
        }
        RequestType::UpdateRoleMandate => {
            let payload: MandatePayload = parse_payload(request)?;
            let mut role = app
                .backend
                .fetch_role(payload.role_id)
                .await
                .map_err(backend)?
                .ok_or_else(|| AxisError::RoleNotFound(payload.role_id.to_string()))?;
            role.set_mandate(payload.mandate);
            app.backend.update_role(&role).await.map_err(backend)?;
            Ok("mandate_updated")
        }
        RequestType::PublishAnnouncement => {
            let payload: AnnouncementPayload = parse_payload(request)?;
            let note = Notification::new(
                payload.recipient_user_id,
                request.company_id,
                NotificationKind::SystemAlert,
                payload.title,
                payload.message,
            );
            app.backend
                .insert_notification(&note)
                .await
                .map_err(backend)?;
            Ok("announcement_published")
        }
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(request: &WorkflowRequest) -> Result<T, AppError> {
    serde_json::from_value(request.payload.clone()).map_err(|e| {
        AppError::bad_request(format!("invalid {} payload: {e}", request.request_type))
    })
}

async fn fetch_task(app: &AppState, task_id: Uuid) -> Result<Task, AppError> {
    app.backend
        .fetch_task(task_id)
        .await
        .map_err(backend)?
        .ok_or_else(|| AxisError::TaskNotFound(task_id.to_string()).into())
}
