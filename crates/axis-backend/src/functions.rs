use crate::error::BackendError;
use crate::Result;
use axis_core::types::ApprovalAction;
use uuid::Uuid;

/// Client for the sibling edge functions hosted next to the backend.
///
/// Calls carry the service credential; a non-2xx response is returned as
/// [`BackendError::Status`] and the caller decides what to do with it.
/// The tick records it and moves on; the CLI prints it.
#[derive(Debug, Clone)]
pub struct FunctionsClient {
    http: reqwest::Client,
    base: String,
    service_key: String,
}

impl FunctionsClient {
    pub fn new(functions_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: functions_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    /// Ask the reasoning service to run one autonomous step for a role.
    ///
    /// 2xx means the step was accepted, nothing more; the role's actual
    /// decisions land as workflow requests and task attempts in the
    /// backend.
    pub async fn trigger_role_loop(&self, role_id: Uuid) -> Result<()> {
        self.post(
            "role-autonomous-loop",
            &serde_json::json!({ "role_id": role_id }),
        )
        .await
    }

    /// Route a review decision through the workflow approval gateway.
    pub async fn review_request(
        &self,
        request_id: Uuid,
        action: ApprovalAction,
        review_notes: &str,
    ) -> Result<()> {
        self.post(
            "workflow-approve",
            &serde_json::json!({
                "request_id": request_id,
                "action": action,
                "review_notes": review_notes,
            }),
        )
        .await
    }

    async fn post(&self, function: &str, body: &serde_json::Value) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/{}", self.base, function))
            .bearer_auth(&self.service_key)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn trigger_role_loop_posts_role_id_with_credential() {
        let mut server = mockito::Server::new_async().await;
        let role_id = Uuid::new_v4();
        let mock = server
            .mock("POST", "/role-autonomous-loop")
            .match_header("authorization", "Bearer service-secret")
            .match_body(Matcher::Json(serde_json::json!({ "role_id": role_id })))
            .with_status(202)
            .create_async()
            .await;

        let client = FunctionsClient::new(server.url(), "service-secret");
        client.trigger_role_loop(role_id).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn review_request_sends_action_and_notes() {
        let mut server = mockito::Server::new_async().await;
        let request_id = Uuid::new_v4();
        let mock = server
            .mock("POST", "/workflow-approve")
            .match_body(Matcher::Json(serde_json::json!({
                "request_id": request_id,
                "action": "approve",
                "review_notes": "Auto-approved by autonomy tick",
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = FunctionsClient::new(server.url(), "service-secret");
        client
            .review_request(
                request_id,
                ApprovalAction::Approve,
                "Auto-approved by autonomy tick",
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_surfaces_as_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/workflow-approve")
            .with_status(409)
            .with_body("already resolved")
            .create_async()
            .await;

        let client = FunctionsClient::new(server.url(), "service-secret");
        let err = client
            .review_request(Uuid::new_v4(), ApprovalAction::Reject, "no")
            .await
            .unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 409);
                assert_eq!(body, "already resolved");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn trailing_slash_in_base_is_tolerated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/role-autonomous-loop")
            .with_status(200)
            .create_async()
            .await;

        let client = FunctionsClient::new(format!("{}/", server.url()), "k");
        client.trigger_role_loop(Uuid::new_v4()).await.unwrap();
        mock.assert_async().await;
    }
}
