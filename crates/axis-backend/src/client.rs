use crate::error::BackendError;
use crate::Result;
use axis_core::company::Company;
use axis_core::memory::CompanyMemory;
use axis_core::notification::Notification;
use axis_core::role::Role;
use axis_core::task::Task;
use axis_core::types::RequestType;
use axis_core::workflow::WorkflowRequest;
use uuid::Uuid;

/// Client for the managed backend's rows API.
///
/// The backend exposes each table under `{url}/rest/v1/<table>` with
/// filter/order/limit query parameters. Reads return JSON arrays; writes
/// take a JSON row and are asked to return nothing. Row-level security is
/// bypassed by the service credential, so this client is for the trusted
/// orchestration path only.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: String,
    service_key: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    // -----------------------------------------------------------------------
    // Companies
    // -----------------------------------------------------------------------

    /// The `limit` most recently created companies, newest first.
    pub async fn list_recent_companies(&self, limit: usize) -> Result<Vec<Company>> {
        self.get_rows(
            "companies",
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn fetch_company(&self, id: Uuid) -> Result<Option<Company>> {
        let rows: Vec<Company> = self
            .get_rows(
                "companies",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    // -----------------------------------------------------------------------
    // Roles
    // -----------------------------------------------------------------------

    /// Activated roles for a company, oldest first (longest-lived roles
    /// get their loop trigger first when the per-company cap bites).
    pub async fn list_activated_roles(&self, company_id: Uuid, limit: usize) -> Result<Vec<Role>> {
        self.get_rows(
            "roles",
            &[
                ("select", "*".to_string()),
                ("company_id", format!("eq.{company_id}")),
                ("is_activated", "eq.true".to_string()),
                ("order", "created_at.asc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn fetch_role(&self, id: Uuid) -> Result<Option<Role>> {
        let rows: Vec<Role> = self
            .get_rows(
                "roles",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn update_role(&self, role: &Role) -> Result<()> {
        self.patch_row("roles", role.id, role).await
    }

    // -----------------------------------------------------------------------
    // Workflow requests
    // -----------------------------------------------------------------------

    /// Pending requests whose type is on the auto-approve allow-list,
    /// oldest first.
    pub async fn list_pending_auto_approvable(
        &self,
        company_id: Uuid,
        limit: usize,
    ) -> Result<Vec<WorkflowRequest>> {
        let allow_list = RequestType::auto_approvable()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.get_rows(
            "workflow_requests",
            &[
                ("select", "*".to_string()),
                ("company_id", format!("eq.{company_id}")),
                ("status", "eq.pending".to_string()),
                ("request_type", format!("in.({allow_list})")),
                ("order", "created_at.asc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn fetch_workflow_request(&self, id: Uuid) -> Result<Option<WorkflowRequest>> {
        let rows: Vec<WorkflowRequest> = self
            .get_rows(
                "workflow_requests",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn update_workflow_request(&self, request: &WorkflowRequest) -> Result<()> {
        self.patch_row("workflow_requests", request.id, request)
            .await
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub async fn fetch_task(&self, id: Uuid) -> Result<Option<Task>> {
        let rows: Vec<Task> = self
            .get_rows(
                "tasks",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_task(&self, task: &Task) -> Result<()> {
        self.insert_row("tasks", task).await
    }

    pub async fn update_task(&self, task: &Task) -> Result<()> {
        self.patch_row("tasks", task.id, task).await
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub async fn insert_notification(&self, notification: &Notification) -> Result<()> {
        self.insert_row("notifications", notification).await
    }

    // -----------------------------------------------------------------------
    // Company memory
    // -----------------------------------------------------------------------

    pub async fn list_company_memory(&self, company_id: Uuid) -> Result<Vec<CompanyMemory>> {
        self.get_rows(
            "company_memory",
            &[
                ("select", "*".to_string()),
                ("company_id", format!("eq.{company_id}")),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .http
            .get(self.table_url(table))
            .query(query)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await?;
        let body = Self::check(response).await?;
        serde_json::from_str(&body).map_err(|source| BackendError::Decode {
            context: "row list",
            source,
        })
    }

    async fn insert_row<T: serde::Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let response = self
            .http
            .post(self.table_url(table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn patch_row<T: serde::Serialize>(&self, table: &str, id: Uuid, row: &T) -> Result<()> {
        let response = self
            .http
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Non-2xx becomes a typed error carrying the response body, which is
    /// what ends up in the tick's error list.
    async fn check(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "backend responded non-2xx");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> BackendClient {
        BackendClient::new(server.url(), "service-secret")
    }

    fn company_row(name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": Uuid::new_v4(),
            "name": name,
            "created_at": chrono::Utc::now(),
        })
    }

    #[tokio::test]
    async fn list_recent_companies_orders_newest_first() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
                Matcher::UrlEncoded("limit".into(), "12".into()),
            ]))
            .match_header("apikey", "service-secret")
            .match_header("authorization", "Bearer service-secret")
            .with_body(
                serde_json::json!([company_row("Acme"), company_row("Initech")]).to_string(),
            )
            .create_async()
            .await;

        let companies = client(&server).list_recent_companies(12).await.unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Acme");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_activated_roles_filters_on_activation_and_orders_oldest_first() {
        let mut server = mockito::Server::new_async().await;
        let company_id = Uuid::new_v4();
        let mock = server
            .mock("GET", "/rest/v1/roles")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("company_id".into(), format!("eq.{company_id}")),
                Matcher::UrlEncoded("is_activated".into(), "eq.true".into()),
                Matcher::UrlEncoded("order".into(), "created_at.asc".into()),
                Matcher::UrlEncoded("limit".into(), "8".into()),
            ]))
            .with_body("[]")
            .create_async()
            .await;

        let roles = client(&server)
            .list_activated_roles(company_id, 8)
            .await
            .unwrap();
        assert!(roles.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn pending_query_restricts_to_the_allow_list() {
        let mut server = mockito::Server::new_async().await;
        let company_id = Uuid::new_v4();
        let mock = server
            .mock("GET", "/rest/v1/workflow_requests")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("status".into(), "eq.pending".into()),
                Matcher::UrlEncoded(
                    "request_type".into(),
                    "in.(send_memo,start_task,suggest_next_task,continue_task)".into(),
                ),
                Matcher::UrlEncoded("order".into(), "created_at.asc".into()),
                Matcher::UrlEncoded("limit".into(), "30".into()),
            ]))
            .with_body("[]")
            .create_async()
            .await;

        client(&server)
            .list_pending_auto_approvable(company_id, 30)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_company_returns_none_for_empty_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let found = client(&server).fetch_company(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn non_2xx_becomes_status_error_with_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("row api unavailable")
            .create_async()
            .await;

        let err = client(&server).list_recent_companies(5).await.unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "row api unavailable");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn insert_notification_posts_the_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/notifications")
            .match_header("Prefer", "return=minimal")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "kind": "memo_received",
                "title": "New memo",
            })))
            .with_status(201)
            .create_async()
            .await;

        let note = Notification::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            axis_core::types::NotificationKind::MemoReceived,
            "New memo",
            "Q3 numbers attached",
        );
        client(&server).insert_notification(&note).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_workflow_request_patches_by_id() {
        let mut server = mockito::Server::new_async().await;
        let mut request = axis_core::workflow::WorkflowRequest::new(
            Uuid::new_v4(),
            None,
            RequestType::SendMemo,
            "send it",
            serde_json::json!({}),
        );
        request.approve(Some("ok".into())).unwrap();

        let mock = server
            .mock("PATCH", "/rest/v1/workflow_requests")
            .match_query(Matcher::UrlEncoded(
                "id".into(),
                format!("eq.{}", request.id),
            ))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "status": "approved",
            })))
            .with_status(204)
            .create_async()
            .await;

        client(&server)
            .update_workflow_request(&request)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_row_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/companies")
            .match_query(Matcher::Any)
            .with_body("{\"not\": \"an array\"}")
            .create_async()
            .await;

        let err = client(&server).list_recent_companies(5).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
    }
}
