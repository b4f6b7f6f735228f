use axum::Json;

/// GET /healthz — liveness probe, no auth.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
