use crate::output::print_json;
use anyhow::Context;
use uuid::Uuid;

pub fn run(
    server: &str,
    token: &str,
    request_id: Uuid,
    reject: bool,
    notes: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let action = if reject { "reject" } else { "approve" };
    let url = format!("{}/functions/workflow-approve", server.trim_end_matches('/'));

    let result: serde_json::Value = ureq::post(&url)
        .set("Authorization", &format!("Bearer {token}"))
        .send_json(serde_json::json!({
            "request_id": request_id,
            "action": action,
            "review_notes": notes,
        }))
        .map_err(super::tick::flatten_ureq)
        .with_context(|| format!("review request to {url} failed"))?
        .into_json()
        .context("review response was not JSON")?;

    if json {
        return print_json(&result);
    }

    match result.get("side_effect").and_then(|v| v.as_str()) {
        Some(effect) => println!(
            "request {request_id} {}: {effect}",
            result["status"].as_str().unwrap_or(action)
        ),
        None => println!(
            "request {request_id} {}",
            result["status"].as_str().unwrap_or(action)
        ),
    }
    Ok(())
}
