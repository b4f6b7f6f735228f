use crate::output::{print_json, print_table};
use anyhow::Context;
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub fn run(
    server: &str,
    token: &str,
    company_id: Option<Uuid>,
    max_companies: Option<i64>,
    max_roles_per_company: Option<i64>,
    max_auto_approvals_per_company: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut body = serde_json::Map::new();
    if let Some(id) = company_id {
        body.insert("company_id".into(), serde_json::json!(id));
    }
    if let Some(n) = max_companies {
        body.insert("max_companies".into(), serde_json::json!(n));
    }
    if let Some(n) = max_roles_per_company {
        body.insert("max_roles_per_company".into(), serde_json::json!(n));
    }
    if let Some(n) = max_auto_approvals_per_company {
        body.insert("max_auto_approvals_per_company".into(), serde_json::json!(n));
    }

    let url = format!("{}/functions/autonomy-tick", server.trim_end_matches('/'));
    let report: serde_json::Value = ureq::post(&url)
        .set("Authorization", &format!("Bearer {token}"))
        .send_json(serde_json::Value::Object(body))
        .map_err(flatten_ureq)
        .with_context(|| format!("tick request to {url} failed"))?
        .into_json()
        .context("tick response was not JSON")?;

    if json {
        return print_json(&report);
    }

    print_table(
        &["metric", "value"],
        vec![
            row("tick_at", &report["tick_at"]),
            row("companies_processed", &report["companies_processed"]),
            row("roles_triggered", &report["roles_triggered"]),
            row("approvals_attempted", &report["approvals_attempted"]),
            row("approvals_succeeded", &report["approvals_succeeded"]),
            row("errors_count", &report["errors_count"]),
        ],
    );
    if let Some(errors) = report["errors"].as_array() {
        for error in errors {
            eprintln!("  ! {}", error.as_str().unwrap_or_default());
        }
    }
    Ok(())
}

fn row(name: &str, value: &serde_json::Value) -> Vec<String> {
    let rendered = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    vec![name.to_string(), rendered]
}

/// Collapse ureq's status-error variant into a readable message carrying
/// the response body.
pub(crate) fn flatten_ureq(err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            anyhow::anyhow!("server returned {code}: {body}")
        }
        other => anyhow::Error::new(other),
    }
}
