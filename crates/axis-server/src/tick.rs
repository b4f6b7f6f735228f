//! The autonomy tick: one bounded pass over recent companies.
//!
//! Company jobs run fully in parallel and trap their own failures; one
//! company going sideways never aborts the others. Within a company,
//! loop triggers are fire-and-forget through the dispatcher, while
//! auto-approvals run sequentially to avoid stampeding the approval
//! gateway. Nothing is retried inside a tick; anything still `pending`
//! is picked up by the next one.

use axis_core::company::Company;
use axis_core::tick::{CompanyOutcome, ErrorLog, TickOptions, TickReport};
use axis_core::types::ApprovalAction;
use axis_core::workflow::AUTO_APPROVE_NOTE;
use chrono::Utc;

use crate::lease::LEASE_TTL;
use crate::state::AppState;

/// Run one tick.
///
/// Only company enumeration can fail here; that is the structural 500
/// case. Everything downstream of it is best-effort and lands in the
/// report's error list instead.
pub async fn run(state: &AppState, opts: TickOptions) -> axis_backend::Result<TickReport> {
    let log = ErrorLog::new();
    let mut report = TickReport::new(Utc::now());

    let companies = resolve_companies(state, &opts, &log).await?;

    let jobs = companies
        .iter()
        .map(|company| process_company(state, company, &opts, &log));
    for outcome in futures::future::join_all(jobs).await.into_iter().flatten() {
        report += outcome;
    }

    report.absorb_errors(&log);
    tracing::info!(
        companies = report.companies_processed,
        roles = report.roles_triggered,
        approvals_ok = report.approvals_succeeded,
        approvals_tried = report.approvals_attempted,
        errors = report.errors_count,
        "tick complete"
    );
    Ok(report)
}

async fn resolve_companies(
    state: &AppState,
    opts: &TickOptions,
    log: &ErrorLog,
) -> axis_backend::Result<Vec<Company>> {
    match opts.company_id {
        Some(id) => match state.backend.fetch_company(id).await? {
            Some(company) => Ok(vec![company]),
            None => {
                // Errors are data at this endpoint: an unknown id yields
                // an empty pass, not a 404.
                log.push(format!("company {id} not found"));
                Ok(Vec::new())
            }
        },
        None => state.backend.list_recent_companies(opts.max_companies).await,
    }
}

/// One company's slice of the tick. Never fails; `None` means the
/// company was skipped because another tick holds its lease.
async fn process_company(
    state: &AppState,
    company: &Company,
    opts: &TickOptions,
    log: &ErrorLog,
) -> Option<CompanyOutcome> {
    if !state.leases.acquire(company.id, LEASE_TTL) {
        log.push(format!(
            "company {} skipped: tick lease held by another run",
            company.id
        ));
        return None;
    }
    let outcome = drive_company(state, company, opts, log).await;
    state.leases.release(company.id);
    Some(outcome)
}

async fn drive_company(
    state: &AppState,
    company: &Company,
    opts: &TickOptions,
    log: &ErrorLog,
) -> CompanyOutcome {
    let mut outcome = CompanyOutcome::default();

    match state
        .backend
        .list_activated_roles(company.id, opts.max_roles_per_company)
        .await
    {
        Ok(roles) => {
            for role in roles {
                state.dispatcher.dispatch(role.id);
                outcome.roles_triggered += 1;
            }
        }
        Err(e) => log.push(format!("company {}: role fetch failed: {e}", company.id)),
    }

    match state
        .backend
        .list_pending_auto_approvable(company.id, opts.max_auto_approvals_per_company)
        .await
    {
        Ok(requests) => {
            for request in requests {
                outcome.approvals_attempted += 1;
                match state
                    .functions
                    .review_request(request.id, ApprovalAction::Approve, AUTO_APPROVE_NOTE)
                    .await
                {
                    Ok(()) => outcome.approvals_succeeded += 1,
                    Err(e) => log.push(format!(
                        "company {}: auto-approval of {} failed: {e}",
                        company.id, request.id
                    )),
                }
            }
        }
        Err(e) => log.push(format!(
            "company {}: pending request fetch failed: {e}",
            company.id
        )),
    }

    outcome
}
