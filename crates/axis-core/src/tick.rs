//! Policy types for the autonomy tick: request-option clamping, the
//! bounded error collector, and the aggregate report.
//!
//! The tick endpoint clamps whatever callers send instead of rejecting
//! it, so a scheduler that guesses generously keeps working when the
//! bounds tighten. Errors during a tick are data, not transport
//! failures: they accumulate here and ship in the 200 response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

pub const MAX_COMPANIES_RANGE: (usize, usize) = (1, 100);
pub const MAX_ROLES_RANGE: (usize, usize) = (1, 30);
pub const MAX_APPROVALS_RANGE: (usize, usize) = (1, 100);

pub const DEFAULT_MAX_COMPANIES: usize = 12;
pub const DEFAULT_MAX_ROLES: usize = 8;
pub const DEFAULT_MAX_APPROVALS: usize = 30;

/// Cap on error strings retained in a report. The total keeps counting.
pub const MAX_REPORTED_ERRORS: usize = 50;

// ---------------------------------------------------------------------------
// TickRequest / TickOptions
// ---------------------------------------------------------------------------

/// Raw, untrusted request body for the tick endpoint. Every field is
/// optional; a missing or malformed body means all-defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickRequest {
    pub company_id: Option<Uuid>,
    pub max_companies: Option<i64>,
    pub max_roles_per_company: Option<i64>,
    pub max_auto_approvals_per_company: Option<i64>,
}

/// Effective, clamped tick parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOptions {
    /// Process exactly this company instead of scanning.
    pub company_id: Option<Uuid>,
    pub max_companies: usize,
    pub max_roles_per_company: usize,
    pub max_auto_approvals_per_company: usize,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            company_id: None,
            max_companies: DEFAULT_MAX_COMPANIES,
            max_roles_per_company: DEFAULT_MAX_ROLES,
            max_auto_approvals_per_company: DEFAULT_MAX_APPROVALS,
        }
    }
}

impl TickOptions {
    /// Clamp a raw request into effective options. Out-of-range values
    /// coerce to the nearest bound; they are never rejected.
    pub fn from_request(req: TickRequest) -> Self {
        Self {
            company_id: req.company_id,
            max_companies: clamp(req.max_companies, MAX_COMPANIES_RANGE, DEFAULT_MAX_COMPANIES),
            max_roles_per_company: clamp(
                req.max_roles_per_company,
                MAX_ROLES_RANGE,
                DEFAULT_MAX_ROLES,
            ),
            max_auto_approvals_per_company: clamp(
                req.max_auto_approvals_per_company,
                MAX_APPROVALS_RANGE,
                DEFAULT_MAX_APPROVALS,
            ),
        }
    }
}

fn clamp(value: Option<i64>, (lo, hi): (usize, usize), default: usize) -> usize {
    match value {
        None => default,
        Some(v) if v < lo as i64 => lo,
        Some(v) if v > hi as i64 => hi,
        Some(v) => v as usize,
    }
}

// ---------------------------------------------------------------------------
// ErrorLog
// ---------------------------------------------------------------------------

/// Append-only error collector shared across a tick's concurrent company
/// jobs. Retains at most [`MAX_REPORTED_ERRORS`] entries; the total
/// counter is exact regardless.
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Mutex<Vec<String>>,
    total: AtomicUsize,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock().expect("error log poisoned");
        if entries.len() < MAX_REPORTED_ERRORS {
            entries.push(message.into());
        }
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Retained entries, in arrival order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("error log poisoned").clone()
    }
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// Aggregate result of one tick, returned as the endpoint body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub ok: bool,
    pub tick_at: DateTime<Utc>,
    pub companies_processed: usize,
    pub roles_triggered: usize,
    pub approvals_attempted: usize,
    pub approvals_succeeded: usize,
    pub errors_count: usize,
    pub errors: Vec<String>,
}

impl TickReport {
    pub fn new(tick_at: DateTime<Utc>) -> Self {
        Self {
            ok: true,
            tick_at,
            companies_processed: 0,
            roles_triggered: 0,
            approvals_attempted: 0,
            approvals_succeeded: 0,
            errors_count: 0,
            errors: Vec::new(),
        }
    }

    /// Fold the shared error log into the report.
    pub fn absorb_errors(&mut self, log: &ErrorLog) {
        self.errors = log.entries();
        self.errors_count = log.total();
    }
}

/// Per-company contribution to a tick, summed into the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyOutcome {
    pub roles_triggered: usize,
    pub approvals_attempted: usize,
    pub approvals_succeeded: usize,
}

impl std::ops::AddAssign<CompanyOutcome> for TickReport {
    fn add_assign(&mut self, rhs: CompanyOutcome) {
        self.companies_processed += 1;
        self.roles_triggered += rhs.roles_triggered;
        self.approvals_attempted += rhs.approvals_attempted;
        self.approvals_succeeded += rhs.approvals_succeeded;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_body_is_empty() {
        let opts = TickOptions::from_request(TickRequest::default());
        assert_eq!(opts, TickOptions::default());
        assert_eq!(opts.max_companies, 12);
        assert_eq!(opts.max_roles_per_company, 8);
        assert_eq!(opts.max_auto_approvals_per_company, 30);
    }

    #[test]
    fn clamps_high_values_to_upper_bound() {
        let opts = TickOptions::from_request(TickRequest {
            company_id: None,
            max_companies: Some(1000),
            max_roles_per_company: Some(500),
            max_auto_approvals_per_company: Some(999),
        });
        assert_eq!(opts.max_companies, 100);
        assert_eq!(opts.max_roles_per_company, 30);
        assert_eq!(opts.max_auto_approvals_per_company, 100);
    }

    #[test]
    fn clamps_low_and_negative_values_to_one() {
        let opts = TickOptions::from_request(TickRequest {
            company_id: None,
            max_companies: Some(0),
            max_roles_per_company: Some(-3),
            max_auto_approvals_per_company: Some(0),
        });
        assert_eq!(opts.max_companies, 1);
        assert_eq!(opts.max_roles_per_company, 1);
        assert_eq!(opts.max_auto_approvals_per_company, 1);
    }

    #[test]
    fn in_range_values_pass_through() {
        let opts = TickOptions::from_request(TickRequest {
            company_id: None,
            max_companies: Some(50),
            max_roles_per_company: Some(30),
            max_auto_approvals_per_company: Some(1),
        });
        assert_eq!(opts.max_companies, 50);
        assert_eq!(opts.max_roles_per_company, 30);
        assert_eq!(opts.max_auto_approvals_per_company, 1);
    }

    #[test]
    fn company_id_carries_through() {
        let id = Uuid::new_v4();
        let opts = TickOptions::from_request(TickRequest {
            company_id: Some(id),
            ..Default::default()
        });
        assert_eq!(opts.company_id, Some(id));
    }

    #[test]
    fn error_log_bounds_entries_but_counts_all() {
        let log = ErrorLog::new();
        for i in 0..80 {
            log.push(format!("error {i}"));
        }
        assert_eq!(log.total(), 80);
        let entries = log.entries();
        assert_eq!(entries.len(), MAX_REPORTED_ERRORS);
        assert_eq!(entries[0], "error 0");
        assert_eq!(entries[49], "error 49");
    }

    #[test]
    fn error_log_is_shareable_across_threads() {
        let log = std::sync::Arc::new(ErrorLog::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        log.push("boom");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(log.total(), 100);
        assert_eq!(log.entries().len(), MAX_REPORTED_ERRORS);
    }

    #[test]
    fn report_sums_company_outcomes() {
        let mut report = TickReport::new(Utc::now());
        report += CompanyOutcome {
            roles_triggered: 3,
            approvals_attempted: 2,
            approvals_succeeded: 1,
        };
        report += CompanyOutcome {
            roles_triggered: 1,
            approvals_attempted: 0,
            approvals_succeeded: 0,
        };
        assert_eq!(report.companies_processed, 2);
        assert_eq!(report.roles_triggered, 4);
        assert_eq!(report.approvals_attempted, 2);
        assert_eq!(report.approvals_succeeded, 1);
    }

    #[test]
    fn absorb_errors_copies_bounded_entries_and_true_total() {
        let log = ErrorLog::new();
        for i in 0..60 {
            log.push(format!("e{i}"));
        }
        let mut report = TickReport::new(Utc::now());
        report.absorb_errors(&log);
        assert_eq!(report.errors.len(), 50);
        assert_eq!(report.errors_count, 60);
    }
}
