use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default lease duration; comfortably longer than a tick's worst-case
/// time inside one company.
pub const LEASE_TTL: Duration = Duration::from_secs(60);

/// In-process per-company lease guarding against overlapping ticks
/// double-processing the same company.
///
/// This is a single-instance guard only. Across instances, correctness
/// still rests on the gateway's pending-status check: a duplicate tick
/// there degrades to a 409 and wasted work, not a double side effect.
#[derive(Clone, Default)]
pub struct TickLeases {
    inner: Arc<Mutex<HashMap<Uuid, Instant>>>,
}

impl TickLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lease for a company. Returns false while a live lease is
    /// held by another tick; expired leases are reaped on the way in.
    pub fn acquire(&self, company_id: Uuid, ttl: Duration) -> bool {
        let mut leases = self.inner.lock().expect("lease map poisoned");
        let now = Instant::now();
        leases.retain(|_, expires| *expires > now);
        if leases.contains_key(&company_id) {
            return false;
        }
        leases.insert(company_id, now + ttl);
        true
    }

    pub fn release(&self, company_id: Uuid) {
        self.inner
            .lock()
            .expect("lease map poisoned")
            .remove(&company_id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
