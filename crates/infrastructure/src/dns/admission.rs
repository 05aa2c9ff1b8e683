use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Default ceiling for concurrently forwarded queries.
pub const DEFAULT_MAX_CONCURRENT_QUERIES: usize = 5000;

/// Process-wide gate in front of upstream-bound work.
///
/// The check and the increment are two separate atomic operations; under
/// extreme contention the counter can briefly overshoot the ceiling by the
/// number of racing callers.
#[derive(Debug)]
pub struct AdmissionController {
    in_flight: Arc<AtomicUsize>,
    ceiling: usize,
    denied: AtomicU64,
}

impl AdmissionController {
    pub fn new(ceiling: usize) -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            ceiling,
            denied: AtomicU64::new(0),
        }
    }

    /// Returns a permit, or `None` when the ceiling has been reached.
    pub fn try_admit(&self) -> Option<AdmissionPermit> {
        let current = self.in_flight.load(Ordering::Acquire);
        if current >= self.ceiling {
            let denied = self.denied.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                in_flight = current,
                ceiling = self.ceiling,
                denied_total = denied,
                "Admission denied: concurrent query ceiling reached"
            );
            return None;
        }

        self.in_flight.fetch_add(1, Ordering::AcqRel);
        Some(AdmissionPermit {
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Requests turned away since startup.
    pub fn denied(&self) -> u64 {
        self.denied.load(Ordering::Relaxed)
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_QUERIES)
    }
}

/// Slot held by one admitted pipeline invocation; released on drop.
#[must_use = "dropping the permit releases the admission slot immediately"]
#[derive(Debug)]
pub struct AdmissionPermit {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
