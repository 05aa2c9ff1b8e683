use hickory_proto::op::ResponseCode;
use hickory_proto::rr::Record;
use std::sync::Arc;
use std::time::Instant;

/// Effective and unclamped expiry computed by the TTL policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Hit/miss boundary; the entry is fresh while `deadline > now`.
    pub deadline: Instant,
    /// `now + advertised TTL`, before the floor or any override.
    pub original_deadline: Instant,
}

/// One cached answer set.
///
/// `answers` is immutable once written and shared by reference between the
/// store, snapshots and replies. A refresh replaces the whole slice.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub answers: Arc<[Record]>,
    pub response_code: ResponseCode,
    pub deadline: Instant,
    pub original_deadline: Instant,
}

impl CacheEntry {
    pub fn new(answers: Arc<[Record]>, response_code: ResponseCode, deadlines: Deadlines) -> Self {
        Self {
            answers,
            response_code,
            deadline: deadlines.deadline,
            original_deadline: deadlines.original_deadline,
        }
    }

    #[inline]
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.deadline > now
    }

    /// Seconds a client may keep this answer.
    ///
    /// Counts down to `deadline` while the entry is fresh. An entry written
    /// already expired (caching disabled for its domain) falls back to the
    /// advertised lifetime instead.
    pub fn remaining_ttl(&self, now: Instant) -> u32 {
        let until = if self.is_fresh(now) {
            self.deadline
        } else {
            self.original_deadline
        };
        let secs = until.saturating_duration_since(now).as_secs();
        u32::try_from(secs).unwrap_or(u32::MAX)
    }

    /// Copies of the answer records with their TTL rewritten to
    /// [`remaining_ttl`](Self::remaining_ttl).
    pub fn answers_with_remaining_ttl(&self, now: Instant) -> Vec<Record> {
        let ttl = self.remaining_ttl(now);
        self.answers
            .iter()
            .map(|record| {
                let mut record = record.clone();
                record.set_ttl(ttl);
                record
            })
            .collect()
    }

    pub fn is_negative(&self) -> bool {
        self.response_code == ResponseCode::NXDomain
    }
}
