pub mod cache;
pub mod stats;

pub use cache::{CacheEntryResponse, CacheRecordResponse, ErrorResponse};
pub use stats::{AdmissionStats, CacheStats, CoalescerStats, StatsResponse};
