pub mod cache;
pub mod health;
pub mod stats;

pub use cache::{evict_cache_entry, get_cache_snapshot};
pub use health::health_check;
pub use stats::get_stats;
