//! Cache write events
//!
//! `CacheEventEmitter` is the cache-access callback the pipeline uses by
//! default. When enabled it forwards one `CacheWriteEvent` per cache write
//! over an unbounded channel; when disabled it does nothing.
//!
//! ```rust,no_run
//! use ferrous_relay_infrastructure::dns::events::CacheEventEmitter;
//!
//! let (emitter, mut rx) = CacheEventEmitter::new_enabled();
//! tokio::spawn(async move {
//!     while let Some(event) = rx.recv().await {
//!         println!("{} cached for {}s", event.domain, event.ttl);
//!     }
//! });
//! ```

pub mod emitter;
pub mod types;

pub use emitter::CacheEventEmitter;
pub use types::CacheWriteEvent;
