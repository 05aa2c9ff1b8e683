use super::CacheWriteEvent;
use crate::dns::cache::{CacheAccessCallback, CacheEntry, CacheKey};
use ferrous_relay_domain::DomainError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Non-blocking emitter for cache write events.
///
/// Uses an unbounded channel, so `emit` never awaits. Events are
/// fire-and-forget: a closed channel drops them silently and never fails
/// the cache write.
#[derive(Clone)]
pub struct CacheEventEmitter {
    sender: Option<mpsc::UnboundedSender<CacheWriteEvent>>,
}

impl CacheEventEmitter {
    /// Creates a disabled emitter; `emit()` becomes a no-op.
    pub fn new_disabled() -> Self {
        Self { sender: None }
    }

    /// Creates an enabled emitter and returns the receiver for the consumer
    /// task.
    pub fn new_enabled() -> (Self, mpsc::UnboundedReceiver<CacheWriteEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let emitter = Self { sender: Some(tx) };
        (emitter, rx)
    }

    pub fn emit(&self, event: CacheWriteEvent) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(event);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }
}

impl CacheAccessCallback for CacheEventEmitter {
    fn on_cache_write(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), DomainError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let now = Instant::now();
        self.emit(CacheWriteEvent::new(
            Arc::clone(&key.domain),
            key.record_type,
            entry.answers.len(),
            entry.remaining_ttl(now),
            !entry.is_fresh(now),
        ));
        Ok(())
    }
}

impl Default for CacheEventEmitter {
    fn default() -> Self {
        Self::new_disabled()
    }
}

impl std::fmt::Debug for CacheEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEventEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
