//! Single-flight execution of upstream resolutions.
//!
//! The first caller for a key spawns the work on its own task and registers
//! a watch channel for it. Callers arriving while it runs subscribe to the
//! same channel. When the work finishes, the key is deregistered and only
//! then is the result published, so a call made after publication always
//! starts a new execution.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ferrous_relay_domain::DomainError;
use futures::FutureExt;
use rustc_hash::FxBuildHasher;
use std::any::Any;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error};

/// Default bound on how long one caller waits for a shared result.
pub const DEFAULT_COALESCE_TIMEOUT: Duration = Duration::from_secs(2);

type Outcome<T> = Option<Result<T, DomainError>>;
type Inflight<K, T> = DashMap<K, watch::Receiver<Outcome<T>>, FxBuildHasher>;

pub struct RequestCoalescer<K, T> {
    inflight: Arc<Inflight<K, T>>,
    wait_timeout: Duration,
    executions: AtomicU64,
    joins: AtomicU64,
}

impl<K, T> RequestCoalescer<K, T>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(wait_timeout: Duration) -> Self {
        Self {
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher::default())),
            wait_timeout,
            executions: AtomicU64::new(0),
            joins: AtomicU64::new(0),
        }
    }

    /// Runs `work` for `key` unless an execution for it is already in
    /// flight, in which case the caller waits for that one instead.
    ///
    /// `work` is only invoked by the caller that starts an execution. The
    /// wait is bounded by the coalescer's timeout; a caller that times out
    /// gets [`DomainError::QueryTimeout`] while the execution carries on.
    pub async fn execute<F, Fut>(&self, key: K, work: F) -> Result<T, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>> + Send + 'static,
    {
        let (mut rx, leader) = match self.inflight.entry(key.clone()) {
            Entry::Occupied(occupied) => {
                self.joins.fetch_add(1, Ordering::Relaxed);
                (occupied.get().clone(), None)
            }
            Entry::Vacant(vacant) => {
                let (tx, rx) = watch::channel(None);
                vacant.insert(rx.clone());
                self.executions.fetch_add(1, Ordering::Relaxed);
                (rx, Some(tx))
            }
        };

        if let Some(tx) = leader {
            let cleanup = InflightCleanupGuard {
                inflight: Arc::clone(&self.inflight),
                key: Some(key),
            };
            let fut = work();
            tokio::spawn(async move {
                let result = match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => {
                        let reason = panic_message(&*panic);
                        error!(reason = %reason, "Coalesced resolution panicked");
                        Err(DomainError::CoalescedExecutionFailed(reason))
                    }
                };
                drop(cleanup);
                tx.send_replace(Some(result));
            });
        }

        self.wait(&mut rx).await
    }

    async fn wait(&self, rx: &mut watch::Receiver<Outcome<T>>) -> Result<T, DomainError> {
        match tokio::time::timeout(self.wait_timeout, rx.wait_for(Option::is_some)).await {
            Err(_) => {
                debug!(
                    timeout_ms = self.wait_timeout.as_millis() as u64,
                    "Coalesced wait timed out"
                );
                Err(DomainError::QueryTimeout)
            }
            Ok(Err(_)) => Err(DomainError::CoalescedExecutionFailed(
                "resolution ended without a result".to_string(),
            )),
            Ok(Ok(outcome)) => (*outcome).clone().unwrap_or_else(|| {
                Err(DomainError::CoalescedExecutionFailed(
                    "resolution ended without a result".to_string(),
                ))
            }),
        }
    }

    /// Keys with an execution currently running.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::Relaxed)
    }

    /// Callers that attached to an execution started by someone else.
    pub fn joins(&self) -> u64 {
        self.joins.load(Ordering::Relaxed)
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }
}

/// Deregisters the key when the execution task finishes or is torn down.
struct InflightCleanupGuard<K, T>
where
    K: Eq + Hash,
{
    inflight: Arc<Inflight<K, T>>,
    key: Option<K>,
}

impl<K, T> Drop for InflightCleanupGuard<K, T>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.inflight.remove(&key);
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "resolution panicked".to_string()
    }
}
