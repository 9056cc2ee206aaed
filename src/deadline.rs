//! Deadline-bounded execution of blocking operations.
//!
//! The cluster client library blocks with no cancellation hook, so the guard
//! cannot interrupt a call mid-flight. It runs the operation on a blocking
//! worker, waits up to the deadline, and on expiry returns the caller's
//! default while the worker finishes on its own. The detachment is logged
//! explicitly rather than happening silently.

use std::time::Duration;

use tracing::{info, warn};

/// Runs an operation but never lets the caller block past a deadline.
pub struct DeadlineGuard;

impl DeadlineGuard {
    /// Run `op` on a blocking worker and wait at most `deadline_secs` for it.
    ///
    /// The caller polls at 1-second granularity, logging a progress tick per
    /// elapsed second. If the operation completes in time its value is
    /// returned; otherwise `default` is returned immediately and the worker
    /// keeps running detached. Never raises: a panicked operation also
    /// yields `default`.
    pub async fn run<F, T>(op: F, deadline_secs: u64, default: T) -> T
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut handle = tokio::task::spawn_blocking(op);

        for waited in 1..=deadline_secs {
            match tokio::time::timeout(Duration::from_secs(1), &mut handle).await {
                Ok(Ok(value)) => return value,
                Ok(Err(join_error)) => {
                    warn!(error = %join_error, "guarded operation panicked; using default");
                    return default;
                }
                Err(_elapsed) => info!("waiting {}/{}", waited, deadline_secs),
            }
        }

        warn!(
            deadline_secs,
            "deadline elapsed; operation detached and may still be running"
        );
        default
    }
}
