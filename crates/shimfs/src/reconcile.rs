//! Reconciliation of optimistic cache updates with backend outcomes.
//!
//! A synchronous facade call marks the cache first and schedules the
//! backend operation as a task. When that task completes it does not
//! mutate the cache itself: it sends a [`Reconciliation`] message here,
//! and this task alone applies rollbacks. A rollback reverts exactly
//! the cache entries whose success was not confirmed; confirmed
//! operations make no observable transition.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::cache::CacheHandle;

#[derive(Debug)]
pub(crate) enum Outcome {
    Confirmed,
    Failed(String),
}

/// Cache reversion paired with a specific path/operation. Never a
/// global undo: backend confirmations may complete out of order.
#[derive(Debug)]
pub(crate) enum Rollback {
    /// Nothing to revert (mkdir, append).
    None,
    /// Revert an optimistic file mark (write, copy).
    UnmarkFile(String),
    /// Restore a believed-present entry removed optimistically (unlink).
    RemarkFile(String),
    /// Undo an optimistic rename move.
    RevertRename { from: String, to: String },
}

#[derive(Debug)]
pub(crate) struct Reconciliation {
    pub op: &'static str,
    pub path: String,
    pub outcome: Outcome,
    pub rollback: Rollback,
}

/// Runs until every sender is dropped, i.e. for the shim's lifetime.
pub(crate) async fn run(
    mut rx: UnboundedReceiver<Reconciliation>,
    cache: CacheHandle,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
) {
    while let Some(message) = rx.recv().await {
        apply(&cache, &message);
        if in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            idle.notify_waiters();
        }
    }
}

fn apply(cache: &CacheHandle, message: &Reconciliation) {
    let op = message.op;
    let path = message.path.as_str();
    match &message.outcome {
        Outcome::Confirmed => {
            diagnostics::log_debug!("{op} confirmed for {path}", op: op, path: path);
        }
        Outcome::Failed(error) => {
            let mut cache = cache.lock();
            match &message.rollback {
                Rollback::None => {
                    diagnostics::log_warn!("{op} failed for {path}: {error}", op: op, path: path, error: error.as_str());
                }
                Rollback::UnmarkFile(p) => {
                    diagnostics::log_error!(
                        "{op} failed for {path}, rolling back: {error}",
                        op: op,
                        path: path,
                        error: error.as_str()
                    );
                    cache.unmark_file(p);
                }
                Rollback::RemarkFile(p) => {
                    diagnostics::log_error!(
                        "{op} failed for {path}, restoring entry: {error}",
                        op: op,
                        path: path,
                        error: error.as_str()
                    );
                    cache.mark_file(p);
                }
                Rollback::RevertRename { from, to } => {
                    diagnostics::log_error!(
                        "{op} failed for {path}, reverting move: {error}",
                        op: op,
                        path: path,
                        error: error.as_str()
                    );
                    cache.unmark_file(to);
                    cache.mark_file(from);
                }
            }
        }
    }
}
