//! One-shot bootstrap: discover the storage root and pre-populate the
//! cache before synchronous queries become meaningful.
//!
//! Legacy scripts probe for save files synchronously the moment they
//! start, racing this loader. The loader's failure mode is therefore
//! "cache stays empty" - a safe report of non-existence - never an
//! error raised into caller code. Readiness is an explicit one-shot
//! the host resolves when its bindings exist; there is no polling.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};

use crate::backend::HostBackend;
use crate::facade::Inner;

/// Handed to the host alongside the shim. The host calls
/// [`HostInstaller::install`] exactly once, when its native bindings
/// are ready; dropping it without installing leaves the shim degraded
/// (cache-only) forever.
pub struct HostInstaller {
    tx: oneshot::Sender<Arc<dyn HostBackend>>,
}

impl HostInstaller {
    pub(crate) fn new(tx: oneshot::Sender<Arc<dyn HostBackend>>) -> Self {
        HostInstaller { tx }
    }

    pub fn install(self, backend: Arc<dyn HostBackend>) {
        // Receiver gone means the shim itself was dropped.
        let _ = self.tx.send(backend);
    }
}

/// Runs once per shim. Steps 2-3 (resolve, list) are never retried;
/// only readiness is awaited.
pub(crate) async fn run(
    inner: Arc<Inner>,
    installed: oneshot::Receiver<Arc<dyn HostBackend>>,
    done: watch::Sender<bool>,
) {
    let Ok(backend) = installed.await else {
        diagnostics::log_warn!("host installer dropped without installing a backend");
        return;
    };
    // Publish the backend before touching it so facade operations stop
    // degrading even if base-dir resolution fails below.
    let _ = inner.backend.set(backend.clone());

    match backend.resolve_base_dir().await {
        Ok(base_dir) => {
            diagnostics::log_info!("resolved base directory {base_dir}", base_dir: base_dir.as_str());
            let _ = inner.base_dir.set(base_dir.clone());
            let save_dir = winpath::join(&[&base_dir, &inner.config.save_subdir]);
            populate_save_cache(&inner, backend.as_ref(), &save_dir).await;
        }
        Err(error) => {
            // Swallowed: path-dependent operations fall back to
            // relative paths and the cache reports non-existence.
            let error = error.to_string();
            diagnostics::log_warn!("base directory resolution failed: {error}", error: error.as_str());
        }
    }

    let _ = done.send(true);
}

async fn populate_save_cache(inner: &Inner, backend: &dyn HostBackend, save_dir: &str) {
    match backend.list_dir(save_dir).await {
        Ok(entries) => {
            let count = entries.len();
            let mut cache = inner.cache.lock();
            for name in &entries {
                cache.mark_file(&winpath::join(&[save_dir, name]));
            }
            if !entries.is_empty() {
                cache.mark_dir(save_dir);
            }
            diagnostics::log_info!("pre-populated {count} save entries from {save_dir}", count: count, save_dir: save_dir);
        }
        Err(error) => {
            // The save directory may legitimately not exist on first run.
            let error = error.to_string();
            diagnostics::log_debug!("save directory listing failed for {save_dir}: {error}", save_dir: save_dir, error: error.as_str());
        }
    }
}
