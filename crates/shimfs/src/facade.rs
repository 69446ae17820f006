//! The sync/async filesystem facade.
//!
//! Synchronous call sites behave as if backed by a real synchronous
//! disk: existence checks and directory listings are pure cache reads,
//! writes mark the cache optimistically and drive the backend as a
//! scheduled side effect, and only `read_file_sync` genuinely blocks
//! (on the virtual-host fetch). The state machine is per logical file:
//! Unknown -> Believed-Present on an optimistic mark, back to Unknown
//! on rollback; a confirmation makes no observable transition.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::{Notify, mpsc, oneshot, watch};

use winpath::SEP;

use crate::assets::{AssetSource, asset_url};
use crate::backend::{FileStat, HostBackend};
use crate::bootstrap::{self, HostInstaller};
use crate::cache::CacheHandle;
use crate::config::ShimConfig;
use crate::error::{Error, Result};
use crate::reconcile::{self, Outcome, Reconciliation, Rollback};

pub(crate) struct Inner {
    pub(crate) config: ShimConfig,
    pub(crate) cache: CacheHandle,
    pub(crate) assets: Arc<dyn AssetSource>,
    pub(crate) backend: OnceLock<Arc<dyn HostBackend>>,
    pub(crate) base_dir: OnceLock<String>,
    reconcile_tx: UnboundedSender<Reconciliation>,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
    ready: watch::Receiver<bool>,
    runtime: tokio::runtime::Handle,
}

/// The filesystem facade. Cheap to clone; all clones share one cache,
/// one backend slot, and one reconciler.
#[derive(Clone)]
pub struct ShimFs {
    inner: Arc<Inner>,
}

impl ShimFs {
    /// Creates the facade and spawns its bootstrap and reconciler
    /// tasks. Must be called from within a tokio runtime.
    ///
    /// The returned [`HostInstaller`] is the readiness seam: the host
    /// calls `install` once its native bindings exist, which lets the
    /// bootstrap loader resolve the base directory and pre-list the
    /// save directory. Until then every operation degrades gracefully.
    pub fn start(config: ShimConfig, assets: Arc<dyn AssetSource>) -> (Self, HostInstaller) {
        let cache = CacheHandle::new();
        let (install_tx, install_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = watch::channel(false);
        let (reconcile_tx, reconcile_rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let idle = Arc::new(Notify::new());
        let runtime = tokio::runtime::Handle::current();

        let inner = Arc::new(Inner {
            config,
            cache: cache.clone(),
            assets,
            backend: OnceLock::new(),
            base_dir: OnceLock::new(),
            reconcile_tx,
            in_flight: in_flight.clone(),
            idle: idle.clone(),
            ready: ready_rx,
            runtime: runtime.clone(),
        });

        runtime.spawn(reconcile::run(reconcile_rx, cache, in_flight, idle));
        runtime.spawn(bootstrap::run(inner.clone(), install_rx, ready_tx));

        (ShimFs { inner }, HostInstaller::new(install_tx))
    }

    /// The resolved base directory, once the bootstrap loader has it.
    pub fn base_dir(&self) -> Option<String> {
        self.inner.base_dir.get().cloned()
    }

    /// Resolves once the bootstrap loader has finished (successfully or
    /// not). Facade operations never wait on this; it exists for hosts
    /// and tests that want a defined point after the bootstrap race.
    pub async fn bootstrapped(&self) {
        let mut ready = self.inner.ready.clone();
        let _ = ready.wait_for(|done| *done).await;
    }

    /// Waits until every scheduled backend operation has been
    /// reconciled. Hosts call this to flush pending writes before exit.
    pub async fn quiesce(&self) {
        loop {
            let mut idle = std::pin::pin!(self.inner.idle.notified());
            // Register before checking the counter so a decrement that
            // lands in between still wakes us.
            idle.as_mut().enable();
            if self.inner.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            idle.await;
        }
    }

    fn backend(&self) -> Option<Arc<dyn HostBackend>> {
        self.inner.backend.get().cloned()
    }

    fn backend_required(&self, op: &'static str) -> Result<Arc<dyn HostBackend>> {
        self.backend().ok_or_else(|| Error::backend_unavailable(op))
    }

    /// Fire-and-forget variant for the synchronous surface: the
    /// contract has no error channel, so a missing backend is logged
    /// and the optimistic cache state is left as-is.
    fn backend_or_log(&self, op: &'static str) -> Option<Arc<dyn HostBackend>> {
        let backend = self.backend();
        if backend.is_none() {
            diagnostics::log_error!("host backend not installed, dropping {op}", op: op);
        }
        backend
    }

    /// Schedules a backend operation. Completion is reported to the
    /// reconciler as a message; the task itself never touches the cache.
    fn spawn_op<F>(&self, op: &'static str, path: String, rollback: Rollback, operation: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        let tx = self.inner.reconcile_tx.clone();
        self.inner.runtime.spawn(async move {
            let outcome = match operation.await {
                Ok(()) => Outcome::Confirmed,
                Err(error) => Outcome::Failed(error.to_string()),
            };
            let _ = tx.send(Reconciliation {
                op,
                path,
                outcome,
                rollback,
            });
        });
    }

    // ----- synchronous surface -----

    /// Pure cache lookup, directory-aware on a trailing separator.
    /// Never performs I/O - the defining property that keeps it
    /// synchronous even mid-bootstrap.
    pub fn exists_sync(&self, path: &str) -> bool {
        self.inner.cache.lock().exists(path)
    }

    /// Blocking read through the virtual-host asset tree.
    ///
    /// Returns `None` for any miss - expected for save files that don't
    /// exist yet - and marks the file present on a hit. This is the
    /// only operation that blocks the calling thread.
    pub fn read_file_sync(&self, path: &str) -> Option<String> {
        let url = asset_url(
            &self.inner.config.asset_host,
            self.base_dir().as_deref(),
            path,
        );
        let text = self.inner.assets.fetch_text(&url)?;
        self.inner.cache.lock().mark_file(path);
        Some(text)
    }

    /// Optimistically marks the file present, then schedules the
    /// backend write. A failed write rolls the mark back, so callers
    /// observe `exists_sync == true` only during the documented
    /// staleness window.
    pub fn write_file_sync(&self, path: &str, data: &str) {
        self.inner.cache.lock().mark_file(path);
        let Some(backend) = self.backend_or_log("write_file") else {
            return;
        };
        let path = path.to_string();
        let data = data.to_string();
        self.spawn_op(
            "write_file",
            path.clone(),
            Rollback::UnmarkFile(path.clone()),
            async move { backend.write_file(&path, &data).await },
        );
    }

    /// Marks the directory present immediately and unconditionally.
    /// Directory-already-exists is success, so there is no rollback
    /// path for mkdir.
    pub fn mkdir_sync(&self, path: &str) {
        self.inner.cache.lock().mark_dir(path);
        let Some(backend) = self.backend_or_log("make_dir") else {
            return;
        };
        let path = path.to_string();
        self.spawn_op("make_dir", path.clone(), Rollback::None, async move {
            backend.make_dir(&path).await
        });
    }

    /// Removes the believed-present entry immediately; a failed delete
    /// restores it.
    pub fn unlink_sync(&self, path: &str) {
        let was_present = self.inner.cache.lock().unmark_file(path);
        let Some(backend) = self.backend_or_log("remove_file") else {
            return;
        };
        let rollback = if was_present {
            Rollback::RemarkFile(path.to_string())
        } else {
            Rollback::None
        };
        let path = path.to_string();
        self.spawn_op("remove_file", path.clone(), rollback, async move {
            backend.remove_file(&path).await
        });
    }

    /// Moves the believed-present entry from `from` to `to`; a failed
    /// rename reverts the move. If `from` was unknown the cache is left
    /// untouched either way.
    pub fn rename_sync(&self, from: &str, to: &str) {
        let moved = {
            let mut cache = self.inner.cache.lock();
            if cache.unmark_file(from) {
                cache.mark_file(to);
                true
            } else {
                false
            }
        };
        let Some(backend) = self.backend_or_log("rename") else {
            return;
        };
        let rollback = if moved {
            Rollback::RevertRename {
                from: from.to_string(),
                to: to.to_string(),
            }
        } else {
            Rollback::None
        };
        let from = from.to_string();
        let to = to.to_string();
        self.spawn_op("rename", from.clone(), rollback, async move {
            backend.rename(&from, &to).await
        });
    }

    /// Marks the destination present; a failed copy unmarks it.
    pub fn copy_file_sync(&self, from: &str, to: &str) {
        self.inner.cache.lock().mark_file(to);
        let Some(backend) = self.backend_or_log("copy_file") else {
            return;
        };
        let from = from.to_string();
        let to = to.to_string();
        self.spawn_op(
            "copy_file",
            to.clone(),
            Rollback::UnmarkFile(to.clone()),
            async move { backend.copy_file(&from, &to).await },
        );
    }

    /// Marks the path present and schedules the append. A failed append
    /// is only logged: the file may well have existed before this call,
    /// so unmarking would manufacture a false negative.
    pub fn append_file_sync(&self, path: &str, data: &str) {
        self.inner.cache.lock().mark_file(path);
        let Some(backend) = self.backend_or_log("append_file") else {
            return;
        };
        let path = path.to_string();
        let data = data.to_string();
        self.spawn_op("append_file", path.clone(), Rollback::None, async move {
            backend.append_file(&path, &data).await
        });
    }

    /// Cache projection of the immediate children of `dir`. Not a
    /// backend call: files created by other processes and never
    /// observed by this layer are under-reported.
    pub fn readdir_sync(&self, dir: &str) -> Vec<String> {
        self.inner.cache.lock().list_dir(dir)
    }

    /// Fixed-shape placeholder descriptor. File vs directory is decided
    /// solely by created-directory membership; size and timestamps are
    /// not sourced from the backend.
    pub fn stat_sync(&self, path: &str) -> FileStat {
        let is_dir = {
            let cache = self.inner.cache.lock();
            cache.dir_exists(path)
        };
        if is_dir {
            FileStat::placeholder_dir()
        } else {
            FileStat::placeholder_file()
        }
    }

    // ----- asynchronous surface -----

    /// Optimistic mark, awaited backend write, rollback on failure.
    pub async fn write_file(&self, path: &str, data: &str) -> Result<()> {
        let backend = self.backend_required("write_file")?;
        self.inner.cache.lock().mark_file(path);
        match backend.write_file(path, data).await {
            Ok(()) => Ok(()),
            Err(error) => {
                self.inner.cache.lock().unmark_file(path);
                Err(error)
            }
        }
    }

    pub async fn read_file(&self, path: &str) -> Result<String> {
        let backend = self.backend_required("read_file")?;
        backend.read_file(path).await
    }

    pub async fn mkdir(&self, path: &str) -> Result<()> {
        self.inner.cache.lock().mark_dir(path);
        let backend = self.backend_required("make_dir")?;
        backend.make_dir(path).await
    }

    pub async fn unlink(&self, path: &str) -> Result<()> {
        let backend = self.backend_required("remove_file")?;
        let was_present = self.inner.cache.lock().unmark_file(path);
        match backend.remove_file(path).await {
            Ok(()) => Ok(()),
            Err(error) => {
                if was_present {
                    self.inner.cache.lock().mark_file(path);
                }
                Err(error)
            }
        }
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let backend = self.backend_required("rename")?;
        let moved = {
            let mut cache = self.inner.cache.lock();
            if cache.unmark_file(from) {
                cache.mark_file(to);
                true
            } else {
                false
            }
        };
        match backend.rename(from, to).await {
            Ok(()) => Ok(()),
            Err(error) => {
                if moved {
                    let mut cache = self.inner.cache.lock();
                    cache.unmark_file(to);
                    cache.mark_file(from);
                }
                Err(error)
            }
        }
    }

    pub async fn copy_file(&self, from: &str, to: &str) -> Result<()> {
        let backend = self.backend_required("copy_file")?;
        self.inner.cache.lock().mark_file(to);
        match backend.copy_file(from, to).await {
            Ok(()) => Ok(()),
            Err(error) => {
                self.inner.cache.lock().unmark_file(to);
                Err(error)
            }
        }
    }

    pub async fn append_file(&self, path: &str, data: &str) -> Result<()> {
        let backend = self.backend_required("append_file")?;
        self.inner.cache.lock().mark_file(path);
        backend.append_file(path, data).await
    }

    /// Authoritative backend listing. Every returned entry is marked in
    /// the cache, converging the projection towards backend reality.
    pub async fn readdir(&self, dir: &str) -> Result<Vec<String>> {
        let backend = self.backend_required("list_dir")?;
        let names = backend.list_dir(dir).await?;
        let mut prefix = winpath::normalize(dir);
        if !prefix.ends_with(SEP) {
            prefix.push(SEP);
        }
        {
            let mut cache = self.inner.cache.lock();
            for name in &names {
                cache.mark_file(&format!("{prefix}{name}"));
            }
        }
        Ok(names)
    }

    /// Prefers the authoritative backend descriptor; falls back to the
    /// synchronous placeholder on failure or before the backend exists.
    pub async fn stat(&self, path: &str) -> FileStat {
        match self.backend() {
            Some(backend) => match backend.stat(path).await {
                Ok(stat) => stat,
                Err(error) => {
                    let error = error.to_string();
                    diagnostics::log_debug!(
                        "stat fell back to placeholder for {path}: {error}",
                        path: path,
                        error: error.as_str()
                    );
                    self.stat_sync(path)
                }
            },
            None => self.stat_sync(path),
        }
    }

    /// Backend existence probe via stat. `false` on any failure.
    pub async fn exists(&self, path: &str) -> bool {
        match self.backend() {
            Some(backend) => backend.stat(path).await.is_ok(),
            None => false,
        }
    }
}
