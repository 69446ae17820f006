mod bootstrap;
mod stat;

use std::sync::Arc;

use crate::memory::{MemoryAssetSource, MemoryHostBackend};
use crate::{ShimConfig, ShimFs};

pub(crate) const BASE: &str = "C:\\Game";
pub(crate) const SAVE_DIR: &str = "C:\\Game\\save\\";
pub(crate) const SAVE1: &str = "C:\\Game\\save\\save1.dat";
pub(crate) const SAVE2: &str = "C:\\Game\\save\\save2.dat";

/// Starts a shim, installs `backend`, and waits out the bootstrap race.
pub(crate) async fn started_shim(backend: &MemoryHostBackend) -> ShimFs {
    started_shim_with_assets(backend, MemoryAssetSource::new()).await
}

pub(crate) async fn started_shim_with_assets(
    backend: &MemoryHostBackend,
    assets: MemoryAssetSource,
) -> ShimFs {
    let (shim, installer) = ShimFs::start(ShimConfig::default(), Arc::new(assets));
    installer.install(Arc::new(backend.clone()));
    shim.bootstrapped().await;
    shim
}

// The log macros expand to `emit::` paths resolved in this crate.
#[test]
fn test_log_macros_expand_here() {
    diagnostics::log_info!("shim started");
    diagnostics::log_debug!("cache hit for {path}", path: "C:\\Game\\save\\save1.dat");
    diagnostics::log_warn!("listing failed");
    diagnostics::log_error!("write rejected");
}
