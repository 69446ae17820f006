//! Synchronous filesystem facade over an asynchronous host backend.
//!
//! Legacy scripting code written against a desktop shell's synchronous
//! filesystem API runs unmodified inside a browser-based host whose
//! only real storage operations are asynchronous round-trips. The shim
//! keeps a process-lifetime existence cache as the single source of
//! truth for every synchronous query: writes mark it optimistically and
//! reconcile asynchronously, the bootstrap loader pre-populates it from
//! the save directory, and reads go through a blocking fetch against
//! the virtual asset host.
//!
//! This is a best-effort synchronous *appearance*, not transactional
//! correctness: no atomicity, no durability guarantees.

pub mod assets;
pub mod backend;
mod bootstrap;
pub mod cache;
mod config;
mod error;
mod facade;
pub mod memory;
mod reconcile;

#[cfg(test)]
mod tests;

pub use assets::{AssetSource, HttpAssetSource, asset_url};
pub use backend::{FileStat, HostBackend};
pub use bootstrap::HostInstaller;
pub use cache::{CacheHandle, CacheStore};
pub use config::ShimConfig;
pub use error::{Error, Result};
pub use facade::ShimFs;
