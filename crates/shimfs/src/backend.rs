//! Host backend trait.
//!
//! Everything the native host exposes is asynchronous and
//! string-marshalled; each operation resolves to success-with-payload
//! or failure-with-error, never a partial result. This layer does not
//! retry, time out, or cancel: once invoked, a backend call runs to
//! completion and its continuation fires exactly once.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for the native asynchronous storage/process-control layer.
#[async_trait]
pub trait HostBackend: Send + Sync {
    /// Resolve the executable/base directory. Called exactly once, by
    /// the bootstrap loader.
    async fn resolve_base_dir(&self) -> Result<String>;

    /// List the entry names of a directory.
    async fn list_dir(&self, dir: &str) -> Result<Vec<String>>;

    async fn write_file(&self, path: &str, data: &str) -> Result<()>;

    async fn read_file(&self, path: &str) -> Result<String>;

    async fn make_dir(&self, path: &str) -> Result<()>;

    async fn remove_file(&self, path: &str) -> Result<()>;

    async fn rename(&self, from: &str, to: &str) -> Result<()>;

    async fn copy_file(&self, from: &str, to: &str) -> Result<()>;

    async fn append_file(&self, path: &str, data: &str) -> Result<()>;

    async fn stat(&self, path: &str) -> Result<FileStat>;
}

/// File descriptor crossing the host boundary, and the fixed-shape
/// placeholder served by the synchronous stat path.
///
/// Timestamps are millisecond epoch values because the host marshals
/// them as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    #[serde(default)]
    pub size: u64,
    pub is_file: bool,
    pub is_directory: bool,
    #[serde(default)]
    pub mtime_ms: i64,
    #[serde(default)]
    pub ctime_ms: i64,
    #[serde(default)]
    pub atime_ms: i64,
}

impl FileStat {
    /// Placeholder file descriptor: size and timestamps are not sourced
    /// from the backend.
    pub fn placeholder_file() -> Self {
        FileStat {
            size: 0,
            is_file: true,
            is_directory: false,
            mtime_ms: 0,
            ctime_ms: 0,
            atime_ms: 0,
        }
    }

    /// Placeholder directory descriptor.
    pub fn placeholder_dir() -> Self {
        FileStat {
            is_file: false,
            is_directory: true,
            ..Self::placeholder_file()
        }
    }

    /// Parse a string-marshalled stat payload from a host adapter.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| Error::payload("stat", e))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::payload("stat", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_payload_parsing() {
        let stat = FileStat::from_json(
            r#"{"size":120,"is_file":true,"is_directory":false,"mtime_ms":1700000000000}"#,
        )
        .unwrap();
        assert_eq!(stat.size, 120);
        assert!(stat.is_file);
        assert!(!stat.is_directory);
        assert_eq!(stat.mtime_ms, 1_700_000_000_000);
        // Absent fields take their defaults
        assert_eq!(stat.atime_ms, 0);
    }

    #[test]
    fn test_stat_payload_malformed() {
        let err = FileStat::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Payload { op: "stat", .. }));
    }
}
