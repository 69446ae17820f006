//! In-memory host backend and asset source.
//!
//! Primarily for testing the facade's optimistic-update behavior
//! without a real host: per-operation failure injection simulates a
//! backend that accepts the call and later rejects it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use winpath::SEP;

use crate::assets::AssetSource;
use crate::backend::{FileStat, HostBackend};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct State {
    base_dir: String,
    files: HashMap<String, String>,
    dirs: HashSet<String>,
    failing: HashSet<&'static str>,
}

impl State {
    fn check(&self, op: &'static str, path: &str) -> Result<()> {
        if self.failing.contains(op) {
            Err(Error::backend(op, path, "injected failure"))
        } else {
            Ok(())
        }
    }
}

/// In-memory [`HostBackend`] with failure injection.
#[derive(Clone, Default)]
pub struct MemoryHostBackend(Arc<Mutex<State>>);

impl MemoryHostBackend {
    pub fn new(base_dir: impl Into<String>) -> Self {
        MemoryHostBackend(Arc::new(Mutex::new(State {
            base_dir: base_dir.into(),
            ..State::default()
        })))
    }

    pub async fn insert_file(&self, path: impl Into<String>, content: impl Into<String>) {
        self.0.lock().await.files.insert(path.into(), content.into());
    }

    pub async fn insert_dir(&self, path: impl Into<String>) {
        self.0.lock().await.dirs.insert(path.into());
    }

    /// Makes every subsequent `op` call fail until [`Self::pass`].
    pub async fn fail(&self, op: &'static str) {
        self.0.lock().await.failing.insert(op);
    }

    pub async fn pass(&self, op: &'static str) {
        self.0.lock().await.failing.remove(op);
    }

    pub async fn file(&self, path: &str) -> Option<String> {
        self.0.lock().await.files.get(path).cloned()
    }

    pub async fn has_dir(&self, path: &str) -> bool {
        self.0.lock().await.dirs.contains(path)
    }
}

#[async_trait]
impl HostBackend for MemoryHostBackend {
    async fn resolve_base_dir(&self) -> Result<String> {
        let state = self.0.lock().await;
        state.check("resolve_base_dir", "")?;
        Ok(state.base_dir.clone())
    }

    async fn list_dir(&self, dir: &str) -> Result<Vec<String>> {
        let state = self.0.lock().await;
        state.check("list_dir", dir)?;
        let mut prefix = winpath::normalize(dir);
        if !prefix.ends_with(SEP) {
            prefix.push(SEP);
        }
        let mut names: Vec<String> = state
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && !rest.contains(SEP))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    async fn write_file(&self, path: &str, data: &str) -> Result<()> {
        let mut state = self.0.lock().await;
        state.check("write_file", path)?;
        state.files.insert(path.to_string(), data.to_string());
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        let state = self.0.lock().await;
        state.check("read_file", path)?;
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::backend("read_file", path, "not found"))
    }

    async fn make_dir(&self, path: &str) -> Result<()> {
        let mut state = self.0.lock().await;
        state.check("make_dir", path)?;
        state.dirs.insert(path.to_string());
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        let mut state = self.0.lock().await;
        state.check("remove_file", path)?;
        state.files.remove(path);
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let mut state = self.0.lock().await;
        state.check("rename", from)?;
        match state.files.remove(from) {
            Some(content) => {
                state.files.insert(to.to_string(), content);
                Ok(())
            }
            None => Err(Error::backend("rename", from, "not found")),
        }
    }

    async fn copy_file(&self, from: &str, to: &str) -> Result<()> {
        let mut state = self.0.lock().await;
        state.check("copy_file", from)?;
        match state.files.get(from).cloned() {
            Some(content) => {
                state.files.insert(to.to_string(), content);
                Ok(())
            }
            None => Err(Error::backend("copy_file", from, "not found")),
        }
    }

    async fn append_file(&self, path: &str, data: &str) -> Result<()> {
        let mut state = self.0.lock().await;
        state.check("append_file", path)?;
        state
            .files
            .entry(path.to_string())
            .or_default()
            .push_str(data);
        Ok(())
    }

    async fn stat(&self, path: &str) -> Result<FileStat> {
        let state = self.0.lock().await;
        state.check("stat", path)?;
        if state.dirs.contains(path) {
            return Ok(FileStat::placeholder_dir());
        }
        match state.files.get(path) {
            Some(content) => Ok(FileStat {
                size: content.len() as u64,
                ..FileStat::placeholder_file()
            }),
            None => Err(Error::backend("stat", path, "not found")),
        }
    }
}

/// URL-keyed asset source standing in for the virtual host.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    entries: HashMap<String, String>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(url.into(), text.into());
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch_text(&self, url: &str) -> Option<String> {
        self.entries.get(url).cloned()
    }
}
