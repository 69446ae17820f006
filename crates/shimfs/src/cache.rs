//! The cache store: the single source of truth for every synchronous
//! existence query.
//!
//! Two tables, written-file existence and created-directory existence,
//! live for the whole process with no eviction. A present path means
//! "believed to exist on the real backend"; absence means "unknown or
//! absent". The store is a conservative oracle: false negatives are
//! allowed (a file from a previous run may be unknown until the
//! bootstrap listing discovers it), false positives only occur
//! transiently between an optimistic mark and a failed backend
//! confirmation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use winpath::SEP;

/// Explicit, constructor-injected existence store. Multiple instances
/// can coexist; nothing here touches process-wide state.
#[derive(Debug, Default)]
pub struct CacheStore {
    written_files: HashSet<String>,
    created_dirs: HashSet<String>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory keys are stored normalized and separator-terminated so
    /// `mark_dir("C:\\x")` and `dir_exists("C:\\x\\")` agree.
    fn dir_key(path: &str) -> String {
        let mut key = winpath::normalize(path);
        if !key.ends_with(SEP) {
            key.push(SEP);
        }
        key
    }

    pub fn mark_file(&mut self, path: &str) {
        self.written_files.insert(path.to_string());
    }

    /// Returns whether the path was present.
    pub fn unmark_file(&mut self, path: &str) -> bool {
        self.written_files.remove(path)
    }

    pub fn mark_dir(&mut self, path: &str) {
        self.created_dirs.insert(Self::dir_key(path));
    }

    pub fn unmark_dir(&mut self, path: &str) -> bool {
        self.created_dirs.remove(&Self::dir_key(path))
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.written_files.contains(path)
    }

    pub fn dir_exists(&self, path: &str) -> bool {
        self.created_dirs.contains(&Self::dir_key(path))
    }

    /// Directory-aware existence: a trailing separator selects the
    /// directory table, anything else the file table.
    pub fn exists(&self, path: &str) -> bool {
        if path.is_empty() {
            false
        } else if path.ends_with(SEP) || path.ends_with('/') {
            self.dir_exists(path)
        } else {
            self.file_exists(path)
        }
    }

    /// Projection of the immediate children of `dir` from the
    /// written-file table. Deeper descendants are excluded. Sorted for
    /// a stable view; can under-report files never observed by this
    /// layer.
    pub fn list_dir(&self, dir: &str) -> Vec<String> {
        let prefix = Self::dir_key(dir);
        let mut names: Vec<String> = self
            .written_files
            .iter()
            .filter_map(|path| path.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && !rest.contains(SEP))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}

/// Cheaply cloneable shared handle to a [`CacheStore`].
///
/// Guarded by a std mutex, never a tokio one: the synchronous facade
/// methods must read it without awaiting, and the guard is never held
/// across an await point.
#[derive(Clone, Debug, Default)]
pub struct CacheHandle(Arc<Mutex<CacheStore>>);

impl CacheHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, CacheStore> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
