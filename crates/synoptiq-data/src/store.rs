//! File store access.
//!
//! `FloorPlanData` never touches the network or the filesystem directly; it
//! goes through a `FileStore`. Two stores ship with the crate: a directory
//! on the local filesystem and an in-memory store.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use synoptiq_core::DataError;

/// Fetches and saves JSON resources on behalf of the data model
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Fetch and parse the JSON resource at `path`
    async fn fetch_json(&self, path: &str, token: &str) -> Result<Value, DataError>;

    /// Save `data` as `<relative_path>/<file_name>.json` under an exercise
    async fn save_json(
        &self,
        exercise_id: &str,
        relative_path: &str,
        file_name: &str,
        token: &str,
        data: &Value,
    ) -> Result<(), DataError>;
}

fn save_error(relative_path: &str, file_name: &str, reason: impl std::fmt::Display) -> DataError {
    DataError::Save {
        relative_path: relative_path.to_string(),
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    }
}

/// Store rooted at a local directory
///
/// Fetch paths are resolved relative to the root. Saves are written to
/// `<root>/<exercise_id>/<relative_path>/<file_name>.json`. Tokens are
/// accepted but not checked.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location a save with these arguments is written to
    pub fn save_path(&self, exercise_id: &str, relative_path: &str, file_name: &str) -> PathBuf {
        self.root
            .join(exercise_id)
            .join(relative_path)
            .join(format!("{}.json", file_name))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn fetch_json(&self, path: &str, _token: &str) -> Result<Value, DataError> {
        let full = self.resolve(path);
        let bytes = tokio::fs::read(&full)
            .await
            .map_err(|e| DataError::fetch(path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| DataError::Decode {
            resource: path.to_string(),
            source,
        })
    }

    async fn save_json(
        &self,
        exercise_id: &str,
        relative_path: &str,
        file_name: &str,
        _token: &str,
        data: &Value,
    ) -> Result<(), DataError> {
        let target = self.save_path(exercise_id, relative_path, file_name);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| save_error(relative_path, file_name, e))?;
        }

        let body = serde_json::to_vec_pretty(data)
            .map_err(|e| save_error(relative_path, file_name, e))?;
        tokio::fs::write(&target, body)
            .await
            .map_err(|e| save_error(relative_path, file_name, e))?;

        tracing::debug!("Saved {}", target.display());
        Ok(())
    }
}

/// One recorded call to [`MemoryFileStore::save_json`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub exercise_id: String,
    pub relative_path: String,
    pub file_name: String,
    pub data: Value,
}

/// In-memory store with failure injection
///
/// Saved files become fetchable under
/// `<exercise_id>/<relative_path>/<file_name>.json`.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<String, Value>>,
    saves: Mutex<Vec<SavedFile>>,
    failing_paths: RwLock<HashSet<String>>,
    fail_saves: AtomicBool,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryFileStore::insert`]
    pub fn with_file(self, path: impl Into<String>, value: Value) -> Self {
        self.insert(path, value);
        self
    }

    pub fn insert(&self, path: impl Into<String>, value: Value) {
        self.files.write().insert(path.into(), value);
    }

    /// Make every later fetch of `path` fail
    pub fn fail_fetch(&self, path: impl Into<String>) {
        self.failing_paths.write().insert(path.into());
    }

    /// Make every later save fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Every successful save, oldest first
    pub fn saves(&self) -> Vec<SavedFile> {
        self.saves.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }

    pub fn last_save(&self) -> Option<SavedFile> {
        self.saves.lock().last().cloned()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn fetch_json(&self, path: &str, _token: &str) -> Result<Value, DataError> {
        if self.failing_paths.read().contains(path) {
            return Err(DataError::fetch(path, "injected failure"));
        }
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| DataError::fetch(path, "not found"))
    }

    async fn save_json(
        &self,
        exercise_id: &str,
        relative_path: &str,
        file_name: &str,
        _token: &str,
        data: &Value,
    ) -> Result<(), DataError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(save_error(relative_path, file_name, "injected failure"));
        }

        let key = format!("{}/{}/{}.json", exercise_id, relative_path, file_name);
        self.files.write().insert(key, data.clone());
        self.saves.lock().push(SavedFile {
            exercise_id: exercise_id.to_string(),
            relative_path: relative_path.to_string(),
            file_name: file_name.to_string(),
            data: data.clone(),
        });
        Ok(())
    }
}
