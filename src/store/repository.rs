//! Load/save seam for the attendance document.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use super::AttendanceStore;
use crate::error::{AppError, Result};

/// Persistence for the whole attendance document.
///
/// The store never persists itself; callers save after each mutation they
/// want kept.
pub trait Repository {
    /// Read the full document. A missing backing file is an empty store.
    fn load(&mut self) -> Result<AttendanceStore>;

    /// Replace the persisted document.
    fn save(&mut self, store: &AttendanceStore) -> Result<()>;

    /// Short description for logs and the status bar.
    fn describe(&self) -> String;
}

/// Pretty-printed JSON file, guarded by an exclusive lock file while open.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    // Held for the lifetime of the repository; dropping it releases the lock.
    lock: Option<File>,
}

impl JsonFileRepository {
    /// Open the repository at `path`, taking the single-writer lock if `lock` is set.
    pub fn open(path: impl Into<PathBuf>, lock: bool) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::storage(format!("cannot create {}: {e}", parent.display())))?;
        }

        let lock = if lock { Some(Self::acquire_lock(&path)?) } else { None };

        info!("Data file: {}", path.display());
        Ok(Self { path, lock })
    }

    /// Path of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this repository holds the single-writer lock.
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".lock");
        path.with_file_name(name)
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_path = Self::lock_path(path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| AppError::storage(format!("cannot open lock file {}: {e}", lock_path.display())))?;

        file.try_lock_exclusive().map_err(|_| {
            warn!("Data file is locked: {}", lock_path.display());
            AppError::storage(format!("{} is locked by another session", path.display()))
        })?;

        Ok(file)
    }
}

impl Repository for JsonFileRepository {
    fn load(&mut self) -> Result<AttendanceStore> {
        if !self.path.exists() {
            info!("No data file yet, starting with an empty store");
            return Ok(AttendanceStore::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::storage(format!("cannot read {}: {e}", self.path.display())))?;
        if content.trim().is_empty() {
            return Ok(AttendanceStore::new());
        }

        let store: AttendanceStore = serde_json::from_str(&content)
            .map_err(|e| AppError::storage(format!("cannot parse {}: {e}", self.path.display())))?;

        let summary = store.summary();
        info!(
            "Loaded {} teachers, {} students, {} subjects, {} marks",
            summary.teachers, summary.students, summary.subjects, summary.marks
        );
        Ok(store)
    }

    fn save(&mut self, store: &AttendanceStore) -> Result<()> {
        let content = serde_json::to_string_pretty(store)
            .map_err(|e| AppError::storage(format!("cannot serialize store: {e}")))?;

        // Write next to the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| AppError::storage(format!("cannot write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| AppError::storage(format!("cannot replace {}: {e}", self.path.display())))?;

        debug!("Saved {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// Repository kept entirely in memory. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    store: Option<AttendanceStore>,
    saves: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document.
    pub fn with_store(store: AttendanceStore) -> Self {
        Self {
            store: Some(store),
            saves: 0,
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Repository for MemoryRepository {
    fn load(&mut self) -> Result<AttendanceStore> {
        Ok(self.store.clone().unwrap_or_default())
    }

    fn save(&mut self, store: &AttendanceStore) -> Result<()> {
        self.store = Some(store.clone());
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
