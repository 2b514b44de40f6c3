//! Explicit application context.
//!
//! Holds the resolved data layout, the in-memory database password and the
//! process-wide database lock. It is shared (`Arc<AppContext>`) between the
//! foreground command and the background sync worker.

use crate::config::Config;
use crate::crypto::sentinel;
use crate::errors::AppResult;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

pub const DOCUMENTS_DIR: &str = "documents";
pub const PDFS_DIR: &str = "pdfs";
pub const BACKUPS_DIR: &str = "backups";
pub const DB_BACKUPS_DIR: &str = "db_backups";

#[derive(Debug)]
pub struct AppContext {
    data_dir: PathBuf,
    db_path: PathBuf,
    password: RwLock<Option<Zeroizing<String>>>,
    db_lock: Mutex<()>,
}

impl AppContext {
    pub fn new(data_dir: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_path: db_path.into(),
            password: RwLock::new(None),
            db_lock: Mutex::new(()),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.data_dir_path(), cfg.database_path())
    }

    /// Context rooted at `data_dir` with the default database file name.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let db_path = data_dir.join(crate::config::DB_FILE_NAME);
        Self::new(data_dir, db_path)
    }

    /// Create the data directory and its fixed sub-directories.
    pub fn ensure_layout(&self) -> AppResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        for sub in [DOCUMENTS_DIR, PDFS_DIR, BACKUPS_DIR, DB_BACKUPS_DIR] {
            fs::create_dir_all(self.data_dir.join(sub))?;
        }
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join(DOCUMENTS_DIR)
    }

    pub fn pdfs_dir(&self) -> PathBuf {
        self.data_dir.join(PDFS_DIR)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join(BACKUPS_DIR)
    }

    pub fn db_backups_dir(&self) -> PathBuf {
        self.data_dir.join(DB_BACKUPS_DIR)
    }

    /// File stem of the database ("schooldesk" for "schooldesk.db").
    pub fn db_stem(&self) -> String {
        self.db_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "database".to_string())
    }

    pub fn encryption_enabled(&self) -> bool {
        sentinel::is_enabled(&self.data_dir)
    }

    pub fn set_password(&self, password: &str) {
        *self.password.write() = Some(Zeroizing::new(password.to_string()));
    }

    pub fn clear_password(&self) {
        *self.password.write() = None;
    }

    pub fn password(&self) -> Option<Zeroizing<String>> {
        self.password.read().clone()
    }

    pub fn has_password(&self) -> bool {
        self.password.read().is_some()
    }

    /// Serialize every access to the database file. Sessions do not nest.
    pub fn lock_db(&self) -> MutexGuard<'_, ()> {
        self.db_lock.lock()
    }
}
