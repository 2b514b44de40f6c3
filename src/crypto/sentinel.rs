//! Marker file whose presence means "encryption enabled" for a data dir.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

pub const SENTINEL_FILE: &str = ".encryption_enabled";

pub fn sentinel_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SENTINEL_FILE)
}

pub fn is_enabled(data_dir: &Path) -> bool {
    sentinel_path(data_dir).exists()
}

/// Touch the marker. Idempotent.
pub fn mark_enabled(data_dir: &Path) -> io::Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(sentinel_path(data_dir))?;
    Ok(())
}

pub fn mark_disabled(data_dir: &Path) -> io::Result<()> {
    match fs::remove_file(sentinel_path(data_dir)) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
