//! Startup backup of the database file and age-based rotation.

use crate::context::AppContext;
use crate::errors::AppResult;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Backups at least this old are deleted.
pub const RETENTION: Duration = Duration::from_secs(3 * 24 * 60 * 60);

pub fn backup_file_name(stem: &str, at: DateTime<Local>) -> String {
    format!("{stem}_backup_{}.db", at.format("%Y%m%d_%H%M%S"))
}

fn is_rotated_backup(name: &str, stem: &str) -> bool {
    name.starts_with(&format!("{stem}_backup_")) && name.ends_with(".db")
}

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file as it sits at rest into `db_backups/`, then
    /// rotate. Returns the new backup, or `None` when there is no database
    /// yet.
    pub fn startup_backup(ctx: &AppContext) -> AppResult<Option<PathBuf>> {
        let _guard = ctx.lock_db();

        let src = ctx.db_path();
        if !src.exists() {
            return Ok(None);
        }

        let dir = ctx.db_backups_dir();
        fs::create_dir_all(&dir)?;

        let dest = dir.join(backup_file_name(&ctx.db_stem(), Local::now()));
        fs::copy(src, &dest)?;
        debug!(backup = %dest.display(), "startup backup written");

        Self::cleanup_old_backups(&dir, &ctx.db_stem(), SystemTime::now());
        Ok(Some(dest))
    }

    /// Delete every `<stem>_backup_*.db` in `dir` whose modification time is
    /// at least [`RETENTION`] before `now`. Per-file failures are logged and
    /// skipped. Returns the deleted paths.
    pub fn cleanup_old_backups(dir: &Path, stem: &str, now: SystemTime) -> Vec<PathBuf> {
        let mut removed = Vec::new();

        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot scan backup directory");
                return removed;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_rotated_backup(&name, stem) {
                continue;
            }

            let path = entry.path();
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(m) => m,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "cannot read backup mtime");
                    continue;
                }
            };

            // A future mtime counts as age zero.
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age < RETENTION {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %path.display(), "expired backup removed");
                    removed.push(path);
                }
                Err(e) => warn!(file = %path.display(), error = %e, "cannot remove backup"),
            }
        }

        removed
    }

    /// Rotated backups, newest first.
    pub fn list_rotated(ctx: &AppContext) -> AppResult<Vec<PathBuf>> {
        let dir = ctx.db_backups_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let stem = ctx.db_stem();
        let mut out: Vec<PathBuf> = fs::read_dir(&dir)?
            .flatten()
            .filter(|e| is_rotated_backup(&e.file_name().to_string_lossy(), &stem))
            .map(|e| e.path())
            .collect();
        out.sort();
        out.reverse();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn backup_names_carry_the_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            backup_file_name("schooldesk", at),
            "schooldesk_backup_20240506_070809.db"
        );
    }

    #[test]
    fn unrelated_files_are_ignored() {
        assert!(is_rotated_backup("schooldesk_backup_20240101_000000.db", "schooldesk"));
        assert!(!is_rotated_backup("other_backup_20240101_000000.db", "schooldesk"));
        assert!(!is_rotated_backup("schooldesk_backup_20240101_000000.zip", "schooldesk"));
    }
}
