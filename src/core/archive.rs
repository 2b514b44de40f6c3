//! Manual backup archives kept in `backups/`.

use crate::context::AppContext;
use crate::core::snapshot;
use crate::crypto::{cipher, sentinel};
use crate::errors::{AppError, AppResult};
use crate::utils::path::unique_path;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ArchiveInfo {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Local>,
}

pub struct ArchiveLogic;

impl ArchiveLogic {
    /// Bare file name inside `backups/`; anything with a path is refused.
    fn resolve(ctx: &AppContext, name: &str) -> AppResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(AppError::Validation(format!("invalid archive name: {name}")));
        }
        let path = ctx.backups_dir().join(name);
        if !path.is_file() {
            return Err(AppError::Validation(format!("archive not found: {name}")));
        }
        Ok(path)
    }

    pub fn create(ctx: &AppContext) -> AppResult<PathBuf> {
        let dir = ctx.backups_dir();
        fs::create_dir_all(&dir)?;

        let name = format!(
            "{}_backup_{}.zip",
            ctx.db_stem(),
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let dest = unique_path(&dir, &name);

        if let Err(e) = snapshot::write(ctx, &dest) {
            let _ = fs::remove_file(&dest);
            return Err(e);
        }
        info!(archive = %dest.display(), "manual backup created");
        Ok(dest)
    }

    /// Archives in `backups/`, newest first.
    pub fn list(ctx: &AppContext) -> AppResult<Vec<ArchiveInfo>> {
        let dir = ctx.backups_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for entry in fs::read_dir(&dir)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }
            let meta = entry.metadata()?;
            out.push(ArchiveInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                size: meta.len(),
                modified: DateTime::<Local>::from(meta.modified()?),
            });
        }
        out.sort_by(|a, b| b.modified.cmp(&a.modified).then(b.name.cmp(&a.name)));
        Ok(out)
    }

    /// Overwrite the database and document files with the archive content.
    /// An encrypted database in the archive turns encryption on, since it
    /// cannot be opened otherwise.
    pub fn restore(ctx: &AppContext, name: &str) -> AppResult<usize> {
        let path = Self::resolve(ctx, name)?;
        let written = snapshot::restore(ctx, &path)?;

        if cipher::is_encrypted(ctx.db_path()) && !ctx.encryption_enabled() {
            sentinel::mark_enabled(ctx.data_dir())?;
        }
        info!(archive = %path.display(), files = written, "archive restored");
        Ok(written)
    }

    /// Copy an archive out. `dest` may be a directory or a file path.
    pub fn export(ctx: &AppContext, name: &str, dest: &Path) -> AppResult<PathBuf> {
        let src = Self::resolve(ctx, name)?;
        let target = if dest.is_dir() {
            dest.join(name)
        } else {
            dest.to_path_buf()
        };
        fs::copy(&src, &target)?;
        Ok(target)
    }

    /// Copy an external archive into `backups/`, adding a `_N` suffix on a
    /// name clash. The file must be a readable zip.
    pub fn import(ctx: &AppContext, file: &Path) -> AppResult<PathBuf> {
        snapshot::entries(file)?;

        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::Validation(format!("not a file: {}", file.display())))?;

        let dir = ctx.backups_dir();
        fs::create_dir_all(&dir)?;
        let dest = unique_path(&dir, &name);
        fs::copy(file, &dest)?;
        Ok(dest)
    }

    pub fn delete(ctx: &AppContext, name: &str) -> AppResult<()> {
        let path = Self::resolve(ctx, name)?;
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_with_paths_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());
        ctx.ensure_layout().unwrap();

        assert!(matches!(
            ArchiveLogic::delete(&ctx, "../schooldesk.db"),
            Err(AppError::Validation(_))
        ));
    }
}
