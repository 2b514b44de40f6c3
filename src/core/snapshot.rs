//! Zip snapshot of the data directory: the database file at the archive
//! root plus everything under `documents/` and `pdfs/`.
//!
//! Used for manual archives and as the sync payload.

use crate::context::{AppContext, DOCUMENTS_DIR, PDFS_DIR};
use crate::errors::{AppError, AppResult};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn options() -> FileOptions<'static, ()> {
    FileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Archive name for `path` relative to `base`, always with `/`.
fn entry_name(base: &Path, path: &Path) -> AppResult<String> {
    let rel = path
        .strip_prefix(base)
        .map_err(|_| AppError::Other(format!("{} is outside {}", path.display(), base.display())))?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Ok(parts.join("/"))
}

/// Write the snapshot to `dest`. Holds the database lock while reading.
/// Returns the number of entries.
pub fn write(ctx: &AppContext, dest: &Path) -> AppResult<usize> {
    let _guard = ctx.lock_db();
    write_to(ctx, File::create(dest)?)
}

fn write_to<W: Write + io::Seek>(ctx: &AppContext, out: W) -> AppResult<usize> {
    let mut zip = ZipWriter::new(out);
    let mut count = 0;

    let db = ctx.db_path();
    if db.exists() {
        let name = db
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| crate::config::DB_FILE_NAME.to_string());
        zip.start_file(name, options())?;
        io::copy(&mut File::open(db)?, &mut zip)?;
        count += 1;
    }

    for sub in [DOCUMENTS_DIR, PDFS_DIR] {
        let root = ctx.data_dir().join(sub);
        if !root.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            zip.start_file(entry_name(ctx.data_dir(), entry.path())?, options())?;
            io::copy(&mut File::open(entry.path())?, &mut zip)?;
            count += 1;
        }
    }

    zip.finish()?;
    Ok(count)
}

/// Entry names of a snapshot on disk.
pub fn entries(path: &Path) -> AppResult<Vec<String>> {
    entries_of(File::open(path)?)
}

pub fn entries_of<R: io::Read + io::Seek>(reader: R) -> AppResult<Vec<String>> {
    let archive = ZipArchive::new(reader)?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Where a snapshot entry is restored to, or `None` for entries that do not
/// belong to the layout (and are skipped).
fn restore_target(ctx: &AppContext, name: &Path) -> Option<PathBuf> {
    if name.components().any(|c| !matches!(c, Component::Normal(_))) {
        return None;
    }

    let db_name = ctx.db_path().file_name()?;
    if name.as_os_str() == db_name {
        return Some(ctx.db_path().to_path_buf());
    }

    let first = name.components().next()?.as_os_str();
    if first == DOCUMENTS_DIR || first == PDFS_DIR {
        return Some(ctx.data_dir().join(name));
    }
    None
}

/// Extract a snapshot over the data directory. Holds the database lock.
/// Returns the number of files written.
pub fn restore(ctx: &AppContext, archive_path: &Path) -> AppResult<usize> {
    let _guard = ctx.lock_db();
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let Some(name) = file.enclosed_name() else {
            continue;
        };
        let Some(target) = restore_target(ctx, &name) else {
            continue;
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut file, &mut out)?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_use_forward_slashes() {
        let base = Path::new("/data");
        let p = base.join("documents").join("sub").join("a.pdf");
        assert_eq!(entry_name(base, &p).unwrap(), "documents/sub/a.pdf");
    }

    #[test]
    fn unknown_entries_are_not_restored() {
        let ctx = AppContext::in_dir("/data");
        assert!(restore_target(&ctx, Path::new("schooldesk.db")).is_some());
        assert!(restore_target(&ctx, Path::new("pdfs/x.pdf")).is_some());
        assert!(restore_target(&ctx, Path::new("etc/passwd")).is_none());
        assert!(restore_target(&ctx, Path::new("../schooldesk.db")).is_none());
    }
}
