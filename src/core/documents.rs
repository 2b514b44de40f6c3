//! Document store: plain files copied into `documents/`.

use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["docx", "xlsx", "pptx", "doc", "xls", "ppt", "pdf"];

#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub name: String,
    pub kind: &'static str,
    pub size: u64,
    pub modified: DateTime<Local>,
}

impl DocumentInfo {
    pub fn size_label(&self) -> String {
        human_size(self.size)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

pub fn kind_label(ext: &str) -> &'static str {
    match ext {
        "docx" | "doc" => "Word",
        "xlsx" | "xls" => "Excel",
        "pptx" | "ppt" => "PowerPoint",
        "pdf" => "PDF",
        _ => "Other",
    }
}

pub fn human_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{kb:.1} KB")
    } else {
        format!("{:.1} MB", kb / 1024.0)
    }
}

/// Supported documents directly under `documents/`, by name.
pub fn list(ctx: &AppContext) -> AppResult<Vec<DocumentInfo>> {
    let dir = ctx.documents_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for entry in fs::read_dir(&dir)?.flatten() {
        let path = entry.path();
        let Some(ext) = extension(&path) else {
            continue;
        };
        if !path.is_file() || !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }
        let meta = entry.metadata()?;
        out.push(DocumentInfo {
            name: entry.file_name().to_string_lossy().to_string(),
            kind: kind_label(&ext),
            size: meta.len(),
            modified: DateTime::<Local>::from(meta.modified()?),
        });
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

pub fn target_for(ctx: &AppContext, source: &Path) -> AppResult<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| AppError::Validation(format!("not a file: {}", source.display())))?;
    Ok(ctx.documents_dir().join(name))
}

/// Copy `source` into the store under its own name. An existing document
/// with that name is only replaced when `overwrite` is set.
pub fn import(ctx: &AppContext, source: &Path, overwrite: bool) -> AppResult<PathBuf> {
    if !source.is_file() {
        return Err(AppError::Validation(format!(
            "file not found: {}",
            source.display()
        )));
    }

    let supported = extension(source).is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()));
    if !supported {
        return Err(AppError::Validation(format!(
            "unsupported document type: {} (allowed: {})",
            source.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let dest = target_for(ctx, source)?;
    if dest.exists() && !overwrite {
        return Err(AppError::Validation(format!(
            "document already exists: {}",
            dest.display()
        )));
    }

    fs::create_dir_all(ctx.documents_dir())?;
    fs::copy(source, &dest)?;
    Ok(dest)
}

pub fn delete(ctx: &AppContext, name: &str) -> AppResult<()> {
    if name.contains(['/', '\\']) {
        return Err(AppError::Validation(format!("invalid document name: {name}")));
    }
    let path = ctx.documents_dir().join(name);
    if !path.is_file() {
        return Err(AppError::Validation(format!("document not found: {name}")));
    }
    fs::remove_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_supported_files_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());
        ctx.ensure_layout().unwrap();
        fs::write(ctx.documents_dir().join("plan.docx"), b"x").unwrap();
        fs::write(ctx.documents_dir().join("notes.txt"), b"x").unwrap();

        let docs = list(&ctx).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].kind, "Word");
    }

    #[test]
    fn sizes_switch_to_megabytes() {
        assert_eq!(human_size(512), "0.5 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
