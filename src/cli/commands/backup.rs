use super::confirmed;
use crate::cli::parser::BackupCmd;
use crate::context::AppContext;
use crate::core::archive::ArchiveLogic;
use crate::core::backup::BackupLogic;
use crate::core::documents::human_size;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;
use std::fs;

/// Log rows go in after the archive work so they never end up inside a
/// snapshot being restored over.
fn record(ctx: &AppContext, operation: &str, target: &str, message: &str) {
    let result = DbPool::open(ctx).and_then(|pool| {
        ttlog(&pool.conn, operation, target, message)?;
        pool.close()
    });
    if let Err(e) = result {
        warning(format!("Failed to write internal log: {e}"));
    }
}

pub fn handle(cmd: &BackupCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    match cmd {
        BackupCmd::Create => {
            let path = ArchiveLogic::create(ctx)?;
            record(ctx, "backup", "create", &path.display().to_string());
            success(format!("Backup created: {}", path.display()));
        }

        BackupCmd::List => {
            let list = ArchiveLogic::list(ctx)?;
            if list.is_empty() {
                info("No backups found.");
                return Ok(());
            }
            let mut table = Table::new(["Name", "Size", "Date"]);
            for a in &list {
                table.add_row(vec![
                    a.name.clone(),
                    human_size(a.size),
                    a.modified.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        BackupCmd::Restore { name } => {
            let prompt = format!(
                "Restoring '{name}' overwrites the current database and documents. Continue?"
            );
            if !confirmed(yes, &prompt) {
                return Ok(());
            }
            let n = ArchiveLogic::restore(ctx, name)?;
            record(ctx, "restore", name, &format!("{n} file(s) restored"));
            success(format!("{n} file(s) restored from '{name}'."));
        }

        BackupCmd::Export { name, dest } => {
            let target = ArchiveLogic::export(ctx, name, &expand_tilde(dest))?;
            success(format!("Backup copied to {}", target.display()));
        }

        BackupCmd::Import { file } => {
            let dest = ArchiveLogic::import(ctx, &expand_tilde(file))?;
            record(ctx, "backup", "import", &dest.display().to_string());
            success(format!("Backup imported as {}", dest.display()));
        }

        BackupCmd::Delete { name } => {
            if !confirmed(yes, &format!("Delete backup '{name}'?")) {
                return Ok(());
            }
            ArchiveLogic::delete(ctx, name)?;
            record(ctx, "del", "backup", name);
            success(format!("Backup '{name}' deleted."));
        }

        BackupCmd::Rotated => {
            let list = BackupLogic::list_rotated(ctx)?;
            if list.is_empty() {
                info("No startup backups yet.");
                return Ok(());
            }
            let mut table = Table::new(["File", "Size"]);
            for p in &list {
                let size = fs::metadata(p).map(|m| m.len()).unwrap_or(0);
                table.add_row(vec![
                    p.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    human_size(size),
                ]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
