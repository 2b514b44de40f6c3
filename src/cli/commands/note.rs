use crate::cli::parser::NoteCmd;
use crate::context::AppContext;
use crate::core::family_note;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use chrono::Local;
use std::fs;

pub fn handle(cmd: &NoteCmd, ctx: &AppContext) -> AppResult<()> {
    match cmd {
        NoteCmd::Pdf {
            subject,
            body,
            file,
            out,
        } => {
            let text = match (body, file) {
                (Some(b), _) => b.clone(),
                (None, Some(f)) => fs::read_to_string(f)?,
                (None, None) => String::new(),
            };

            let path = family_note::generate(
                &ctx.pdfs_dir(),
                out.as_deref(),
                subject,
                &text,
                Local::now().date_naive(),
            )?;

            let pool = DbPool::open(ctx)?;
            ttlog(&pool.conn, "export", "family note", &path.display().to_string())?;
            pool.close()?;

            success(format!("Family note written to {}", path.display()));
        }
    }
    Ok(())
}
