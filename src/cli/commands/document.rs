use super::confirmed;
use crate::cli::parser::DocumentCmd;
use crate::context::AppContext;
use crate::core::documents;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;

fn record(ctx: &AppContext, operation: &str, name: &str) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;
    ttlog(&pool.conn, operation, "document", name)?;
    pool.close()
}

pub fn handle(cmd: &DocumentCmd, ctx: &AppContext, yes: bool) -> AppResult<()> {
    match cmd {
        DocumentCmd::Import { file, overwrite } => {
            let source = expand_tilde(file);
            let mut replace = *overwrite;
            if !replace && documents::target_for(ctx, &source)?.exists() {
                replace = confirmed(yes, "A document with this name already exists. Replace it?");
                if !replace {
                    return Ok(());
                }
            }
            let dest = documents::import(ctx, &source, replace)?;
            record(ctx, "import", &dest.display().to_string())?;
            success(format!("Document stored as {}", dest.display()));
        }

        DocumentCmd::List => {
            let docs = documents::list(ctx)?;
            if docs.is_empty() {
                info("No documents stored.");
                return Ok(());
            }
            let mut table = Table::new(["Name", "Type", "Size", "Modified"]);
            for d in &docs {
                table.add_row(vec![
                    d.name.clone(),
                    d.kind.to_string(),
                    d.size_label(),
                    d.modified.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        DocumentCmd::Delete { name } => {
            if !confirmed(yes, &format!("Delete document '{name}'?")) {
                return Ok(());
            }
            documents::delete(ctx, name)?;
            record(ctx, "del", name)?;
            success(format!("Document '{name}' deleted."));
        }
    }
    Ok(())
}
