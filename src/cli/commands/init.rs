use crate::config::Config;
use crate::context::AppContext;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// Writes the configuration file when missing, creates the data layout and
/// brings the schema up to date.
pub fn handle(cfg: &Config, ctx: &AppContext) -> AppResult<()> {
    let path = Config::config_file();
    if !path.exists() {
        cfg.save()?;
    }

    println!("⚙️  Initializing schooldesk…");
    println!("📄 Config file : {}", path.display());
    println!("📁 Data dir    : {}", ctx.data_dir().display());
    println!("🗄️  Database    : {}", ctx.db_path().display());

    ctx.ensure_layout()?;

    let pool = DbPool::open(ctx)?;
    let applied = init_db(&pool)?;

    if let Err(e) = ttlog(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", ctx.db_path().display()),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }
    pool.close()?;

    if applied > 0 {
        success(format!("{applied} migration(s) applied."));
    }
    success("schooldesk initialization completed!");
    Ok(())
}
