use crate::context::AppContext;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub struct DbFlags {
    pub migrate: bool,
    pub check: bool,
    pub vacuum: bool,
    pub info: bool,
}

pub fn handle(flags: &DbFlags, ctx: &AppContext) -> AppResult<()> {
    let pool = DbPool::open(ctx)?;

    if flags.migrate {
        println!("{CYAN}▶ Running migrations…{RESET}");
        let n = run_pending_migrations(&pool.conn)?;
        println!("{GREEN}✔ Migration completed ({n} applied).{RESET}\n");
    }

    if flags.info {
        stats::print_db_info(&pool)?;
    }

    if flags.check {
        println!("{CYAN}▶ Running integrity check…{RESET}");
        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            println!("{GREEN}✔ Integrity check passed.{RESET}\n");
        } else {
            println!("{RED}✘ Integrity check failed:{RESET} {integrity}\n");
        }
    }

    if flags.vacuum {
        println!("{CYAN}▶ Running VACUUM…{RESET}");
        pool.conn.execute_batch("VACUUM;")?;
        println!("{GREEN}✔ Vacuum completed.{RESET}\n");
    }

    pool.close()
}
