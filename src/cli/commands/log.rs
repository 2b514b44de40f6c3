use crate::context::AppContext;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(print: bool, limit: Option<usize>, ctx: &AppContext) -> AppResult<()> {
    if !print {
        info("Use --print to show the internal log.");
        return Ok(());
    }
    let pool = DbPool::open(ctx)?;
    LogLogic::print_log(&pool, limit)?;
    pool.close()
}
