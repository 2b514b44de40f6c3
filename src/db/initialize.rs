use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Bring the schema up to date inside the given session.
/// All table creation goes through the migration runner.
pub fn init_db(pool: &DbPool) -> AppResult<usize> {
    run_pending_migrations(&pool.conn)
}
