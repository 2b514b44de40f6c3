use crate::cli::parser::ReportCmd;
use crate::context::AppContext;
use crate::core::report::DailyReport;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::date::{parse_date, today};

pub fn handle(cmd: &ReportCmd, ctx: &AppContext) -> AppResult<()> {
    let ReportCmd::Daily {
        date,
        center,
        classroom,
    } = cmd;

    let date = match date {
        Some(d) => parse_date(d)?,
        None => today(),
    };

    let pool = DbPool::open(ctx)?;
    let report = DailyReport::build(&pool.conn, date, center.as_deref(), classroom.as_deref())?;
    pool.close()?;

    print!("{}", report.render());
    if report.is_empty() {
        info(format!("Nothing to report for {date}."));
    }
    Ok(())
}
