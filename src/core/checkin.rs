use crate::db::log::ttlog;
use crate::db::queries::attendance;
use crate::errors::AppResult;
use crate::models::attendance::{Attendance, STATUS_PRESENT};
use crate::models::filter::PlacementFilter;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Mark every active student matching `filter` that has no record on `date`
/// as present, all with the same check-in time. Returns the number of rows
/// inserted; running it again for the same day inserts nothing.
pub fn quick_checkin(
    conn: &mut Connection,
    date: NaiveDate,
    filter: &PlacementFilter,
    time: &str,
) -> AppResult<usize> {
    let tx = conn.transaction()?;
    let pending = attendance::students_without_record(&tx, date, filter)?;

    for student_id in &pending {
        let mut rec = Attendance::new(*student_id, date, STATUS_PRESENT);
        rec.check_in = Some(time.to_string());
        attendance::insert(&tx, &rec)?;
    }

    if !pending.is_empty() {
        ttlog(
            &tx,
            "checkin",
            &date.format("%Y-%m-%d").to_string(),
            &format!("{} student(s) marked present at {time}", pending.len()),
        )?;
    }
    tx.commit()?;
    Ok(pending.len())
}
