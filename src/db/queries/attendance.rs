use super::{date_from_row, ensure_changed, fmt_date, not_found};
use crate::errors::AppResult;
use crate::models::attendance::Attendance;
use crate::models::filter::PlacementFilter;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};

const SELECT: &str = "SELECT a.*, s.name || ' ' || s.surname AS student_name
     FROM attendance a JOIN students s ON a.student_id = s.id";

pub fn map_row(row: &Row) -> rusqlite::Result<Attendance> {
    Ok(Attendance {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        date: date_from_row(row, "date")?,
        status: row.get("status")?,
        check_in: row.get("check_in")?,
        check_out: row.get("check_out")?,
        notes: row.get("notes")?,
        student_name: row.get("student_name")?,
    })
}

/// Insert one record. Several records for the same student and day are
/// allowed.
pub fn insert(conn: &Connection, a: &Attendance) -> AppResult<i64> {
    a.validate()?;
    super::students::get(conn, a.student_id)?;
    conn.execute(
        "INSERT INTO attendance (student_id, date, status, check_in, check_out, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            a.student_id,
            a.date_str(),
            a.status,
            a.check_in,
            a.check_out,
            a.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, a: &Attendance) -> AppResult<()> {
    a.validate()?;
    let n = conn.execute(
        "UPDATE attendance SET date = ?1, status = ?2, check_in = ?3, check_out = ?4, notes = ?5
         WHERE id = ?6",
        params![a.date_str(), a.status, a.check_in, a.check_out, a.notes, a.id],
    )?;
    ensure_changed(n, "attendance record", a.id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Attendance> {
    conn.query_row(&format!("{SELECT} WHERE a.id = ?1"), [id], map_row)
        .map_err(not_found("attendance record", id))
}

pub fn list(
    conn: &Connection,
    date: Option<NaiveDate>,
    student_id: Option<i64>,
    filter: &PlacementFilter,
) -> AppResult<Vec<Attendance>> {
    let (placement, ids) = filter.sql("s");
    let mut sql = format!("{SELECT} WHERE 1=1{placement}");
    let mut values: Vec<Value> = ids.into_iter().map(Value::Integer).collect();

    if let Some(d) = date {
        sql.push_str(" AND a.date = ?");
        values.push(Value::Text(fmt_date(&d)));
    }
    if let Some(s) = student_id {
        sql.push_str(" AND a.student_id = ?");
        values.push(Value::Integer(s));
    }
    sql.push_str(" ORDER BY a.date DESC, s.surname, s.name, a.id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM attendance WHERE id = ?1", [id])?;
    ensure_changed(n, "attendance record", id)
}

/// Active students matching `filter` with no record at all on `date`.
pub fn students_without_record(
    conn: &Connection,
    date: NaiveDate,
    filter: &PlacementFilter,
) -> AppResult<Vec<i64>> {
    let (placement, ids) = filter.sql("s");
    let sql = format!(
        "SELECT s.id FROM students s
         WHERE s.active = 1{placement}
           AND s.id NOT IN (SELECT student_id FROM attendance WHERE date = ?)
         ORDER BY s.surname, s.name"
    );

    let mut values: Vec<Value> = ids.into_iter().map(Value::Integer).collect();
    values.push(Value::Text(fmt_date(&date)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |r| r.get(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Records per status on `date`, optionally restricted by center and
/// classroom name.
pub fn status_counts(
    conn: &Connection,
    date: NaiveDate,
    center_name: Option<&str>,
    classroom_name: Option<&str>,
) -> AppResult<Vec<(String, i64)>> {
    let mut sql = String::from(
        "SELECT a.status, COUNT(*)
         FROM attendance a
         JOIN students s ON a.student_id = s.id
         LEFT JOIN centers c ON s.center_id = c.id
         LEFT JOIN classrooms r ON s.classroom_id = r.id
         WHERE a.date = ?",
    );
    let mut values = vec![Value::Text(fmt_date(&date))];

    if let Some(name) = center_name {
        sql.push_str(" AND c.name = ?");
        values.push(Value::Text(name.to_string()));
    }
    if let Some(name) = classroom_name {
        sql.push_str(" AND r.name = ?");
        values.push(Value::Text(name.to_string()));
    }
    sql.push_str(" GROUP BY a.status ORDER BY a.status");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |r| {
        Ok((r.get(0)?, r.get(1)?))
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
