use super::{ensure_changed, fmt_date, not_found, opt_date_from_row};
use crate::errors::{AppError, AppResult};
use crate::models::filter::PlacementFilter;
use crate::models::student::Student;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};

pub fn map_row(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        birth_date: opt_date_from_row(row, "birth_date")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        family_email: row.get("family_email")?,
        notes: row.get("notes")?,
        active: row.get::<_, i64>("active")? == 1,
        center_id: row.get("center_id")?,
        classroom_id: row.get("classroom_id")?,
    })
}

/// A classroom that belongs to a center must match the student's center.
fn check_placement(conn: &Connection, s: &Student) -> AppResult<()> {
    if let Some(c) = s.center_id {
        super::centers::get(conn, c)?;
    }
    if let Some(a) = s.classroom_id {
        let room = super::classrooms::get(conn, a)?;
        if let (Some(rc), Some(sc)) = (room.center_id, s.center_id)
            && rc != sc
        {
            return Err(AppError::Validation(format!(
                "classroom '{}' does not belong to center #{sc}",
                room.name
            )));
        }
    }
    Ok(())
}

pub fn insert(conn: &Connection, s: &Student) -> AppResult<i64> {
    s.validate()?;
    check_placement(conn, s)?;
    conn.execute(
        "INSERT INTO students
            (name, surname, birth_date, address, phone, family_email, notes, active, center_id, classroom_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            s.name.trim(),
            s.surname.trim(),
            s.birth_date.as_ref().map(fmt_date),
            s.address,
            s.phone,
            s.family_email,
            s.notes,
            s.active as i64,
            s.center_id,
            s.classroom_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, s: &Student) -> AppResult<()> {
    s.validate()?;
    check_placement(conn, s)?;
    let n = conn.execute(
        "UPDATE students SET
            name = ?1, surname = ?2, birth_date = ?3, address = ?4, phone = ?5,
            family_email = ?6, notes = ?7, active = ?8, center_id = ?9, classroom_id = ?10
         WHERE id = ?11",
        params![
            s.name.trim(),
            s.surname.trim(),
            s.birth_date.as_ref().map(fmt_date),
            s.address,
            s.phone,
            s.family_email,
            s.notes,
            s.active as i64,
            s.center_id,
            s.classroom_id,
            s.id,
        ],
    )?;
    ensure_changed(n, "student", s.id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Student> {
    conn.query_row("SELECT * FROM students WHERE id = ?1", [id], map_row)
        .map_err(not_found("student", id))
}

/// Students ordered by surname, name. `search` matches name or surname.
pub fn list(
    conn: &Connection,
    filter: &PlacementFilter,
    active_only: bool,
    search: Option<&str>,
) -> AppResult<Vec<Student>> {
    let (placement, ids) = filter.sql("s");
    let mut sql = format!("SELECT s.* FROM students s WHERE 1=1{placement}");
    if active_only {
        sql.push_str(" AND s.active = 1");
    }

    let mut values: Vec<Value> = ids.into_iter().map(Value::Integer).collect();
    if let Some(q) = search.filter(|q| !q.trim().is_empty()) {
        sql.push_str(" AND (s.name LIKE ? OR s.surname LIKE ?)");
        let pattern = format!("%{}%", q.trim());
        values.push(Value::Text(pattern.clone()));
        values.push(Value::Text(pattern));
    }
    sql.push_str(" ORDER BY s.surname, s.name");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Remove the student and every row that references it, atomically.
pub fn delete_cascade(conn: &mut Connection, id: i64) -> AppResult<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM attendance WHERE student_id = ?1", [id])?;
    tx.execute("DELETE FROM permissions WHERE student_id = ?1", [id])?;
    tx.execute("DELETE FROM messages WHERE student_id = ?1", [id])?;
    let n = tx.execute("DELETE FROM students WHERE id = ?1", [id])?;
    ensure_changed(n, "student", id)?;
    tx.commit()?;
    Ok(())
}
