use super::{ensure_changed, not_found};
use crate::errors::AppResult;
use crate::models::classroom::Classroom;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SELECT: &str = "SELECT a.*, c.name AS center_name
     FROM classrooms a LEFT JOIN centers c ON a.center_id = c.id";

pub fn map_row(row: &Row) -> rusqlite::Result<Classroom> {
    Ok(Classroom {
        id: row.get("id")?,
        name: row.get("name")?,
        center_id: row.get("center_id")?,
        capacity: row.get("capacity")?,
        notes: row.get("notes")?,
        center_name: row.get("center_name")?,
    })
}

pub fn insert(conn: &Connection, a: &Classroom) -> AppResult<i64> {
    a.validate()?;
    if let Some(c) = a.center_id {
        super::centers::get(conn, c)?;
    }
    conn.execute(
        "INSERT INTO classrooms (name, center_id, capacity, notes) VALUES (?1, ?2, ?3, ?4)",
        params![a.name.trim(), a.center_id, a.capacity, a.notes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, a: &Classroom) -> AppResult<()> {
    a.validate()?;
    if let Some(c) = a.center_id {
        super::centers::get(conn, c)?;
    }
    let n = conn.execute(
        "UPDATE classrooms SET name = ?1, center_id = ?2, capacity = ?3, notes = ?4 WHERE id = ?5",
        params![a.name.trim(), a.center_id, a.capacity, a.notes, a.id],
    )?;
    ensure_changed(n, "classroom", a.id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Classroom> {
    conn.query_row(&format!("{SELECT} WHERE a.id = ?1"), [id], map_row)
        .map_err(not_found("classroom", id))
}

pub fn list(conn: &Connection, center_id: Option<i64>) -> AppResult<Vec<Classroom>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE (?1 IS NULL OR a.center_id = ?1) ORDER BY a.name"
    ))?;
    let rows = stmt.query_map([center_id], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn center_of(conn: &Connection, id: i64) -> AppResult<Option<i64>> {
    let c: Option<Option<i64>> = conn
        .query_row("SELECT center_id FROM classrooms WHERE id = ?1", [id], |r| r.get(0))
        .optional()?;
    Ok(c.flatten())
}

pub fn count_students(conn: &Connection, id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM students WHERE classroom_id = ?1",
        [id],
        |r| r.get(0),
    )?)
}

/// Unguarded delete; callers go through `core::del`.
pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM classrooms WHERE id = ?1", [id])?;
    ensure_changed(n, "classroom", id)
}
