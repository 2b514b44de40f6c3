use super::{ensure_changed, not_found};
use crate::errors::AppResult;
use crate::models::center::Center;
use rusqlite::{Connection, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Center> {
    Ok(Center {
        id: row.get("id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        notes: row.get("notes")?,
    })
}

pub fn insert(conn: &Connection, c: &Center) -> AppResult<i64> {
    c.validate()?;
    conn.execute(
        "INSERT INTO centers (name, address, phone, email, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![c.name.trim(), c.address, c.phone, c.email, c.notes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, c: &Center) -> AppResult<()> {
    c.validate()?;
    let n = conn.execute(
        "UPDATE centers SET name = ?1, address = ?2, phone = ?3, email = ?4, notes = ?5 WHERE id = ?6",
        params![c.name.trim(), c.address, c.phone, c.email, c.notes, c.id],
    )?;
    ensure_changed(n, "center", c.id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Center> {
    conn.query_row("SELECT * FROM centers WHERE id = ?1", [id], map_row)
        .map_err(not_found("center", id))
}

pub fn list(conn: &Connection) -> AppResult<Vec<Center>> {
    let mut stmt = conn.prepare("SELECT * FROM centers ORDER BY name")?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn count_classrooms(conn: &Connection, id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM classrooms WHERE center_id = ?1",
        [id],
        |r| r.get(0),
    )?)
}

pub fn count_students(conn: &Connection, id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM students WHERE center_id = ?1",
        [id],
        |r| r.get(0),
    )?)
}

/// Unguarded delete; callers go through `core::del`.
pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM centers WHERE id = ?1", [id])?;
    ensure_changed(n, "center", id)
}
