use super::{ensure_changed, not_found};
use crate::errors::AppResult;
use crate::models::material::Material;
use rusqlite::{Connection, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Material> {
    Ok(Material {
        id: row.get("id")?,
        name: row.get("name")?,
        category: row.get("category")?,
        quantity: row.get("quantity")?,
        minimum: row.get("minimum")?,
        unit: row.get("unit")?,
        notes: row.get("notes")?,
    })
}

pub fn insert(conn: &Connection, m: &Material) -> AppResult<i64> {
    m.validate()?;
    conn.execute(
        "INSERT INTO materials (name, category, quantity, minimum, unit, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![m.name.trim(), m.category, m.quantity, m.minimum, m.unit, m.notes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, m: &Material) -> AppResult<()> {
    m.validate()?;
    let n = conn.execute(
        "UPDATE materials SET name = ?1, category = ?2, quantity = ?3, minimum = ?4, unit = ?5, notes = ?6
         WHERE id = ?7",
        params![m.name.trim(), m.category, m.quantity, m.minimum, m.unit, m.notes, m.id],
    )?;
    ensure_changed(n, "material", m.id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Material> {
    conn.query_row("SELECT * FROM materials WHERE id = ?1", [id], map_row)
        .map_err(not_found("material", id))
}

pub fn list(conn: &Connection, low_only: bool) -> AppResult<Vec<Material>> {
    let sql = if low_only {
        "SELECT * FROM materials WHERE quantity <= minimum ORDER BY name"
    } else {
        "SELECT * FROM materials ORDER BY name"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Add `delta` (may be negative) to the stock, never going below zero.
pub fn adjust_quantity(conn: &Connection, id: i64, delta: i64) -> AppResult<i64> {
    let n = conn.execute(
        "UPDATE materials SET quantity = MAX(quantity + ?1, 0) WHERE id = ?2",
        params![delta, id],
    )?;
    ensure_changed(n, "material", id)?;
    Ok(get(conn, id)?.quantity)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM materials WHERE id = ?1", [id])?;
    ensure_changed(n, "material", id)
}
