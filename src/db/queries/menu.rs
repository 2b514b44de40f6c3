use super::{date_from_row, ensure_changed, fmt_date, not_found};
use crate::errors::AppResult;
use crate::models::menu::{MenuItem, meal_rank};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: row.get("id")?,
        date: date_from_row(row, "date")?,
        meal_type: row.get("meal_type")?,
        dish: row.get("dish")?,
        description: row.get("description")?,
        allergens: row.get("allergens")?,
    })
}

pub fn insert(conn: &Connection, m: &MenuItem) -> AppResult<i64> {
    m.validate()?;
    conn.execute(
        "INSERT INTO menu_items (date, meal_type, dish, description, allergens)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![fmt_date(&m.date), m.meal_type, m.dish, m.description, m.allergens],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, m: &MenuItem) -> AppResult<()> {
    m.validate()?;
    let n = conn.execute(
        "UPDATE menu_items SET date = ?1, meal_type = ?2, dish = ?3, description = ?4, allergens = ?5
         WHERE id = ?6",
        params![fmt_date(&m.date), m.meal_type, m.dish, m.description, m.allergens, m.id],
    )?;
    ensure_changed(n, "menu item", m.id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<MenuItem> {
    conn.query_row("SELECT * FROM menu_items WHERE id = ?1", [id], map_row)
        .map_err(not_found("menu item", id))
}

/// Items between `from` and `to` inclusive, by date then meal order.
pub fn list_range(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<MenuItem>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM menu_items WHERE date BETWEEN ?1 AND ?2 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![fmt_date(&from), fmt_date(&to)], map_row)?;
    let mut items = rows.collect::<Result<Vec<_>, _>>()?;
    items.sort_by_key(|m| (m.date, meal_rank(&m.meal_type)));
    Ok(items)
}

pub fn list_for_day(conn: &Connection, date: NaiveDate) -> AppResult<Vec<MenuItem>> {
    list_range(conn, date, date)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM menu_items WHERE id = ?1", [id])?;
    ensure_changed(n, "menu item", id)
}
