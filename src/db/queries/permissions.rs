use super::{ensure_changed, fmt_date, not_found, opt_date_from_row};
use crate::errors::{AppError, AppResult};
use crate::models::permission::{Permission, PermissionResponse};
use rusqlite::{Connection, Row, params};

const SELECT: &str = "SELECT p.*, s.name || ' ' || s.surname AS student_name
     FROM permissions p JOIN students s ON p.student_id = s.id";

pub fn map_row(row: &Row) -> rusqlite::Result<Permission> {
    let raw: String = row.get("response")?;
    let response = PermissionResponse::from_db_str(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Validation(format!("invalid response: {raw}"))),
        )
    })?;

    Ok(Permission {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        kind: row.get("kind")?,
        response,
        date: opt_date_from_row(row, "date")?,
        notes: row.get("notes")?,
        student_name: row.get("student_name")?,
    })
}

pub fn insert(conn: &Connection, p: &Permission) -> AppResult<i64> {
    p.validate()?;
    super::students::get(conn, p.student_id)?;
    conn.execute(
        "INSERT INTO permissions (student_id, kind, response, date, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            p.student_id,
            p.kind.trim(),
            p.response.to_db_str(),
            p.date.as_ref().map(fmt_date),
            p.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_response(conn: &Connection, id: i64, response: PermissionResponse) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE permissions SET response = ?1 WHERE id = ?2",
        params![response.to_db_str(), id],
    )?;
    ensure_changed(n, "permission", id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Permission> {
    conn.query_row(&format!("{SELECT} WHERE p.id = ?1"), [id], map_row)
        .map_err(not_found("permission", id))
}

pub fn list(
    conn: &Connection,
    student_id: Option<i64>,
    response: Option<PermissionResponse>,
) -> AppResult<Vec<Permission>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE (?1 IS NULL OR p.student_id = ?1)
                    AND (?2 IS NULL OR p.response = ?2)
         ORDER BY p.date DESC, p.id DESC"
    ))?;
    let rows = stmt.query_map(
        params![student_id, response.map(|r| r.to_db_str())],
        map_row,
    )?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM permissions WHERE id = ?1", [id])?;
    ensure_changed(n, "permission", id)
}
