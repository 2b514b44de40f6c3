use super::{ensure_changed, not_found};
use crate::errors::AppResult;
use crate::models::message::Message;
use rusqlite::{Connection, Row, params};

const SELECT: &str = "SELECT m.*, s.name || ' ' || s.surname AS student_name
     FROM messages m JOIN students s ON m.student_id = s.id";

pub fn map_row(row: &Row) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        subject: row.get("subject")?,
        body: row.get("body")?,
        sent_at: row.get("sent_at")?,
        read: row.get::<_, i64>("read")? == 1,
        student_name: row.get("student_name")?,
    })
}

pub fn insert(conn: &Connection, m: &Message) -> AppResult<i64> {
    m.validate()?;
    super::students::get(conn, m.student_id)?;
    conn.execute(
        "INSERT INTO messages (student_id, subject, body, sent_at, read) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![m.student_id, m.subject.trim(), m.body, m.sent_at, m.read as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Message> {
    conn.query_row(&format!("{SELECT} WHERE m.id = ?1"), [id], map_row)
        .map_err(not_found("message", id))
}

/// Newest first. `unread_only` hides messages already marked as read.
pub fn list(conn: &Connection, student_id: Option<i64>, unread_only: bool) -> AppResult<Vec<Message>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE (?1 IS NULL OR m.student_id = ?1)
                    AND (?2 = 0 OR m.read = 0)
         ORDER BY m.sent_at DESC, m.id DESC"
    ))?;
    let rows = stmt.query_map(params![student_id, unread_only as i64], map_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn mark_read(conn: &Connection, id: i64, read: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE messages SET read = ?1 WHERE id = ?2",
        params![read as i64, id],
    )?;
    ensure_changed(n, "message", id)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
    ensure_changed(n, "message", id)
}
