//! Guarded deletes. A blocked delete removes nothing.

use crate::db::log::ttlog;
use crate::db::queries::{centers, classrooms, students};
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

pub struct DeleteLogic;

impl DeleteLogic {
    /// Refused while classrooms or students reference the center.
    pub fn center(conn: &Connection, id: i64) -> AppResult<()> {
        let center = centers::get(conn, id)?;

        let rooms = centers::count_classrooms(conn, id)?;
        if rooms > 0 {
            return Err(AppError::DeleteBlocked {
                entity: "center",
                name: center.name,
                reason: format!("{rooms} classroom(s) still belong to it"),
            });
        }

        let pupils = centers::count_students(conn, id)?;
        if pupils > 0 {
            return Err(AppError::DeleteBlocked {
                entity: "center",
                name: center.name,
                reason: format!("{pupils} student(s) are still assigned to it"),
            });
        }

        centers::delete(conn, id)?;
        ttlog(conn, "del", &format!("center #{id}"), &center.name)?;
        Ok(())
    }

    /// Refused while students reference the classroom.
    pub fn classroom(conn: &Connection, id: i64) -> AppResult<()> {
        let room = classrooms::get(conn, id)?;

        let pupils = classrooms::count_students(conn, id)?;
        if pupils > 0 {
            return Err(AppError::DeleteBlocked {
                entity: "classroom",
                name: room.name,
                reason: format!("{pupils} student(s) are still assigned to it"),
            });
        }

        classrooms::delete(conn, id)?;
        ttlog(conn, "del", &format!("classroom #{id}"), &room.name)?;
        Ok(())
    }

    /// Removes the student together with its attendance, permissions and
    /// messages.
    pub fn student(conn: &mut Connection, id: i64) -> AppResult<()> {
        let s = students::get(conn, id)?;
        students::delete_cascade(conn, id)?;
        ttlog(conn, "del", &format!("student #{id}"), &s.full_name())?;
        Ok(())
    }
}
