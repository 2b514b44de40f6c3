use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

/// Ensure that the `log` table exists. Migrations record themselves there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> AppResult<bool> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_applied(conn: &Connection, name: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM log WHERE operation = 'migration_applied' AND target = ?1 LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Base schema. Every statement is `IF NOT EXISTS`, so running it against a
/// database created by an older build is harmless.
fn create_base_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS centers (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            address    TEXT,
            phone      TEXT,
            email      TEXT,
            notes      TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS classrooms (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            center_id  INTEGER REFERENCES centers(id),
            capacity   INTEGER,
            notes      TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS students (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            surname      TEXT NOT NULL,
            birth_date   TEXT,
            address      TEXT,
            phone        TEXT,
            family_email TEXT,
            notes        TEXT,
            active       INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id),
            date       TEXT NOT NULL,
            status     TEXT NOT NULL,
            check_in   TEXT,
            check_out  TEXT,
            notes      TEXT
        );

        CREATE TABLE IF NOT EXISTS materials (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name     TEXT NOT NULL,
            category TEXT,
            quantity INTEGER NOT NULL DEFAULT 0,
            minimum  INTEGER NOT NULL DEFAULT 0,
            unit     TEXT,
            notes    TEXT
        );

        CREATE TABLE IF NOT EXISTS menu_items (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT NOT NULL,
            meal_type   TEXT NOT NULL,
            dish        TEXT NOT NULL,
            description TEXT,
            allergens   TEXT
        );

        CREATE TABLE IF NOT EXISTS permissions (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id),
            kind       TEXT NOT NULL,
            response   TEXT NOT NULL DEFAULT 'Pendiente',
            date       TEXT,
            notes      TEXT
        );

        CREATE TABLE IF NOT EXISTS messages (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id),
            subject    TEXT NOT NULL,
            body       TEXT NOT NULL,
            sent_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            read       INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}

/// Students gained an optional center/classroom placement after the first
/// release. Add the columns when missing.
fn add_student_placement(conn: &Connection) -> AppResult<()> {
    if !column_exists(conn, "students", "center_id")? {
        conn.execute(
            "ALTER TABLE students ADD COLUMN center_id INTEGER REFERENCES centers(id)",
            [],
        )?;
    }
    if !column_exists(conn, "students", "classroom_id")? {
        conn.execute(
            "ALTER TABLE students ADD COLUMN classroom_id INTEGER REFERENCES classrooms(id)",
            [],
        )?;
    }
    Ok(())
}

fn create_indexes(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        CREATE INDEX IF NOT EXISTS idx_attendance_student_date ON attendance(student_id, date);
        CREATE INDEX IF NOT EXISTS idx_menu_items_date ON menu_items(date);
        CREATE INDEX IF NOT EXISTS idx_students_placement ON students(center_id, classroom_id);
        "#,
    )?;
    Ok(())
}

type Step = fn(&Connection) -> AppResult<()>;

const MIGRATIONS: &[(&str, &str, Step)] = &[
    ("001_base_schema", "Created base schema", create_base_schema),
    (
        "002_student_placement",
        "Added center/classroom columns to students",
        add_student_placement,
    ),
    ("003_indexes", "Created lookup indexes", create_indexes),
];

/// Run every migration not yet recorded in the `log` table.
/// Returns how many were applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let fresh = !table_exists(conn, "students")?;
    let mut applied = 0;

    for (name, message, step) in MIGRATIONS {
        if is_applied(conn, name)? {
            continue;
        }

        step(conn)?;
        ttlog(conn, "migration_applied", name, message)?;
        info!(migration = name, "migration applied");
        applied += 1;

        if !fresh {
            success(format!("Migration applied: {name}"));
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);
        assert!(column_exists(&conn, "students", "classroom_id").unwrap());
    }

    #[test]
    fn legacy_students_table_gets_placement_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE students (id INTEGER PRIMARY KEY, name TEXT NOT NULL, surname TEXT NOT NULL, active INTEGER NOT NULL DEFAULT 1);
             INSERT INTO students (name, surname) VALUES ('Ana', 'Ruiz');",
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        assert!(column_exists(&conn, "students", "center_id").unwrap());
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }
}
