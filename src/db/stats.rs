use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

pub const TABLES: [&str; 8] = [
    "centers",
    "classrooms",
    "students",
    "attendance",
    "materials",
    "menu_items",
    "permissions",
    "messages",
];

pub struct DbStats {
    pub file_size: u64,
    pub encrypted: bool,
    pub counts: Vec<(&'static str, i64)>,
    pub first_attendance: Option<String>,
    pub last_attendance: Option<String>,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    let file_size = fs::metadata(pool.ctx().db_path())
        .map(|m| m.len())
        .unwrap_or(0);

    let mut counts = Vec::with_capacity(TABLES.len());
    for t in TABLES {
        let n: i64 = pool
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {t}"), [], |row| row.get(0))?;
        counts.push((t, n));
    }

    let (first_attendance, last_attendance) = pool.conn.query_row(
        "SELECT MIN(date), MAX(date) FROM attendance",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(DbStats {
        file_size,
        encrypted: pool.is_encrypted_session(),
        counts,
        first_attendance,
        last_attendance,
    })
}

pub fn print_db_info(pool: &DbPool) -> AppResult<()> {
    let stats = collect(pool)?;
    let file_mb = (stats.file_size as f64) / (1024.0 * 1024.0);

    println!();
    println!(
        "{}• File:{} {}{}{}",
        CYAN,
        RESET,
        YELLOW,
        pool.ctx().db_path().display(),
        RESET
    );
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Encrypted at rest:{} {}",
        CYAN,
        RESET,
        if stats.encrypted { "yes" } else { "no" }
    );

    println!("{}• Rows:{}", CYAN, RESET);
    for (table, n) in &stats.counts {
        println!("    {:<12} {}{}{}", table, GREEN, n, RESET);
    }

    let dash = format!("{GREY}--{RESET}");
    println!("{}• Attendance range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        stats.first_attendance.as_deref().unwrap_or(&dash)
    );
    println!(
        "    to:   {}",
        stats.last_attendance.as_deref().unwrap_or(&dash)
    );
    println!();
    Ok(())
}
