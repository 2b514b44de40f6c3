//! Row mapping and statements, one module per table.

pub mod attendance;
pub mod centers;
pub mod classrooms;
pub mod materials;
pub mod menu;
pub mod messages;
pub mod permissions;
pub mod students;

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use rusqlite::Row;

pub(crate) fn fmt_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn date_from_row(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(col)?;
    parse_sql_date(s)
}

pub(crate) fn opt_date_from_row(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(col)?;
    match s {
        Some(s) if !s.is_empty() => parse_sql_date(s).map(Some),
        _ => Ok(None),
    }
}

fn parse_sql_date(s: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(s.clone())),
        )
    })
}

/// Turn "0 rows affected" into a NotFound error.
pub(crate) fn ensure_changed(changed: usize, entity: &'static str, id: i64) -> AppResult<()> {
    if changed == 0 {
        return Err(AppError::NotFound { entity, id });
    }
    Ok(())
}

pub(crate) fn not_found(entity: &'static str, id: i64) -> impl FnOnce(rusqlite::Error) -> AppError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound { entity, id },
        other => AppError::Db(other),
    }
}
