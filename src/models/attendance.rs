use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;

pub const STATUS_PRESENT: &str = "Presente";
pub const STATUS_ABSENT: &str = "Ausente";
pub const STATUS_LATE: &str = "Tardanza";
pub const STATUS_EXCUSED: &str = "Permiso";

/// Status values offered by the CLI. Any other text is stored as given.
pub const WELL_KNOWN_STATUSES: [&str; 4] =
    [STATUS_PRESENT, STATUS_ABSENT, STATUS_LATE, STATUS_EXCUSED];

/// Map the English shorthands accepted on the command line to stored values.
pub fn normalize_status(input: &str) -> String {
    match input.trim().to_lowercase().as_str() {
        "present" | "presente" => STATUS_PRESENT.to_string(),
        "absent" | "ausente" => STATUS_ABSENT.to_string(),
        "late" | "tardanza" => STATUS_LATE.to_string(),
        "excused" | "permiso" => STATUS_EXCUSED.to_string(),
        _ => input.trim().to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub notes: Option<String>,
    /// Filled by list queries, not stored.
    pub student_name: Option<String>,
}

impl Attendance {
    pub fn new(student_id: i64, date: NaiveDate, status: &str) -> Self {
        Self {
            id: 0,
            student_id,
            date,
            status: normalize_status(status),
            check_in: None,
            check_out: None,
            notes: None,
            student_name: None,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.status.is_empty() {
            return Err(AppError::Validation("attendance status is required".into()));
        }
        for t in [&self.check_in, &self.check_out].into_iter().flatten() {
            crate::utils::date::parse_time(t)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthands_map_to_stored_values() {
        assert_eq!(normalize_status("late"), STATUS_LATE);
        assert_eq!(normalize_status("Presente"), STATUS_PRESENT);
        assert_eq!(normalize_status("field trip"), "field trip");
    }
}
