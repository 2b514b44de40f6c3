use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse `YYYY-MM-DD`, or the words `today` / `yesterday`.
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" => return Ok(today()),
        "yesterday" => {
            return today()
                .pred_opt()
                .ok_or_else(|| AppError::InvalidDate(s.to_string()));
        }
        _ => {}
    }
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

pub fn parse_opt_date(s: Option<&str>) -> AppResult<Option<NaiveDate>> {
    s.filter(|v| !v.trim().is_empty()).map(parse_date).transpose()
}

/// Parse `HH:MM` (seconds are accepted and dropped).
pub fn parse_time(s: &str) -> AppResult<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

pub fn now_hhmm() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_times() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(matches!(parse_date("01/03/2024"), Err(AppError::InvalidDate(_))));
        assert!(parse_time("08:30").is_ok());
        assert!(parse_time("8h30").is_err());
        assert_eq!(parse_opt_date(Some("")).unwrap(), None);
    }
}
