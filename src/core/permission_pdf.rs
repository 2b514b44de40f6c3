use crate::db::queries::students;
use crate::errors::{AppError, AppResult};
use crate::export::PdfManager;
use crate::models::filter::PlacementFilter;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

/// `permission_<kind>.pdf` with the kind lowercased and spaces as `_`.
pub fn template_file_name(kind: &str) -> String {
    let slug: String = kind
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("permission_{slug}.pdf")
}

/// Write a sign-off sheet for `kind` into `dir`: one row per active student
/// with empty YES / NO boxes. Returns the file path and the row count.
pub fn generate_template(
    conn: &Connection,
    dir: &Path,
    kind: &str,
    filter: &PlacementFilter,
) -> AppResult<(PathBuf, usize)> {
    if kind.trim().is_empty() {
        return Err(AppError::Validation("permission type is required".into()));
    }

    let rows: Vec<Vec<String>> = students::list(conn, filter, true, None)?
        .iter()
        .map(|s| vec![s.full_name(), String::new(), String::new()])
        .collect();

    let mut pdf = PdfManager::new();
    pdf.write_table(
        &format!("{} TEMPLATE", kind.trim().to_uppercase()),
        &["Please mark the matching box with an X.".to_string()],
        &["Student", "YES", "NO"],
        &[4.0, 0.75, 0.75],
        &rows,
    );

    fs::create_dir_all(dir)?;
    let path = dir.join(template_file_name(kind));
    pdf.save(&path)?;
    Ok((path, rows.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_slugged() {
        assert_eq!(template_file_name("Field Trip"), "permission_field_trip.pdf");
    }
}
