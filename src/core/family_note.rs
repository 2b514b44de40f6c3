//! Printable notes to families: a subject, free text and a signature line.

use crate::errors::{AppError, AppResult};
use crate::export::PdfManager;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "FAMILY NOTE";
const SIGNATURE: &str = "Signature of the person in charge";

/// `nota_familiar_<YYYYmmdd>.pdf`
pub fn file_name(date: NaiveDate) -> String {
    format!("nota_familiar_{}.pdf", date.format("%Y%m%d"))
}

/// One paragraph per non-blank line of `body`.
pub fn paragraphs(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write the note to `out`, or to `dir/nota_familiar_<date>.pdf` when no
/// explicit path is given. An existing file for the same day is replaced.
pub fn generate(
    dir: &Path,
    out: Option<&Path>,
    subject: &str,
    body: &str,
    date: NaiveDate,
) -> AppResult<PathBuf> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(AppError::Validation("note subject is required".into()));
    }
    let paragraphs = paragraphs(body);
    if paragraphs.is_empty() {
        return Err(AppError::Validation("note body is required".into()));
    }

    let path = match out {
        Some(p) => p.to_path_buf(),
        None => dir.join(file_name(date)),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut pdf = PdfManager::new();
    pdf.write_letter(
        TITLE,
        &[
            ("Date:", date.format("%d %B %Y").to_string()),
            ("Subject:", subject.to_string()),
        ],
        &paragraphs,
        SIGNATURE,
    );
    pdf.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn file_name_carries_the_date() {
        assert_eq!(file_name(day()), "nota_familiar_20250310.pdf");
    }

    #[test]
    fn blank_lines_are_not_paragraphs() {
        assert_eq!(
            paragraphs("Dear families,\n\n  \nSee you Monday.\n"),
            vec!["Dear families,", "See you Monday."]
        );
    }

    #[test]
    fn empty_subject_or_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            generate(dir.path(), None, "  ", "text", day()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            generate(dir.path(), None, "Trip", "\n \n", day()),
            Err(AppError::Validation(_))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn note_is_written_under_the_dated_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = generate(dir.path(), None, "Trip", "Bring a hat.", day()).unwrap();
        assert_eq!(path, dir.path().join("nota_familiar_20250310.pdf"));
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
