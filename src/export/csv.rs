use crate::errors::AppResult;
use crate::models::attendance::Attendance;
use crate::models::student::Student;
use csv::Writer;
use std::path::Path;

pub fn write_students(path: &Path, students: &[Student]) -> AppResult<usize> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "name",
        "surname",
        "birth_date",
        "phone",
        "family_email",
        "active",
        "center_id",
        "classroom_id",
    ])?;

    for s in students {
        wtr.write_record(&[
            s.id.to_string(),
            s.name.clone(),
            s.surname.clone(),
            s.birth_date.map(|d| d.to_string()).unwrap_or_default(),
            s.phone.clone().unwrap_or_default(),
            s.family_email.clone().unwrap_or_default(),
            (s.active as u8).to_string(),
            s.center_id.map(|v| v.to_string()).unwrap_or_default(),
            s.classroom_id.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(students.len())
}

pub fn write_attendance(path: &Path, records: &[Attendance]) -> AppResult<usize> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(["date", "student", "status", "check_in", "check_out", "notes"])?;

    for a in records {
        wtr.write_record(&[
            a.date_str(),
            a.student_name.clone().unwrap_or_else(|| a.student_id.to_string()),
            a.status.clone(),
            a.check_in.clone().unwrap_or_default(),
            a.check_out.clone().unwrap_or_default(),
            a.notes.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        let mut s = Student::new("Ana", "Ruiz");
        s.id = 4;

        assert_eq!(write_students(&path, &[s]).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,name,surname"));
        assert!(lines.next().unwrap().starts_with("4,Ana,Ruiz"));
    }
}
