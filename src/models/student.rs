use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub family_email: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub center_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

impl Student {
    pub fn new(name: &str, surname: &str) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            surname: surname.trim().to_string(),
            birth_date: None,
            address: None,
            phone: None,
            family_email: None,
            notes: None,
            active: true,
            center_id: None,
            classroom_id: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() || self.surname.trim().is_empty() {
            return Err(AppError::Validation(
                "student name and surname are required".into(),
            ));
        }
        if let Some(email) = &self.family_email
            && !email.is_empty()
            && !email.contains('@')
        {
            return Err(AppError::Validation(format!("invalid family email: {email}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surname_is_required() {
        let s = Student::new("Ana", "  ");
        assert!(matches!(s.validate(), Err(AppError::Validation(_))));
    }
}
