use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PermissionResponse {
    Yes,
    No,
    Pending,
}

impl PermissionResponse {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PermissionResponse::Yes => "Sí",
            PermissionResponse::No => "No",
            PermissionResponse::Pending => "Pendiente",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Sí" | "Si" => Some(Self::Yes),
            "No" => Some(Self::No),
            "Pendiente" => Some(Self::Pending),
            _ => None,
        }
    }

    /// CLI input: yes/no/pending, or the stored spelling.
    pub fn from_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "sí" | "si" => Some(Self::Yes),
            "no" | "n" => Some(Self::No),
            "pending" | "pendiente" => Some(Self::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Permission {
    pub id: i64,
    pub student_id: i64,
    pub kind: String,
    pub response: PermissionResponse,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Filled by list queries, not stored.
    pub student_name: Option<String>,
}

impl Permission {
    pub fn validate(&self) -> AppResult<()> {
        if self.kind.trim().is_empty() {
            return Err(AppError::Validation("permission type is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_round_trip_through_db_strings() {
        for r in [
            PermissionResponse::Yes,
            PermissionResponse::No,
            PermissionResponse::Pending,
        ] {
            assert_eq!(PermissionResponse::from_db_str(r.to_db_str()), Some(r));
        }
        assert_eq!(
            PermissionResponse::from_input("YES"),
            Some(PermissionResponse::Yes)
        );
    }
}
