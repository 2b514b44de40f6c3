use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Classroom {
    pub id: i64,
    pub name: String,
    pub center_id: Option<i64>,
    pub capacity: Option<i64>,
    pub notes: Option<String>,
    /// Filled by list queries, not stored.
    pub center_name: Option<String>,
}

impl Classroom {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("classroom name is required".into()));
        }
        if let Some(c) = self.capacity
            && c < 0
        {
            return Err(AppError::Validation("capacity cannot be negative".into()));
        }
        Ok(())
    }
}
