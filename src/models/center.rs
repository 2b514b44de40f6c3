use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Center {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl Center {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("center name is required".into()));
        }
        Ok(())
    }
}
