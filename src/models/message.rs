use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: i64,
    pub student_id: i64,
    pub subject: String,
    pub body: String,
    pub sent_at: String,
    pub read: bool,
    /// Filled by list queries, not stored.
    pub student_name: Option<String>,
}

impl Message {
    pub fn validate(&self) -> AppResult<()> {
        if self.subject.trim().is_empty() || self.body.trim().is_empty() {
            return Err(AppError::Validation("subject and body are required".into()));
        }
        Ok(())
    }
}
