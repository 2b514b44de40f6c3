use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;

/// Meal types in serving order.
pub const MEAL_TYPES: [&str; 4] = ["Desayuno", "Almuerzo", "Merienda", "Cena"];

/// Sort key for a meal type; unknown types go last.
pub fn meal_rank(meal_type: &str) -> usize {
    MEAL_TYPES
        .iter()
        .position(|m| *m == meal_type)
        .unwrap_or(MEAL_TYPES.len())
}

pub fn normalize_meal_type(input: &str) -> String {
    match input.trim().to_lowercase().as_str() {
        "breakfast" | "desayuno" => "Desayuno".into(),
        "lunch" | "almuerzo" => "Almuerzo".into(),
        "snack" | "merienda" => "Merienda".into(),
        "dinner" | "cena" => "Cena".into(),
        _ => input.trim().to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_type: String,
    pub dish: String,
    pub description: Option<String>,
    pub allergens: Option<String>,
}

impl MenuItem {
    pub fn validate(&self) -> AppResult<()> {
        if self.meal_type.trim().is_empty() || self.dish.trim().is_empty() {
            return Err(AppError::Validation("meal type and dish are required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_meal_sorts_last() {
        assert_eq!(meal_rank("Desayuno"), 0);
        assert_eq!(meal_rank("Cena"), 3);
        assert_eq!(meal_rank("Brunch"), 4);
    }
}
