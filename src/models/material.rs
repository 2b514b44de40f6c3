use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub minimum: i64,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

impl Material {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum
    }

    /// Units to buy to get back to the minimum.
    pub fn to_buy(&self) -> i64 {
        (self.minimum - self.quantity).max(0)
    }

    pub fn unit_label(&self) -> &str {
        match self.unit.as_deref() {
            Some(u) if !u.is_empty() => u,
            _ => "units",
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("material name is required".into()));
        }
        if self.quantity < 0 || self.minimum < 0 {
            return Err(AppError::Validation(
                "quantity and minimum cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_stock_includes_the_minimum() {
        let m = Material {
            name: "Paper".into(),
            quantity: 5,
            minimum: 5,
            ..Default::default()
        };
        assert!(m.is_low_stock());
        assert_eq!(m.to_buy(), 0);
    }
}
