//! Daily report: low stock, the day's menu and an attendance summary.

use crate::db::queries::{attendance, materials, menu};
use crate::errors::AppResult;
use crate::models::material::Material;
use crate::models::menu::MenuItem;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::fmt::Write;

pub const REPORT_WIDTH: usize = 70;

#[derive(Debug, Clone)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub center: Option<String>,
    pub classroom: Option<String>,
    pub low_stock: Vec<Material>,
    pub menu: Vec<MenuItem>,
    pub attendance: Vec<(String, i64)>,
}

impl DailyReport {
    /// Center and classroom filters match by name and only restrict the
    /// attendance summary.
    pub fn build(
        conn: &Connection,
        date: NaiveDate,
        center: Option<&str>,
        classroom: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            date,
            center: center.map(str::to_string),
            classroom: classroom.map(str::to_string),
            low_stock: materials::list(conn, true)?,
            menu: menu::list_for_day(conn, date)?,
            attendance: attendance::status_counts(conn, date, center, classroom)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.low_stock.is_empty() && self.menu.is_empty() && self.attendance.is_empty()
    }

    pub fn attendance_total(&self) -> i64 {
        self.attendance.iter().map(|(_, n)| n).sum()
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(REPORT_WIDTH);
        let thin = "-".repeat(REPORT_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "DAILY REPORT - {}", self.date.format("%Y-%m-%d"));
        if let Some(c) = &self.center {
            let _ = writeln!(out, "Center: {c}");
        }
        if let Some(c) = &self.classroom {
            let _ = writeln!(out, "Classroom: {c}");
        }
        let _ = writeln!(out, "{rule}");

        if !self.low_stock.is_empty() {
            let _ = writeln!(out, "\nMATERIALS AT OR BELOW MINIMUM:\n{thin}");
            for m in &self.low_stock {
                let unit = m.unit_label();
                let _ = writeln!(out, "• {}", m.name);
                let _ = writeln!(out, "  Category: {}", m.category.as_deref().unwrap_or("N/A"));
                let _ = writeln!(out, "  Current quantity: {} {unit}", m.quantity);
                let _ = writeln!(out, "  Minimum quantity: {} {unit}", m.minimum);
                let _ = writeln!(out, "  ⚠️ BUY: {} {unit}\n", m.to_buy());
            }
        }

        if !self.menu.is_empty() {
            let _ = writeln!(out, "\nCAFETERIA MENU:\n{thin}");
            for item in &self.menu {
                let _ = writeln!(out, "\n{}:", item.meal_type.to_uppercase());
                let _ = writeln!(out, "  Dish: {}", item.dish);
                if let Some(d) = item.description.as_deref().filter(|d| !d.is_empty()) {
                    let _ = writeln!(out, "  Description: {d}");
                }
                if let Some(a) = item.allergens.as_deref().filter(|a| !a.is_empty()) {
                    let _ = writeln!(out, "  ⚠️ Allergens: {a}");
                }
            }
        }

        if !self.attendance.is_empty() {
            let _ = writeln!(out, "\n\nATTENDANCE SUMMARY:\n{thin}");
            let _ = writeln!(out, "Total records: {}\n", self.attendance_total());
            for (status, n) in &self.attendance {
                let _ = writeln!(out, "  {status}: {n} student(s)");
            }
        }

        if self.is_empty() {
            let _ = writeln!(out, "No data for the selected date and filters.");
        }

        let _ = writeln!(out, "\n{rule}\nEnd of report\n{rule}");
        out
    }
}
