use crate::db::log::load_entries;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

static ANSI: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// Colour for an operation name.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "checkin" => Colour::Green,
        "del" => Colour::Red,
        "edit" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" | "restore" => Colour::Blue,
        "crypt" => Colour::Cyan,
        "sync" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

const OP_WIDTH: usize = 40;

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let entries = load_entries(&pool.conn, limit)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);

        println!("📜 Internal log:\n");

        for e in entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(e.date);

            let color = color_for_operation(&e.operation);
            let mut label = color.paint(e.operation.as_str()).to_string();
            if !e.target.is_empty() {
                label.push_str(&format!(" ({})", e.target));
            }

            let visible = strip_ansi(&label).chars().count();
            let padding = " ".repeat(OP_WIDTH.saturating_sub(visible));

            println!(
                "{:>id_w$}: {} | {}{} => {}",
                e.id,
                date,
                label,
                padding,
                e.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}
