//! Plain-text tables for list commands.

use crate::utils::colors::RESET;

const MAX_CELL: usize = 40;

struct Row {
    cells: Vec<String>,
    color: &'static str,
}

/// Every row renders on exactly one line, so a row colour never bleeds
/// into its neighbours.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.add_colored_row(row, "");
    }

    /// Add a row printed between `color` and a reset.
    pub fn add_colored_row(&mut self, row: Vec<String>, color: &'static str) {
        self.rows.push(Row {
            cells: row.iter().map(|c| single_line(c)).collect(),
            color,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.chars().count().min(MAX_CELL))
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let line = |cells: &[String], color: &str, out: &mut String| {
            let mut l = String::new();
            for (i, w) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                l.push_str(&format!("{:<w$}  ", truncate(cell, MAX_CELL), w = w));
            }
            if color.is_empty() {
                out.push_str(l.trim_end());
            } else {
                out.push_str(&format!("{color}{}{RESET}", l.trim_end()));
            }
            out.push('\n');
        };

        line(&self.headers, "", &mut out);
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total));
        out.push('\n');
        for row in &self.rows {
            line(&row.cells, row.color, &mut out);
        }
        out
    }
}

fn single_line(s: &str) -> String {
    s.split(['\r', '\n', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max - 3).collect();
    t.push_str("...");
    t
}

pub fn opt(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_fit_the_widest_cell() {
        let mut t = Table::new(["ID", "Name"]);
        t.add_row(vec!["1".into(), "Alexandra".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[2], "1   Alexandra");
    }

    #[test]
    fn multi_line_cells_keep_colours_on_their_row() {
        const RED: &str = "\x1b[31m";
        const GREEN: &str = "\x1b[32m";

        let mut t = Table::new(["ID", "Notes"]);
        t.add_colored_row(vec!["1".into(), "left early\r\nfever".into()], RED);
        t.add_colored_row(vec!["2".into(), "fine".into()], GREEN);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], format!("{RED}1   left early fever{RESET}"));
        assert_eq!(lines[3], format!("{GREEN}2   fine{RESET}"));
    }
}
