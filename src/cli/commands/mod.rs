//! One handler module per top-level subcommand.

pub mod attendance;
pub mod backup;
pub mod center;
pub mod classroom;
pub mod config;
pub mod crypt;
pub mod db;
pub mod document;
pub mod init;
pub mod log;
pub mod material;
pub mod menu;
pub mod message;
pub mod note;
pub mod permission;
pub mod report;
pub mod student;
pub mod sync;

use crate::ui::messages::{confirm, info};

/// Empty strings mean "no value".
pub(crate) fn clean(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Apply an edit flag to an optional text field. An empty value clears it.
pub(crate) fn merge_text(field: &mut Option<String>, new: &Option<String>) {
    if new.is_some() {
        *field = clean(new);
    }
}

/// Apply an edit flag to an optional reference. `0` clears it.
pub(crate) fn merge_id(field: &mut Option<i64>, new: Option<i64>) {
    if let Some(id) = new {
        *field = (id != 0).then_some(id);
    }
}

/// `--yes` skips the prompt.
pub(crate) fn confirmed(yes: bool, prompt: &str) -> bool {
    if yes || confirm(prompt) {
        return true;
    }
    info("Operation cancelled.");
    false
}
