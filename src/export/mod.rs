pub mod csv;
pub(crate) mod fs_utils;
mod pdf;

pub use pdf::PdfManager;

use crate::ui::messages::success;
use std::path::Path;

/// Common completion message for exports.
pub(crate) fn notify_export_success(label: &str, count: usize, path: &Path) {
    success(format!(
        "{label} export completed: {count} row(s) written to {}",
        path.display()
    ));
}
