//! Path utilities: expand ~ and build collision-free file names.

use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Return `dir/name` if free, otherwise `dir/<stem>_<n><ext>` with the first
/// free `n` starting at 1. `ext` is everything after the first dot of `name`,
/// so `a.tar.zip` becomes `a_1.tar.zip`.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.split_once('.') {
        Some((s, e)) => (s.to_string(), format!(".{e}")),
        None => (name.to_string(), String::new()),
    };

    let mut n = 1;
    loop {
        let p = dir.join(format!("{stem}_{n}{ext}"));
        if !p.exists() {
            return p;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_path_appends_counter_before_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.backup.zip"), b"x").unwrap();
        std::fs::write(dir.path().join("b_1.backup.zip"), b"x").unwrap();

        let p = unique_path(dir.path(), "b.backup.zip");
        assert_eq!(p.file_name().unwrap(), "b_2.backup.zip");
    }
}
