//! At-rest encryption of the database file.
//!
//! `cipher` holds the file format and the whole-file encrypt/decrypt
//! primitives, `sentinel` the marker file that flags encryption as enabled.
//! The functions below tie both to an [`AppContext`].

pub mod cipher;
pub mod sentinel;

use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use std::fs;
use tracing::{info, warn};

/// Mark encryption enabled, keep the password in memory and encrypt the
/// current plaintext database if there is one.
///
/// An already encrypted file must open with `password` before anything
/// changes; this is also how a lost sentinel is restored.
pub fn enable(ctx: &AppContext, password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::Validation("password must not be empty".into()));
    }

    let _guard = ctx.lock_db();
    let path = ctx.db_path();
    let sealed = path.exists() && cipher::is_encrypted(path);

    if sealed {
        let blob = fs::read(path)?;
        cipher::open(&blob, password)?;
    }

    sentinel::mark_enabled(ctx.data_dir())?;
    ctx.set_password(password);

    if path.exists() && !sealed {
        cipher::encrypt_file(path, password)?;
        info!(path = %path.display(), "database encrypted at rest");
    }
    Ok(())
}

/// True when the database file is ciphertext but no sentinel marks
/// encryption as enabled.
pub fn sentinel_missing(ctx: &AppContext) -> bool {
    !ctx.encryption_enabled() && cipher::is_encrypted(ctx.db_path())
}

/// Remove the sentinel and forget the password. The file is left as is.
pub fn disable(ctx: &AppContext) -> AppResult<()> {
    sentinel::mark_disabled(ctx.data_dir())?;
    ctx.clear_password();
    Ok(())
}

/// Decrypt the database back to plaintext with the held password, then
/// disable encryption.
pub fn decrypt_and_disable(ctx: &AppContext) -> AppResult<()> {
    {
        let _guard = ctx.lock_db();
        let path = ctx.db_path();
        if path.exists() && cipher::is_encrypted(path) {
            let password = ctx.password().ok_or(AppError::Locked)?;
            cipher::decrypt_file(path, &password)?;
        }
    }
    disable(ctx)
}

/// Verify `password` against the at-rest database and keep it in memory.
///
/// A plaintext or missing database accepts any password (it will be used to
/// seal the file at the end of the next session).
pub fn unlock(ctx: &AppContext, password: &str) -> AppResult<()> {
    let _guard = ctx.lock_db();
    let path = ctx.db_path();

    if path.exists() && cipher::is_encrypted(path) {
        let blob = fs::read(path)?;
        cipher::open(&blob, password)?;
    } else if path.exists() {
        warn!(path = %path.display(), "encryption enabled but database is plaintext");
    }

    ctx.set_password(password);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_twice_keeps_a_single_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());

        enable(&ctx, "pw").unwrap();
        enable(&ctx, "pw").unwrap();

        let markers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() == sentinel::SENTINEL_FILE)
            .count();
        assert_eq!(markers, 1);
        assert!(ctx.encryption_enabled());
    }

    #[test]
    fn disable_forgets_password_but_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());
        fs::write(ctx.db_path(), b"").unwrap();

        enable(&ctx, "pw").unwrap();
        let sealed = fs::read(ctx.db_path()).unwrap();
        disable(&ctx).unwrap();

        assert!(!ctx.encryption_enabled());
        assert!(!ctx.has_password());
        assert_eq!(fs::read(ctx.db_path()).unwrap(), sealed);
    }

    #[test]
    fn enable_checks_password_of_sealed_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());
        fs::write(ctx.db_path(), b"").unwrap();
        enable(&ctx, "right").unwrap();
        disable(&ctx).unwrap();
        assert!(sentinel_missing(&ctx));

        assert!(matches!(enable(&ctx, "wrong"), Err(AppError::WrongPassword)));
        assert!(!ctx.encryption_enabled());

        enable(&ctx, "right").unwrap();
        assert!(ctx.encryption_enabled());
        assert!(!sentinel_missing(&ctx));
    }

    #[test]
    fn unlock_rejects_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());
        fs::write(ctx.db_path(), b"").unwrap();
        enable(&ctx, "right").unwrap();
        ctx.clear_password();

        assert!(matches!(unlock(&ctx, "wrong"), Err(AppError::WrongPassword)));
        assert!(!ctx.has_password());
        unlock(&ctx, "right").unwrap();
        assert!(ctx.has_password());
    }
}
