//! Scoped database session.
//!
//! A `DbPool` holds the context's database lock for its whole lifetime.
//! With encryption disabled it opens the database file directly. With
//! encryption enabled the at-rest file is decrypted into a temporary working
//! copy next to it; `close()` (or `Drop`) seals the working copy back onto the
//! database path and removes the plaintext.

use crate::context::AppContext;
use crate::crypto::cipher;
use crate::errors::{AppError, AppResult};
use parking_lot::MutexGuard;
use rusqlite::Connection;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};
use zeroize::Zeroizing;

struct WorkingCopy {
    file: NamedTempFile,
    password: Zeroizing<String>,
}

pub struct DbPool<'a> {
    pub conn: Connection,
    ctx: &'a AppContext,
    working: Option<WorkingCopy>,
    closed: bool,
    _guard: MutexGuard<'a, ()>,
}

impl<'a> DbPool<'a> {
    pub fn open(ctx: &'a AppContext) -> AppResult<Self> {
        let guard = ctx.lock_db();

        if !ctx.encryption_enabled() {
            let conn = Connection::open(ctx.db_path())?;
            return Ok(Self {
                conn,
                ctx,
                working: None,
                closed: false,
                _guard: guard,
            });
        }

        let password = ctx.password().ok_or(AppError::Locked)?;
        let mut file = tempfile::Builder::new()
            .prefix(".session-")
            .suffix(".db")
            .tempfile_in(ctx.data_dir())?;

        let path = ctx.db_path();
        if path.exists() {
            if cipher::is_encrypted(path) {
                let blob = fs::read(path)?;
                let plain = cipher::open(&blob, &password)?;
                file.write_all(&plain)?;
            } else {
                warn!(path = %path.display(), "plaintext database under encryption, sealing on close");
                let plain = Zeroizing::new(fs::read(path)?);
                file.write_all(&plain)?;
            }
            file.flush()?;
        }

        debug!(working = %file.path().display(), "opened encrypted session");
        let conn = Connection::open(file.path())?;

        Ok(Self {
            conn,
            ctx,
            working: Some(WorkingCopy { file, password }),
            closed: false,
            _guard: guard,
        })
    }

    pub fn ctx(&self) -> &AppContext {
        self.ctx
    }

    pub fn is_encrypted_session(&self) -> bool {
        self.working.is_some()
    }

    /// End the session and report sealing errors. Dropping the session
    /// does the same but can only log them.
    pub fn close(mut self) -> AppResult<()> {
        self.finish()
    }

    fn finish(&mut self) -> AppResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let Some(work) = self.working.take() else {
            return Ok(());
        };

        let conn = std::mem::replace(&mut self.conn, Connection::open_in_memory()?);
        conn.close().map_err(|(_, e)| AppError::Db(e))?;

        let plain = Zeroizing::new(fs::read(work.file.path())?);
        let sealed = cipher::seal(&plain, &work.password)?;
        cipher::write_atomic(self.ctx.db_path(), &sealed)?;

        debug!(path = %self.ctx.db_path().display(), "session sealed");
        Ok(())
    }
}

impl Drop for DbPool<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            error!(error = %e, "failed to seal database at end of session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto;

    fn count_rows(pool: &DbPool) -> i64 {
        pool.conn
            .query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn plain_session_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());

        let pool = DbPool::open(&ctx).unwrap();
        pool.conn
            .execute_batch("CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        pool.close().unwrap();

        assert!(!cipher::is_encrypted(ctx.db_path()));
        let pool = DbPool::open(&ctx).unwrap();
        assert_eq!(count_rows(&pool), 1);
    }

    #[test]
    fn encrypted_session_reseals_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());
        crypto::enable(&ctx, "pw").unwrap();

        {
            let pool = DbPool::open(&ctx).unwrap();
            assert!(pool.is_encrypted_session());
            pool.conn
                .execute_batch("CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (7);")
                .unwrap();
        }

        assert!(cipher::is_encrypted(ctx.db_path()));
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".session-"))
            .count();
        assert_eq!(leftovers, 0);

        let pool = DbPool::open(&ctx).unwrap();
        assert_eq!(count_rows(&pool), 1);
    }

    #[test]
    fn encrypted_session_needs_password() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::in_dir(dir.path());
        crypto::enable(&ctx, "pw").unwrap();
        ctx.clear_password();

        assert!(matches!(DbPool::open(&ctx), Err(AppError::Locked)));
    }
}
