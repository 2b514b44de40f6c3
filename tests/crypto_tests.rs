use schooldesk::context::AppContext;
use schooldesk::crypto::{self, cipher, sentinel};
use schooldesk::db::pool::DbPool;
use schooldesk::errors::AppError;
use std::fs;

mod common;
use common::{add_student, fresh_ctx};

#[test]
fn encrypt_then_decrypt_is_byte_identical() {
    let (_dir, ctx) = fresh_ctx();
    let original = fs::read(ctx.db_path()).unwrap();

    cipher::encrypt_file(ctx.db_path(), "correct horse").unwrap();
    assert!(cipher::is_encrypted(ctx.db_path()));
    assert_ne!(fs::read(ctx.db_path()).unwrap(), original);

    cipher::decrypt_file(ctx.db_path(), "correct horse").unwrap();
    assert_eq!(fs::read(ctx.db_path()).unwrap(), original);
}

#[test]
fn wrong_password_leaves_file_unchanged() {
    let (_dir, ctx) = fresh_ctx();
    cipher::encrypt_file(ctx.db_path(), "right").unwrap();
    let sealed = fs::read(ctx.db_path()).unwrap();

    let res = cipher::decrypt_file(ctx.db_path(), "wrong");
    assert!(matches!(res, Err(AppError::WrongPassword)));
    assert_eq!(fs::read(ctx.db_path()).unwrap(), sealed);
}

#[test]
fn enabling_twice_keeps_one_sentinel() {
    let (dir, ctx) = fresh_ctx();
    crypto::enable(&ctx, "pw").unwrap();
    crypto::enable(&ctx, "pw").unwrap();

    let sentinels = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() == sentinel::SENTINEL_FILE)
        .count();
    assert_eq!(sentinels, 1);
    assert!(ctx.encryption_enabled());
}

#[test]
fn data_survives_an_encrypted_session_and_a_new_context() {
    let (dir, ctx) = fresh_ctx();
    crypto::enable(&ctx, "pw").unwrap();

    let pool = DbPool::open(&ctx).unwrap();
    add_student(&pool, "Lucía", "Gómez");
    pool.close().unwrap();
    assert!(cipher::is_encrypted(ctx.db_path()));

    // A second process: locked until unlocked with the right password.
    let other = AppContext::in_dir(dir.path());
    assert!(matches!(DbPool::open(&other), Err(AppError::Locked)));
    assert!(matches!(
        crypto::unlock(&other, "nope"),
        Err(AppError::WrongPassword)
    ));
    crypto::unlock(&other, "pw").unwrap();

    let pool = DbPool::open(&other).unwrap();
    let n: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn decrypt_and_disable_restores_plaintext() {
    let (_dir, ctx) = fresh_ctx();
    crypto::enable(&ctx, "pw").unwrap();
    crypto::decrypt_and_disable(&ctx).unwrap();

    assert!(!ctx.encryption_enabled());
    assert!(!ctx.has_password());
    assert!(!cipher::is_encrypted(ctx.db_path()));
    DbPool::open(&ctx).unwrap().close().unwrap();
}

#[test]
fn enable_on_sealed_file_without_sentinel_verifies_password() {
    let (dir, ctx) = fresh_ctx();
    crypto::enable(&ctx, "pw").unwrap();
    fs::remove_file(sentinel::sentinel_path(dir.path())).unwrap();
    ctx.clear_password();
    let sealed = fs::read(ctx.db_path()).unwrap();
    assert!(crypto::sentinel_missing(&ctx));

    let res = crypto::enable(&ctx, "other");
    assert!(matches!(res, Err(AppError::WrongPassword)));
    assert!(!sentinel::is_enabled(dir.path()));
    assert!(!ctx.has_password());
    assert_eq!(fs::read(ctx.db_path()).unwrap(), sealed);

    crypto::enable(&ctx, "pw").unwrap();
    assert!(sentinel::is_enabled(dir.path()));
    assert_eq!(fs::read(ctx.db_path()).unwrap(), sealed);
}
