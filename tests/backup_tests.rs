use chrono::Local;
use schooldesk::core::backup::{BackupLogic, backup_file_name};
use std::fs::{self, File};
use std::time::{Duration, SystemTime};

mod common;
use common::fresh_ctx;

const DAY: u64 = 24 * 60 * 60;

#[test]
fn rotation_keeps_backups_younger_than_three_days() {
    let dir = tempfile::tempdir().unwrap();
    let now = SystemTime::now();

    for days in [0u64, 2, 3, 4, 10] {
        let name = format!("schooldesk_backup_age{days:02}.db");
        let file = File::create(dir.path().join(&name)).unwrap();
        file.set_modified(now - Duration::from_secs(days * DAY)).unwrap();
    }
    fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

    let removed = BackupLogic::cleanup_old_backups(dir.path(), "schooldesk", now);
    assert_eq!(removed.len(), 3);

    let mut left: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    left.sort();
    assert_eq!(
        left,
        vec![
            "notes.txt",
            "schooldesk_backup_age00.db",
            "schooldesk_backup_age02.db",
        ]
    );
}

#[test]
fn startup_backup_copies_the_file_at_rest() {
    let (_dir, ctx) = fresh_ctx();

    let backup = BackupLogic::startup_backup(&ctx).unwrap().unwrap();
    assert_eq!(fs::read(&backup).unwrap(), fs::read(ctx.db_path()).unwrap());
    assert!(backup.starts_with(ctx.db_backups_dir()));

    let rotated = BackupLogic::list_rotated(&ctx).unwrap();
    assert_eq!(rotated, vec![backup]);
}

#[test]
fn startup_backup_without_database_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = schooldesk::context::AppContext::in_dir(dir.path());
    assert!(BackupLogic::startup_backup(&ctx).unwrap().is_none());
}

#[test]
fn old_startup_backups_are_rotated_on_the_next_run() {
    let (_dir, ctx) = fresh_ctx();
    fs::create_dir_all(ctx.db_backups_dir()).unwrap();

    let stale = ctx
        .db_backups_dir()
        .join(backup_file_name("schooldesk", Local::now() - chrono::Duration::days(5)));
    File::create(&stale)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(5 * DAY))
        .unwrap();

    BackupLogic::startup_backup(&ctx).unwrap();
    assert!(!stale.exists());
    assert_eq!(BackupLogic::list_rotated(&ctx).unwrap().len(), 1);
}
