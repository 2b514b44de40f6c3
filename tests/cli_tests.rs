use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::Sandbox;

#[test]
fn init_creates_database_and_layout() {
    let sb = Sandbox::new();
    sb.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    let data = sb.data.path();
    assert!(data.join("schooldesk.db").exists());
    for sub in ["documents", "pdfs", "backups", "db_backups"] {
        assert!(data.join(sub).is_dir(), "{sub} missing");
    }
}

#[test]
fn students_can_be_added_and_listed() {
    let sb = Sandbox::new();
    sb.init();

    sb.cmd()
        .args(["student", "add", "Lucía", "Gómez", "--birth", "2018-04-02"])
        .assert()
        .success()
        .stdout(contains("Student #1"));

    sb.cmd()
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(contains("Gómez").and(contains("2018-04-02")));
}

#[test]
fn invalid_birth_date_is_rejected() {
    let sb = Sandbox::new();
    sb.init();

    sb.cmd()
        .args(["student", "add", "Ana", "Ruiz", "--birth", "02/04/2018"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn center_delete_is_blocked_by_classroom() {
    let sb = Sandbox::new();
    sb.init();

    sb.cmd().args(["center", "add", "North"]).assert().success();
    sb.cmd()
        .args(["classroom", "add", "1A", "--center", "1"])
        .assert()
        .success();

    sb.cmd()
        .args(["center", "delete", "1"])
        .assert()
        .failure()
        .stderr(contains("Cannot delete center 'North'"));

    sb.cmd()
        .args(["center", "list"])
        .assert()
        .success()
        .stdout(contains("North"));
}

#[test]
fn checkin_then_report() {
    let sb = Sandbox::new();
    sb.init();

    for (name, surname) in [("Ana", "Ruiz"), ("Leo", "Sanz"), ("Eva", "Mora")] {
        sb.cmd()
            .args(["student", "add", name, surname])
            .assert()
            .success();
    }

    sb.cmd()
        .args(["attendance", "checkin", "--date", "2025-03-10", "--time", "08:30"])
        .assert()
        .success()
        .stdout(contains("3 student(s) marked present at 08:30"));

    sb.cmd()
        .args(["attendance", "checkin", "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("already has a record"));

    sb.cmd()
        .args(["material", "add", "Crayons", "--quantity", "2", "--minimum", "5"])
        .assert()
        .success();

    sb.cmd()
        .args(["report", "daily", "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(
            contains("DAILY REPORT - 2025-03-10")
                .and(contains("BUY: 3 units"))
                .and(contains("Presente: 3 student(s)")),
        );
}

#[test]
fn student_export_writes_csv() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd()
        .args(["student", "add", "Ana", "Ruiz"])
        .assert()
        .success();

    let out = sb.data.path().join("students.csv");
    sb.cmd()
        .args(["student", "export", "--file"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("1 row(s)"));

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("id,name,surname"));
    assert!(text.contains("Ana,Ruiz"));
}

#[test]
fn permission_template_lands_in_pdfs() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd()
        .args(["student", "add", "Ana", "Ruiz"])
        .assert()
        .success();

    sb.cmd()
        .args(["permission", "template", "Excursion"])
        .assert()
        .success();

    let pdf = sb.data.path().join("pdfs").join("permission_excursion.pdf");
    let bytes = std::fs::read(pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn family_note_pdf_is_dated() {
    let sb = Sandbox::new();
    sb.init();

    sb.cmd()
        .args([
            "note",
            "pdf",
            "--subject",
            "Excursion",
            "--body",
            "Dear families,\nWe leave at nine.",
        ])
        .assert()
        .success()
        .stdout(contains("nota_familiar_"));

    let name = format!("nota_familiar_{}.pdf", chrono::Local::now().format("%Y%m%d"));
    let bytes = fs::read(sb.data.path().join("pdfs").join(name)).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn family_note_from_file_to_custom_path() {
    let sb = Sandbox::new();
    sb.init();
    let text = sb.home.path().join("note.txt");
    fs::write(&text, "Bring a hat.\n\nPick-up at five.\n").unwrap();
    let out = sb.home.path().join("out").join("note.pdf");

    sb.cmd()
        .args(["note", "pdf", "--subject", "Trip", "--file"])
        .arg(&text)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert!(fs::read(&out).unwrap().starts_with(b"%PDF"));
}

#[test]
fn family_note_needs_subject_and_body() {
    let sb = Sandbox::new();
    sb.init();

    sb.cmd()
        .args(["note", "pdf", "--subject", " ", "--body", "text"])
        .assert()
        .failure()
        .stderr(contains("subject is required"));

    sb.cmd()
        .args(["note", "pdf", "--subject", "Trip"])
        .assert()
        .failure();

    let name = format!("nota_familiar_{}.pdf", chrono::Local::now().format("%Y%m%d"));
    assert!(!sb.data.path().join("pdfs").join(name).exists());
}

#[test]
fn encrypted_database_needs_the_password() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd()
        .args(["student", "add", "Ana", "Ruiz"])
        .assert()
        .success();

    sb.cmd()
        .args(["--password", "s3cret", "crypt", "enable"])
        .assert()
        .success();
    assert!(sb.data.path().join(".encryption_enabled").exists());

    sb.cmd()
        .args(["--password", "wrong", "student", "list"])
        .assert()
        .failure()
        .stderr(contains("Wrong password"));

    sb.cmd()
        .args(["student", "list"])
        .env("SCHOOLDESK_PASSWORD", "s3cret")
        .assert()
        .success()
        .stdout(contains("Ruiz"));

    sb.cmd()
        .args(["--password", "s3cret", "crypt", "disable"])
        .assert()
        .success();
    sb.cmd()
        .args(["student", "list"])
        .assert()
        .success()
        .stdout(contains("Ruiz"));
}

#[test]
fn lost_sentinel_is_restored_by_crypt_enable() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd().args(["center", "add", "North"]).assert().success();
    sb.cmd()
        .args(["--password", "pw", "crypt", "enable"])
        .assert()
        .success();

    let sentinel = sb.data.path().join(".encryption_enabled");
    fs::remove_file(&sentinel).unwrap();

    sb.cmd()
        .args(["center", "list"])
        .assert()
        .failure()
        .stderr(contains("crypt enable"));

    sb.cmd()
        .args(["--password", "nope", "crypt", "enable"])
        .assert()
        .failure()
        .stderr(contains("Wrong password"));
    assert!(!sentinel.exists());

    sb.cmd()
        .args(["--password", "pw", "crypt", "enable"])
        .assert()
        .success()
        .stdout(contains("sentinel restored"));
    assert!(sentinel.exists());

    sb.cmd()
        .args(["--password", "pw", "center", "list"])
        .assert()
        .success()
        .stdout(contains("North"));
}

#[test]
fn lost_sentinel_can_be_decrypted_directly() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd().args(["center", "add", "North"]).assert().success();
    sb.cmd()
        .args(["--password", "pw", "crypt", "enable"])
        .assert()
        .success();
    fs::remove_file(sb.data.path().join(".encryption_enabled")).unwrap();

    sb.cmd()
        .args(["--password", "pw", "crypt", "disable"])
        .assert()
        .success();

    sb.cmd()
        .args(["center", "list"])
        .assert()
        .success()
        .stdout(contains("North"));
}

#[test]
fn backups_are_created_and_listed() {
    let sb = Sandbox::new();
    sb.init();

    sb.cmd()
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    sb.cmd()
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(contains("schooldesk_backup_"));

    // Every database command leaves a startup copy behind.
    sb.cmd()
        .args(["backup", "rotated"])
        .assert()
        .success()
        .stdout(contains(".db"));
}

#[test]
fn sync_interval_below_minimum_is_rejected() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["sync", "config", "--interval", "30"])
        .current_dir(sb.data.path())
        .assert()
        .failure()
        .stderr(contains("at least 60"));

    sb.cmd()
        .args(["sync", "config", "--protocol", "smb", "--interval", "120"])
        .current_dir(sb.data.path())
        .assert()
        .success()
        .stdout(contains("saved"));

    let saved = std::fs::read_to_string(sb.data.path().join("sync_config.json")).unwrap();
    assert!(saved.contains("\"protocol\": \"smb\""));
    assert!(saved.contains("\"polling_interval\": 120"));
}

#[test]
fn student_placed_in_classroom_inherits_its_center() {
    let sb = Sandbox::new();
    sb.init();

    sb.cmd().args(["center", "add", "North"]).assert().success();
    sb.cmd().args(["center", "add", "South"]).assert().success();
    sb.cmd()
        .args(["classroom", "add", "2B", "--center", "2"])
        .assert()
        .success();
    sb.cmd()
        .args(["student", "add", "Leo", "Sanz", "--classroom", "1"])
        .assert()
        .success();

    sb.cmd()
        .args(["student", "list", "--center", "2"])
        .assert()
        .success()
        .stdout(contains("Sanz"));
    sb.cmd()
        .args(["student", "list", "--center", "1"])
        .assert()
        .success()
        .stdout(contains("No students found"));
}
