use schooldesk::core::snapshot;
use schooldesk::sync::config::{
    EventChannelConfig, Protocol, SmbConfig, SyncConfig, WebDavConfig,
};
use schooldesk::sync::service::SyncService;
use std::fs;
use std::sync::Arc;

mod common;
use common::{DavStub, fresh_ctx};

#[test]
fn snapshot_holds_database_and_documents() {
    let (dir, ctx) = fresh_ctx();
    fs::write(ctx.documents_dir().join("plan.docx"), b"plan").unwrap();
    fs::write(ctx.documents_dir().join("menu.pdf"), b"menu").unwrap();

    let out = dir.path().join("snap.zip");
    assert_eq!(snapshot::write(&ctx, &out).unwrap(), 3);

    let mut entries = snapshot::entries(&out).unwrap();
    entries.sort();
    assert_eq!(
        entries,
        vec!["documents/menu.pdf", "documents/plan.docx", "schooldesk.db"]
    );
}

#[test]
fn snapshot_restore_overwrites_local_files() {
    let (dir, ctx) = fresh_ctx();
    let doc = ctx.documents_dir().join("plan.docx");
    fs::write(&doc, b"v1").unwrap();

    let out = dir.path().join("snap.zip");
    snapshot::write(&ctx, &out).unwrap();
    fs::write(&doc, b"v2").unwrap();

    assert_eq!(snapshot::restore(&ctx, &out).unwrap(), 2);
    assert_eq!(fs::read(&doc).unwrap(), b"v1");
}

#[test]
fn smb_mount_receives_the_snapshot() {
    let (_dir, ctx) = fresh_ctx();
    let share = tempfile::tempdir().unwrap();

    let config = SyncConfig {
        enabled: true,
        protocol: Protocol::Smb,
        smb: SmbConfig {
            mount_point: Some(share.path().display().to_string()),
            remote_path: "/school/".into(),
            ..Default::default()
        },
        ..Default::default()
    };

    let service = SyncService::new(Arc::new(ctx), config);
    let report = service.sync_now().unwrap();

    let uploaded = share.path().join("school").join("schooldesk_sync.zip");
    assert!(uploaded.exists());
    assert_eq!(report.remote, uploaded.display().to_string());
    assert!(service.shared().last_success().is_some());
}

#[test]
fn webdav_creates_collection_then_puts_archive() {
    let (_dir, ctx) = fresh_ctx();
    let dav = DavStub::start(|method| if method == "MKCOL" { 405 } else { 201 });

    let config = SyncConfig {
        enabled: true,
        protocol: Protocol::Webdav,
        webdav: WebDavConfig {
            url: dav.url.clone(),
            username: "teacher".into(),
            password: "pw".into(),
            remote_path: "/school/backups/".into(),
        },
        ..Default::default()
    };

    let service = SyncService::new(Arc::new(ctx), config);
    let report = service.sync_now().unwrap();

    let seen = dav.requests();
    let methods: Vec<&str> = seen.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, ["MKCOL", "PUT"]);
    assert_eq!(seen[0].path, "/school/backups/");
    assert_eq!(seen[1].path, "/school/backups/schooldesk_sync.zip");
    for r in &seen {
        assert_eq!(r.authorization.as_deref(), Some("Basic dGVhY2hlcjpwdw=="));
    }
    assert!(seen[1].body.starts_with(b"PK"));

    assert_eq!(
        report.remote,
        format!("{}/school/backups/schooldesk_sync.zip", dav.url)
    );
    assert!(service.shared().last_success().is_some());
}

#[test]
fn webdav_put_error_is_reported() {
    let (_dir, ctx) = fresh_ctx();
    let dav = DavStub::start(|method| if method == "PUT" { 500 } else { 201 });

    let config = SyncConfig {
        enabled: true,
        protocol: Protocol::Webdav,
        webdav: WebDavConfig {
            url: dav.url.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    let service = SyncService::new(Arc::new(ctx), config);
    let err = service.sync_now().unwrap_err();
    assert!(err.to_string().contains("500"), "{err}");
    assert!(service.shared().last_success().is_none());

    let seen = dav.requests();
    assert_eq!(seen.last().map(|r| r.method.as_str()), Some("PUT"));
    assert!(seen.iter().all(|r| r.authorization.is_none()));
}

#[test]
fn unreachable_event_server_fails_without_recording_success() {
    let (_dir, ctx) = fresh_ctx();
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let config = SyncConfig {
        enabled: true,
        protocol: Protocol::Socketio,
        socketio: EventChannelConfig {
            server_url: format!("http://127.0.0.1:{port}"),
            ..Default::default()
        },
        ..Default::default()
    };

    let service = SyncService::new(Arc::new(ctx), config);
    assert!(service.sync_now().is_err());
    assert!(service.shared().last_success().is_none());
    assert!(!service.shared().log.is_empty());
}
