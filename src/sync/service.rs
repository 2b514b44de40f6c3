//! Background sync worker.
//!
//! `Stopped -> start() -> Running -> stop() -> Stopped`. One attempt builds
//! a snapshot in a temporary file, hands it to the transport and deletes it.

use crate::context::AppContext;
use crate::core::snapshot;
use crate::crypto::cipher;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::sync::config::{Protocol, SyncConfig};
use crate::sync::event_channel::EventChannel;
use crate::sync::log::SyncLog;
use crate::sync::transport::{self, Transport, UploadReport};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::warn;

const SLEEP_SLICE: Duration = Duration::from_millis(250);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Stopped,
    Running,
}

/// State shared between the foreground and the worker thread.
#[derive(Debug, Default)]
pub struct SyncShared {
    running: AtomicBool,
    last_success: Mutex<Option<DateTime<Local>>>,
    pub log: SyncLog,
}

impl SyncShared {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn last_success(&self) -> Option<DateTime<Local>> {
        *self.last_success.lock()
    }

    /// Sleep for `total`, returning early once stopped.
    fn sleep(&self, total: Duration) {
        let until = Instant::now() + total;
        while self.is_running() {
            let left = until.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            thread::sleep(left.min(SLEEP_SLICE));
        }
    }
}

/// Remote file name of the snapshot.
pub fn archive_name(ctx: &AppContext) -> String {
    format!("{}_sync.zip", ctx.db_stem())
}

/// With encryption enabled the file must be encrypted at rest before it
/// leaves the machine.
fn ensure_at_rest_encryption(ctx: &AppContext) -> AppResult<()> {
    if !ctx.encryption_enabled() {
        return Ok(());
    }
    let _guard = ctx.lock_db();
    let path = ctx.db_path();
    if !path.exists() || cipher::is_encrypted(path) {
        return Ok(());
    }
    let password = ctx.password().ok_or_else(|| {
        AppError::Sync("database is not encrypted and no password is available".into())
    })?;
    cipher::encrypt_file(path, &password)
}

fn record(ctx: &AppContext, target: &str, message: &str) {
    let result = DbPool::open(ctx).and_then(|pool| {
        ttlog(&pool.conn, "sync", target, message)?;
        pool.close()
    });
    if let Err(e) = result {
        warn!(error = %e, "cannot record sync attempt in the log table");
    }
}

/// One sync attempt. Errors are returned to the caller; the temporary
/// archive is removed in every case.
pub fn attempt(
    ctx: &AppContext,
    transport: &mut dyn Transport,
    shared: &SyncShared,
) -> AppResult<UploadReport> {
    let result = (|| {
        ensure_at_rest_encryption(ctx)?;

        let tmp = tempfile::Builder::new()
            .prefix("schooldesk-sync-")
            .suffix(".zip")
            .tempfile()?;
        let entries = snapshot::write(ctx, tmp.path())?;
        shared.log.push(format!("snapshot built with {entries} file(s)"));

        transport.upload(&archive_name(ctx), tmp.path())
    })();

    match &result {
        Ok(report) => {
            *shared.last_success.lock() = Some(Local::now());
            shared
                .log
                .push(format!("{} upload done: {}", transport.name(), report.remote));
            record(ctx, transport.name(), &format!("uploaded to {}", report.remote));
        }
        Err(e) => {
            shared.log.push(format!("{} sync failed: {e}", transport.name()));
            record(ctx, transport.name(), &format!("failed: {e}"));
        }
    }
    result
}

fn polling_loop(
    ctx: Arc<AppContext>,
    shared: Arc<SyncShared>,
    mut transport: Box<dyn Transport>,
    interval: Duration,
) {
    // The first attempt runs even if stop() races the spawn.
    loop {
        let _ = attempt(&ctx, transport.as_mut(), &shared);
        shared.sleep(interval);
        if !shared.is_running() {
            break;
        }
    }
}

fn event_loop(ctx: Arc<AppContext>, shared: Arc<SyncShared>, mut channel: EventChannel) {
    while shared.is_running() {
        if !channel.is_connected() {
            match channel.connect() {
                Ok(()) => {
                    shared.log.push("connected to sync server");
                    let _ = attempt(&ctx, &mut channel, &shared);
                }
                Err(e) => {
                    shared.log.push(format!("connection failed: {e}"));
                    shared.sleep(RECONNECT_DELAY);
                    continue;
                }
            }
        }

        match channel.poll_request(Duration::from_secs(1)) {
            Ok(true) => {
                shared.log.push("sync requested by server");
                let _ = attempt(&ctx, &mut channel, &shared);
            }
            Ok(false) => {}
            Err(e) => {
                shared.log.push(format!("disconnected: {e}"));
                channel.disconnect();
            }
        }
    }
    channel.disconnect();
}

pub struct SyncService {
    ctx: Arc<AppContext>,
    config: SyncConfig,
    shared: Arc<SyncShared>,
    handle: Option<JoinHandle<()>>,
}

impl SyncService {
    pub fn new(ctx: Arc<AppContext>, config: SyncConfig) -> Self {
        Self {
            ctx,
            config,
            shared: Arc::new(SyncShared::default()),
            handle: None,
        }
    }

    pub fn shared(&self) -> Arc<SyncShared> {
        Arc::clone(&self.shared)
    }

    pub fn state(&self) -> SyncState {
        if self.shared.is_running() {
            SyncState::Running
        } else {
            SyncState::Stopped
        }
    }

    fn available_transport(&self) -> AppResult<Box<dyn Transport>> {
        let t = transport::build(&self.config)?;
        if !t.is_available() {
            return Err(AppError::TransportUnavailable(
                self.config.protocol.as_str().to_string(),
            ));
        }
        Ok(t)
    }

    /// Spawn the worker. Refused when sync is disabled, already running or
    /// the transport is unusable.
    pub fn start(&mut self) -> AppResult<()> {
        if !self.config.enabled {
            return Err(AppError::Sync("sync is disabled in the configuration".into()));
        }
        if self.state() == SyncState::Running {
            return Err(AppError::Sync("sync is already running".into()));
        }
        self.config.validate()?;
        let transport = self.available_transport()?;

        self.shared.running.store(true, Ordering::SeqCst);
        self.shared
            .log
            .push(format!("sync started ({})", self.config.protocol.as_str()));

        let ctx = Arc::clone(&self.ctx);
        let shared = Arc::clone(&self.shared);
        let handle = if self.config.protocol == Protocol::Socketio {
            let channel = EventChannel::new(self.config.socketio.clone());
            thread::spawn(move || event_loop(ctx, shared, channel))
        } else {
            let interval = Duration::from_secs(self.config.polling_interval);
            thread::spawn(move || polling_loop(ctx, shared, transport, interval))
        };
        self.handle = Some(handle);
        Ok(())
    }

    /// Clear the running flag and wait for the worker. An upload in flight
    /// finishes (bounded by the network timeout) before this returns.
    pub fn stop(&mut self) {
        let was_running = self.shared.running.swap(false, Ordering::SeqCst);
        if let Some(h) = self.handle.take()
            && h.join().is_err()
        {
            warn!("sync worker panicked");
        }
        if was_running {
            self.shared.log.push("sync stopped");
        }
    }

    /// One attempt on the calling thread.
    pub fn sync_now(&self) -> AppResult<UploadReport> {
        let mut transport = self.available_transport()?;
        attempt(&self.ctx, transport.as_mut(), &self.shared)
    }

    /// Reachability test of the configured transport.
    pub fn test_connection(&self) -> AppResult<String> {
        transport::build(&self.config)?.check()
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::config::SmbConfig;

    fn smb_ctx() -> (tempfile::TempDir, tempfile::TempDir, Arc<AppContext>, SyncConfig) {
        let data = tempfile::tempdir().unwrap();
        let share = tempfile::tempdir().unwrap();
        let ctx = Arc::new(AppContext::in_dir(data.path()));
        ctx.ensure_layout().unwrap();
        let config = SyncConfig {
            enabled: true,
            protocol: Protocol::Smb,
            polling_interval: 60,
            smb: SmbConfig {
                mount_point: Some(share.path().display().to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        (data, share, ctx, config)
    }

    #[test]
    fn disabled_sync_does_not_start() {
        let (_d, _s, ctx, mut config) = smb_ctx();
        config.enabled = false;
        let mut svc = SyncService::new(ctx, config);
        assert!(svc.start().is_err());
        assert_eq!(svc.state(), SyncState::Stopped);
    }

    #[test]
    fn unavailable_transport_is_rejected_at_start() {
        let (_d, _s, ctx, mut config) = smb_ctx();
        config.smb.mount_point = Some("/no/such/share".into());
        let mut svc = SyncService::new(ctx, config);
        assert!(matches!(svc.start(), Err(AppError::TransportUnavailable(_))));
    }

    #[test]
    fn start_then_stop_returns_to_stopped() {
        let (_d, share, ctx, config) = smb_ctx();
        let mut svc = SyncService::new(ctx, config);

        svc.start().unwrap();
        assert_eq!(svc.state(), SyncState::Running);
        svc.stop();
        assert_eq!(svc.state(), SyncState::Stopped);

        let uploaded = share.path().join("schooldesk_sync").join("schooldesk_sync.zip");
        assert!(uploaded.exists());
        assert!(svc.shared().last_success().is_some());
    }

    #[test]
    fn failed_attempt_keeps_last_success_empty() {
        let (_d, _s, ctx, config) = smb_ctx();
        rusqlite::Connection::open(ctx.db_path())
            .unwrap()
            .execute_batch("CREATE TABLE t (v INTEGER);")
            .unwrap();
        crate::crypto::sentinel::mark_enabled(ctx.data_dir()).unwrap();

        let svc = SyncService::new(ctx, config);
        assert!(svc.sync_now().is_err());
        assert!(svc.shared().last_success().is_none());
    }
}
