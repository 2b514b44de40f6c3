//! socket.io event channel to a sync receiver.
//!
//! The client joins `namespace` on `server_url`. The server asks for a
//! snapshot with `sync_request`; the client answers with
//! `sync_data { data: <hex of the archive> }` and waits for
//! `sync_complete { status, timestamp?, message? }`.

use crate::errors::{AppError, AppResult};
use crate::sync::config::EventChannelConfig;
use crate::sync::transport::{NETWORK_TIMEOUT, Transport, UploadReport};
use reqwest::Url;
use rust_socketio::client::Client;
use rust_socketio::{ClientBuilder, Payload, RawClient};
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tracing::debug;

pub const SYNC_REQUEST: &str = "sync_request";
pub const SYNC_DATA: &str = "sync_data";
pub const SYNC_COMPLETE: &str = "sync_complete";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SyncComplete {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Entry count, for receivers that report one.
    #[serde(default)]
    pub files: Option<usize>,
}

impl SyncComplete {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The first argument of a `sync_complete` event. Anything unreadable
    /// counts as a failed sync.
    pub fn from_payload(payload: &Payload) -> Self {
        let parsed = match payload {
            Payload::Text(values) => values
                .first()
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok()),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self {
            status: "error".into(),
            timestamp: None,
            message: Some("unreadable acknowledgment".into()),
            files: None,
        })
    }
}

#[derive(Debug)]
enum Incoming {
    SyncRequest,
    Complete(SyncComplete),
    Closed(String),
}

struct Session {
    client: Client,
    events: Receiver<Incoming>,
}

pub struct EventChannel {
    config: EventChannelConfig,
    session: Option<Session>,
}

/// Callback that turns a socket.io event into an [`Incoming`] message.
fn forward(
    tx: &Sender<Incoming>,
    make: impl Fn(Payload) -> Incoming + Send + 'static,
) -> impl FnMut(Payload, RawClient) + Send + 'static {
    let tx = tx.clone();
    move |payload, _socket| {
        let _ = tx.send(make(payload));
    }
}

impl EventChannel {
    pub fn new(config: EventChannelConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn open(&self) -> AppResult<Session> {
        let (tx, events) = mpsc::channel();
        let client = ClientBuilder::new(self.config.server_url.as_str())
            .namespace(self.config.namespace.as_str())
            .on(SYNC_REQUEST, forward(&tx, |_| Incoming::SyncRequest))
            .on(
                SYNC_COMPLETE,
                forward(&tx, |p| Incoming::Complete(SyncComplete::from_payload(&p))),
            )
            .on(
                "close",
                forward(&tx, |_| Incoming::Closed("connection closed by server".into())),
            )
            .on(
                "error",
                forward(&tx, |p| Incoming::Closed(format!("socket.io error: {p:?}"))),
            )
            .connect()?;
        Ok(Session { client, events })
    }

    pub fn connect(&mut self) -> AppResult<()> {
        let session = self.open()?;
        debug!(url = %self.config.server_url, namespace = %self.config.namespace, "event channel connected");
        self.session = Some(session);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(s) = self.session.take() {
            let _ = s.client.disconnect();
        }
    }

    fn next_event(&mut self, timeout: Duration) -> AppResult<Option<Incoming>> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AppError::Sync("event channel not connected".into()))?;

        match session.events.recv_timeout(timeout) {
            Ok(Incoming::Closed(reason)) => {
                self.disconnect();
                Err(AppError::Sync(reason))
            }
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                self.disconnect();
                Err(AppError::Sync("event channel closed".into()))
            }
        }
    }

    /// True when the server asked for a sync within `timeout`.
    pub fn poll_request(&mut self, timeout: Duration) -> AppResult<bool> {
        Ok(matches!(self.next_event(timeout)?, Some(Incoming::SyncRequest)))
    }

    fn wait_for_ack(&mut self) -> AppResult<SyncComplete> {
        let deadline = Instant::now() + NETWORK_TIMEOUT;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return Err(AppError::Sync("no acknowledgment from server".into()));
            }
            // Requests that arrive while we upload are answered by this upload.
            if let Some(Incoming::Complete(ack)) = self.next_event(left)? {
                return Ok(ack);
            }
        }
    }

    fn remote(&self) -> String {
        format!(
            "{}{}",
            self.config.server_url.trim_end_matches('/'),
            self.config.namespace
        )
    }
}

impl Transport for EventChannel {
    fn name(&self) -> &'static str {
        "socketio"
    }

    fn is_available(&self) -> bool {
        Url::parse(&self.config.server_url).is_ok_and(|u| {
            matches!(u.scheme(), "http" | "https" | "ws" | "wss") && u.host_str().is_some()
        })
    }

    fn check(&mut self) -> AppResult<String> {
        let session = self.open()?;
        let _ = session.client.disconnect();
        Ok(format!("socket.io server reachable at {}", self.remote()))
    }

    fn upload(&mut self, name: &str, archive: &Path) -> AppResult<UploadReport> {
        if self.session.is_none() {
            self.connect()?;
        }

        let data = hex::encode(fs::read(archive)?);
        let sent = match &self.session {
            Some(s) => s
                .client
                .emit(SYNC_DATA, json!({ "data": data, "filename": name })),
            None => return Err(AppError::Sync("event channel not connected".into())),
        };
        if let Err(e) = sent {
            self.disconnect();
            return Err(e.into());
        }

        let ack = self.wait_for_ack()?;
        if !ack.is_success() {
            return Err(AppError::Sync(format!(
                "server rejected {name}: {}",
                ack.message.unwrap_or_else(|| "unknown error".into())
            )));
        }

        Ok(UploadReport {
            remote: self.remote(),
            files: ack.files,
        })
    }
}
