//! One upload capability, three backends.

use crate::errors::AppResult;
use crate::sync::config::{Protocol, SyncConfig};
use crate::sync::event_channel::EventChannel;
use crate::sync::smb::SmbShare;
use crate::sync::webdav::WebDav;
use std::path::Path;
use std::time::Duration;

/// Upper bound for every network call made by a transport.
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    /// Where the archive ended up, as the transport names it.
    pub remote: String,
    /// Entry count confirmed by the receiver, when it reports one.
    pub files: Option<usize>,
}

pub trait Transport: Send {
    fn name(&self) -> &'static str;

    /// Cheap local check that the backend is usable with its settings.
    fn is_available(&self) -> bool;

    /// Reachability test. Returns a short human-readable description.
    fn check(&mut self) -> AppResult<String>;

    /// Push the archive at `archive` to the remote side as `name`.
    fn upload(&mut self, name: &str, archive: &Path) -> AppResult<UploadReport>;
}

pub fn build(config: &SyncConfig) -> AppResult<Box<dyn Transport>> {
    Ok(match config.protocol {
        Protocol::Webdav => Box::new(WebDav::new(config.webdav.clone())?),
        Protocol::Smb => Box::new(SmbShare::new(config.smb.clone())),
        Protocol::Socketio => Box::new(EventChannel::new(config.socketio.clone())),
    })
}
