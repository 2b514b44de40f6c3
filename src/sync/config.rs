//! Sync settings, stored as JSON next to the data.

use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SYNC_CONFIG_FILE: &str = "sync_config.json";
pub const MIN_POLLING_INTERVAL: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Webdav,
    Smb,
    /// socket.io event channel.
    Socketio,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Webdav => "webdav",
            Protocol::Smb => "smb",
            Protocol::Socketio => "socketio",
        }
    }

    /// Polling transports are driven by the timer; the event channel by
    /// server requests.
    pub fn is_polling(&self) -> bool {
        !matches!(self, Protocol::Socketio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDavConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub remote_path: String,
}

impl Default for WebDavConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            remote_path: "/schooldesk_sync/".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmbConfig {
    pub server: String,
    pub share_name: String,
    pub remote_path: String,
    /// Local path where the share is mounted with the OS credentials.
    /// Without it the UNC path `\\server\share_name` is used (Windows only).
    pub mount_point: Option<String>,
}

impl Default for SmbConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            share_name: String::new(),
            remote_path: "/schooldesk_sync/".into(),
            mount_point: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventChannelConfig {
    pub server_url: String,
    pub namespace: String,
}

impl Default for EventChannelConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".into(),
            namespace: "/schooldesk-sync/".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    pub protocol: Protocol,
    pub polling_interval: u64,
    pub webdav: WebDavConfig,
    pub smb: SmbConfig,
    pub socketio: EventChannelConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            protocol: Protocol::Webdav,
            polling_interval: 300,
            webdav: WebDavConfig::default(),
            smb: SmbConfig::default(),
            socketio: EventChannelConfig::default(),
        }
    }
}

impl SyncConfig {
    /// `./sync_config.json` when present, otherwise the one in the data dir.
    pub fn path(ctx: &AppContext) -> PathBuf {
        let local = PathBuf::from(SYNC_CONFIG_FILE);
        if local.is_file() {
            return local;
        }
        ctx.data_dir().join(SYNC_CONFIG_FILE)
    }

    /// Missing file gives the defaults; missing keys fall back one by one.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.polling_interval < MIN_POLLING_INTERVAL {
            return Err(AppError::Validation(format!(
                "polling interval must be at least {MIN_POLLING_INTERVAL} seconds"
            )));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let cfg: SyncConfig =
            serde_json::from_str(r#"{"enabled": true, "webdav": {"url": "https://dav"}}"#).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.polling_interval, 300);
        assert_eq!(cfg.webdav.url, "https://dav");
        assert_eq!(cfg.webdav.remote_path, "/schooldesk_sync/");
        assert_eq!(cfg.socketio.namespace, "/schooldesk-sync/");
    }

    #[test]
    fn old_smb_credential_keys_are_ignored() {
        let cfg: SyncConfig = serde_json::from_str(
            r#"{"protocol": "smb", "smb": {"server": "nas", "share_name": "school",
                "username": "admin", "password": "secret", "domain": "WORKGROUP",
                "mount_point": "/mnt/school"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.protocol, Protocol::Smb);
        assert_eq!(cfg.smb.mount_point.as_deref(), Some("/mnt/school"));

        let saved = serde_json::to_string(&cfg).unwrap();
        assert!(!saved.contains("secret"));
        assert!(!saved.contains("admin"));
    }

    #[test]
    fn short_interval_is_rejected_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SYNC_CONFIG_FILE);
        let cfg = SyncConfig {
            polling_interval: 59,
            ..Default::default()
        };
        assert!(matches!(cfg.save(&path), Err(AppError::Validation(_))));
        assert!(!path.exists());
    }

    #[test]
    fn protocol_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Protocol::Socketio).unwrap(), "\"socketio\"");
    }
}
