//! One-way push of a zipped snapshot of the data directory.

pub mod config;
pub mod event_channel;
pub mod log;
pub mod service;
pub mod smb;
pub mod transport;
pub mod webdav;

pub use config::{Protocol, SyncConfig};
pub use service::{SyncService, SyncState};
pub use transport::{Transport, UploadReport};
