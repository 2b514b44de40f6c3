//! SMB share reached through the file system (a mount point, or the UNC
//! path on Windows).

use crate::errors::{AppError, AppResult};
use crate::sync::config::SmbConfig;
use crate::sync::transport::{Transport, UploadReport};
use std::fs;
use std::path::{Path, PathBuf};

pub struct SmbShare {
    config: SmbConfig,
}

impl SmbShare {
    pub fn new(config: SmbConfig) -> Self {
        Self { config }
    }

    /// Root of the share as seen locally.
    pub fn share_root(&self) -> Option<PathBuf> {
        if let Some(m) = self.config.mount_point.as_deref().filter(|m| !m.is_empty()) {
            return Some(crate::utils::path::expand_tilde(m));
        }
        if cfg!(windows) && !self.config.server.is_empty() && !self.config.share_name.is_empty() {
            return Some(PathBuf::from(format!(
                r"\\{}\{}",
                self.config.server, self.config.share_name
            )));
        }
        None
    }

    pub fn target_dir(&self) -> Option<PathBuf> {
        let mut dir = self.share_root()?;
        for part in self.config.remote_path.split(['/', '\\']).filter(|p| !p.is_empty()) {
            dir.push(part);
        }
        Some(dir)
    }
}

impl Transport for SmbShare {
    fn name(&self) -> &'static str {
        "smb"
    }

    fn is_available(&self) -> bool {
        self.share_root().is_some_and(|p| p.is_dir())
    }

    fn check(&mut self) -> AppResult<String> {
        match self.share_root() {
            Some(root) if root.is_dir() => Ok(format!("share reachable at {}", root.display())),
            Some(root) => Err(AppError::TransportUnavailable(format!(
                "smb: {} does not exist",
                root.display()
            ))),
            None => Err(AppError::TransportUnavailable(
                "smb: no mount point configured".into(),
            )),
        }
    }

    fn upload(&mut self, name: &str, archive: &Path) -> AppResult<UploadReport> {
        if !self.is_available() {
            return Err(AppError::TransportUnavailable("smb".into()));
        }
        let dir = self
            .target_dir()
            .ok_or_else(|| AppError::TransportUnavailable("smb".into()))?;
        fs::create_dir_all(&dir)?;

        // Copy under a temporary name so readers never see a partial archive.
        let partial = dir.join(format!("{name}.part"));
        let dest = dir.join(name);
        fs::copy(archive, &partial)?;
        fs::rename(&partial, &dest)?;

        Ok(UploadReport {
            remote: dest.display().to_string(),
            files: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_into_remote_path_under_mount_point() {
        let share = tempfile::tempdir().unwrap();
        let src = tempfile::NamedTempFile::new().unwrap();
        fs::write(src.path(), b"zip").unwrap();

        let mut smb = SmbShare::new(SmbConfig {
            mount_point: Some(share.path().display().to_string()),
            ..Default::default()
        });
        assert!(smb.is_available());

        let report = smb.upload("schooldesk_sync.zip", src.path()).unwrap();
        let expected = share.path().join("schooldesk_sync").join("schooldesk_sync.zip");
        assert_eq!(report.remote, expected.display().to_string());
        assert_eq!(fs::read(expected).unwrap(), b"zip");
    }

    #[test]
    fn missing_mount_point_is_unavailable() {
        let smb = SmbShare::new(SmbConfig {
            mount_point: Some("/definitely/not/mounted".into()),
            ..Default::default()
        });
        assert!(!smb.is_available());
    }
}
