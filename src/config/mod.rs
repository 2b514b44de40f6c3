use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "schooldesk.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the database, backups, documents and generated PDFs.
    pub data_dir: String,
    /// Database file name (relative to `data_dir`) or absolute path.
    #[serde(default = "default_database")]
    pub database: String,
    /// Attempts granted to the unlock prompt before giving up.
    #[serde(default = "default_unlock_attempts")]
    pub unlock_attempts: u32,
}

fn default_database() -> String {
    DB_FILE_NAME.to_string()
}
fn default_unlock_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir().to_string_lossy().to_string(),
            database: default_database(),
            unlock_attempts: default_unlock_attempts(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("schooldesk")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".schooldesk")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("schooldesk.conf")
    }

    /// Default data directory: the config directory itself.
    pub fn default_data_dir() -> PathBuf {
        Self::config_dir()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write the configuration file, creating its directory if needed.
    pub fn save(&self) -> AppResult<PathBuf> {
        let path = Self::config_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }

    /// Resolved data directory (with `~/` expanded).
    pub fn data_dir_path(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    /// Resolved database path.
    pub fn database_path(&self) -> PathBuf {
        let p = expand_tilde(&self.database);
        if p.is_absolute() {
            p
        } else {
            self.data_dir_path().join(p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_database_lives_in_data_dir() {
        let cfg = Config {
            data_dir: "/srv/school".into(),
            database: "main.db".into(),
            unlock_attempts: 3,
        };
        assert_eq!(cfg.database_path(), PathBuf::from("/srv/school/main.db"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("data_dir: /tmp/x\n").unwrap();
        assert_eq!(cfg.database, DB_FILE_NAME);
        assert_eq!(cfg.unlock_attempts, 3);
    }
}
