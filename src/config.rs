//! Configuration for the installer coordinator

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Installer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Base app storage directory. Download destinations are resolved
    /// relative to this directory.
    #[serde(default = "default_files_dir")]
    pub files_dir: PathBuf,

    /// How long a `pollEvent` RPC call waits for an event before
    /// returning empty, in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_seconds: u64,
}

fn default_files_dir() -> PathBuf {
    std::env::temp_dir().join("apk-installer")
}

fn default_poll_timeout() -> u64 {
    30
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            files_dir: default_files_dir(),
            poll_timeout_seconds: default_poll_timeout(),
        }
    }
}

impl InstallerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base app storage directory
    pub fn with_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.files_dir = dir.into();
        self
    }

    /// Set the long-poll timeout in seconds
    pub fn with_poll_timeout(mut self, seconds: u64) -> Self {
        self.poll_timeout_seconds = seconds;
        self
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - INSTALLER_FILES_DIR: base app storage directory
    /// - INSTALLER_POLL_TIMEOUT: long-poll timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("INSTALLER_FILES_DIR") {
            if !dir.is_empty() {
                config.files_dir = PathBuf::from(dir);
            }
        }

        if let Ok(timeout) = std::env::var("INSTALLER_POLL_TIMEOUT") {
            if let Ok(timeout_secs) = timeout.parse() {
                config.poll_timeout_seconds = timeout_secs;
            }
        }

        config
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize configuration to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstallerConfig::default();
        assert_eq!(config.files_dir, std::env::temp_dir().join("apk-installer"));
        assert_eq!(config.poll_timeout_seconds, 30);
    }

    #[test]
    fn test_builder_pattern() {
        let config = InstallerConfig::new()
            .with_files_dir("/data/app/files")
            .with_poll_timeout(5);

        assert_eq!(config.files_dir, PathBuf::from("/data/app/files"));
        assert_eq!(config.poll_timeout_seconds, 5);
    }

    #[test]
    fn test_json_round_trip() {
        let config = InstallerConfig::new().with_files_dir("/data/app/files");
        let json = config.to_json().unwrap();
        let deserialized = InstallerConfig::from_json(&json).unwrap();

        assert_eq!(config.files_dir, deserialized.files_dir);
        assert_eq!(
            config.poll_timeout_seconds,
            deserialized.poll_timeout_seconds
        );
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let config = InstallerConfig::from_json("{}").unwrap();
        assert_eq!(config.poll_timeout_seconds, 30);
    }

    #[test]
    fn test_from_json_with_files_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let json = format!(
            "{{\"files_dir\": {}}}",
            serde_json::to_string(temp_dir.path()).unwrap()
        );
        let config = InstallerConfig::from_json(&json).unwrap();
        assert_eq!(config.files_dir, temp_dir.path());
    }
}
