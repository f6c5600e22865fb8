//! Typed views over request argument bags
//!
//! Requests arrive as loose JSON bags. These structs give each flow a
//! typed view with the documented defaults; absent or wrong-typed bags
//! fall back to defaults rather than erroring the boundary.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Arguments for `installApk`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallApkParams {
    pub file_path: String,
}

/// Arguments for `downloadAndInstallApk`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadAndInstallParams {
    pub file_url: String,
    /// Subdirectory under the base app storage directory
    pub file_directory: String,
    pub file_name: String,
    #[serde(default = "default_true")]
    pub is_delete_original_file: bool,
}

impl Default for DownloadAndInstallParams {
    fn default() -> Self {
        Self {
            file_url: String::new(),
            file_directory: String::new(),
            file_name: String::new(),
            is_delete_original_file: true,
        }
    }
}

/// Arguments for `cancelDownload`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CancelDownloadParams {
    pub cancel_tag: String,
}

/// Arguments for `openAppMarket`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAppMarketParams {
    pub target_market_package_name: String,
    #[serde(default = "default_true")]
    pub is_open_system_market: bool,
}

impl Default for OpenAppMarketParams {
    fn default() -> Self {
        Self {
            target_market_package_name: String::new(),
            is_open_system_market: true,
        }
    }
}
