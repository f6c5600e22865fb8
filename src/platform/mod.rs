//! Platform services seam
//!
//! Everything that actually touches the device lives behind the
//! [`PlatformServices`] trait: HTTP download, file placement, package
//! install invocation, permission prompts, and market intents. The
//! coordinator only ever sees the trait and the [`TaskEvent`] stream a
//! flow emits while it runs.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Distinguished failure message meaning the OS is showing an
/// install-permission prompt. Not a terminal failure: the flow is paused
/// until the host regains foreground and replays it.
pub const OPEN_INSTALL_PACKAGE_PERMISSION: &str = "OPEN_INSTALL_PACKAGE_PERMISSION";

/// Events emitted by an in-flight platform install or download flow
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// The flow started. Download flows attach the tag a caller must
    /// present to `cancelDownload`; plain installs attach nothing.
    Started { cancel_tag: Option<String> },
    /// Download progress as a fraction in 0.0..=1.0. Only download flows
    /// emit this.
    Progress(f32),
    /// The APK was installed; carries its final path.
    Succeeded(PathBuf),
    /// The flow failed with a free-text message, or paused on the
    /// [`OPEN_INSTALL_PACKAGE_PERMISSION`] sentinel.
    Failed(String),
}

/// Sender half handed to a platform flow for event delivery
pub type TaskEventSender = mpsc::UnboundedSender<TaskEvent>;

/// A resolved download-and-install request
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    /// Source URL of the APK
    pub file_url: String,
    /// Destination directory (base storage dir + request subdirectory)
    pub dest_dir: PathBuf,
    /// Destination file name
    pub file_name: String,
    /// Whether to delete the downloaded APK once installed
    pub delete_original_after_install: bool,
}

/// Platform services trait - the device-side collaborator
///
/// Implementations start their work and return immediately; outcomes and
/// progress arrive through the event sender. An `Err` return means the
/// flow could not start at all.
#[async_trait]
pub trait PlatformServices: Send + Sync {
    /// Human-readable platform version string (e.g. "Android 14")
    fn platform_version(&self) -> String;

    /// Install a local APK file
    async fn install_apk(&self, apk_path: &Path, events: TaskEventSender) -> Result<()>;

    /// Download an APK and install it once the download completes
    async fn download_and_install(
        &self,
        request: DownloadRequest,
        events: TaskEventSender,
    ) -> Result<()>;

    /// Cancel the download identified by `cancel_tag`. Fire-and-forget:
    /// callers get no confirmation that anything was actually cancelled.
    async fn cancel_download(&self, cancel_tag: &str);

    /// Open an app market page for this app. Returns whether a market
    /// could be opened.
    async fn open_market(&self, target_package_name: &str, open_system_market: bool) -> bool;
}
