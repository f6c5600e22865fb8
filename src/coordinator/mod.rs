//! Install coordinator
//!
//! Sits between the RPC method surface and the platform services seam.
//! Each accepted request stores its argument bag and a one-shot responder
//! in the session, invokes the platform, and resolves the responder from
//! the platform's event stream. A flow parked behind the OS
//! install-permission prompt keeps its responder armed until
//! [`InstallCoordinator::notify_foreground_regained`] replays it.

mod params;
mod session;

pub use params::{
    CancelDownloadParams, DownloadAndInstallParams, InstallApkParams, OpenAppMarketParams,
};
pub use session::{InstallOperation, InstallSession};

use crate::config::InstallerConfig;
use crate::platform::{
    DownloadRequest, PlatformServices, TaskEvent, OPEN_INSTALL_PACKAGE_PERMISSION,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

/// Terminal outcome of one handled operation
#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutcome {
    /// Operation succeeded with a result payload
    Success(Value),
    /// Operation failed with a string code and free-text message
    Error { code: String, message: String },
    /// The operation name is not part of the surface
    NotImplemented,
}

impl MethodOutcome {
    pub fn success(value: Value) -> Self {
        Self::Success(value)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// One-shot handle used to deliver exactly one terminal outcome
pub type Responder = oneshot::Sender<MethodOutcome>;

/// Receiver half of a request's terminal outcome
pub type MethodReceiver = oneshot::Receiver<MethodOutcome>;

/// Events pushed to the host independent of any request/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "camelCase")]
pub enum ChannelEvent {
    /// Download progress fraction, forwarded verbatim from the platform
    ResultDownloadProgress(f32),
    /// Tag a caller must present to `cancelDownload`
    ResultCancelTag(String),
}

/// Coordinator bridging the method surface to platform services
pub struct InstallCoordinator {
    platform: Arc<dyn PlatformServices>,
    config: InstallerConfig,
    session: Arc<Mutex<InstallSession>>,
    events: mpsc::UnboundedSender<ChannelEvent>,
}

impl InstallCoordinator {
    /// Create a coordinator and the receiver for its outbound events
    pub fn new(
        platform: Arc<dyn PlatformServices>,
        config: InstallerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                platform,
                config,
                session: Arc::new(Mutex::new(InstallSession::new())),
                events,
            },
            events_rx,
        )
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// `getPlatformVersion`
    pub fn platform_version(&self) -> MethodOutcome {
        MethodOutcome::success(Value::String(self.platform.platform_version()))
    }

    /// `installApk`: validate the file path, then hand the install to the
    /// platform. The responder resolves from the platform's event stream.
    pub async fn install_apk(&self, params: Value, responder: Responder) {
        let parsed: InstallApkParams = serde_json::from_value(params.clone()).unwrap_or_default();
        if parsed.file_path.is_empty() {
            let _ = responder.send(MethodOutcome::error(
                "0",
                "installApk: file path can't be empty!",
            ));
            return;
        }

        {
            let mut session = self.session.lock().await;
            session.begin(InstallOperation::Install, params, responder);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        match self
            .platform
            .install_apk(Path::new(&parsed.file_path), tx)
            .await
        {
            Ok(()) => self.spawn_event_pump(rx),
            Err(err) => self.fail_pending(&err.message).await,
        }
    }

    /// `downloadAndInstallApk`: resolve the destination under the base
    /// storage directory and hand the flow to the platform.
    pub async fn download_and_install_apk(&self, params: Value, responder: Responder) {
        let parsed: DownloadAndInstallParams =
            serde_json::from_value(params.clone()).unwrap_or_default();

        {
            let mut session = self.session.lock().await;
            session.begin(InstallOperation::DownloadAndInstall, params, responder);
        }

        let request = DownloadRequest {
            file_url: parsed.file_url,
            dest_dir: self.config.files_dir.join(&parsed.file_directory),
            file_name: parsed.file_name,
            delete_original_after_install: parsed.is_delete_original_file,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        match self.platform.download_and_install(request, tx).await {
            Ok(()) => self.spawn_event_pump(rx),
            Err(err) => self.fail_pending(&err.message).await,
        }
    }

    /// `cancelDownload`: forward the tag and report success without
    /// waiting for confirmation.
    pub async fn cancel_download(&self, params: Value) -> MethodOutcome {
        let parsed: CancelDownloadParams = serde_json::from_value(params).unwrap_or_default();
        if parsed.cancel_tag.is_empty() {
            return MethodOutcome::error("cancelDownload", "cancelTag is must not be null!");
        }
        self.platform.cancel_download(&parsed.cancel_tag).await;
        MethodOutcome::success(Value::Bool(true))
    }

    /// `openAppMarket`
    pub async fn open_app_market(&self, params: Value) -> MethodOutcome {
        let parsed: OpenAppMarketParams = serde_json::from_value(params).unwrap_or_default();
        let opened = self
            .platform
            .open_market(
                &parsed.target_market_package_name,
                parsed.is_open_system_market,
            )
            .await;
        if opened {
            MethodOutcome::success(Value::Bool(true))
        } else {
            MethodOutcome::error("openAppMarket", "open market failed!")
        }
    }

    /// Resume trigger: the host UI surface regained foreground.
    ///
    /// Replays the parked flow with its stored argument bag and responder
    /// when a permission grant is pending; no-op otherwise. The
    /// permission flag itself only clears once the replayed flow's
    /// `Started` event arrives.
    pub async fn notify_foreground_regained(&self) {
        let replay = {
            let mut session = self.session.lock().await;
            if !session.awaiting_permission_grant {
                None
            } else {
                session.take_replay()
            }
        };

        match replay {
            Some((InstallOperation::Install, params, responder)) => {
                self.install_apk(params, responder).await
            }
            Some((InstallOperation::DownloadAndInstall, params, responder)) => {
                self.download_and_install_apk(params, responder).await
            }
            _ => {}
        }
    }

    /// Operation currently recorded in the session
    pub async fn current_operation(&self) -> InstallOperation {
        self.session.lock().await.operation
    }

    /// Whether a flow is parked behind the install-permission prompt
    pub async fn awaiting_permission_grant(&self) -> bool {
        self.session.lock().await.awaiting_permission_grant
    }

    /// Drain the platform's event stream for the in-flight flow,
    /// forwarding progress/tag events and resolving the responder on a
    /// terminal event. A permission-sentinel failure arms the resume
    /// state instead of answering.
    fn spawn_event_pump(&self, mut events: mpsc::UnboundedReceiver<TaskEvent>) {
        let session = Arc::clone(&self.session);
        let channel = self.events.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    TaskEvent::Started { cancel_tag } => {
                        if let Some(tag) = cancel_tag.filter(|tag| !tag.is_empty()) {
                            let _ = channel.send(ChannelEvent::ResultCancelTag(tag));
                        }
                        session.lock().await.awaiting_permission_grant = false;
                    }
                    TaskEvent::Progress(fraction) => {
                        let _ = channel.send(ChannelEvent::ResultDownloadProgress(fraction));
                    }
                    TaskEvent::Succeeded(path) => {
                        if let Some(responder) = session.lock().await.take_responder() {
                            let _ = responder.send(MethodOutcome::success(json!({
                                "apkPath": path.to_string_lossy()
                            })));
                        }
                        break;
                    }
                    TaskEvent::Failed(message) => {
                        if message == OPEN_INSTALL_PACKAGE_PERMISSION {
                            // not a failure: park the flow, keep the
                            // responder armed for the resume replay
                            session.lock().await.awaiting_permission_grant = true;
                        } else {
                            if let Some(responder) = session.lock().await.take_responder() {
                                let _ = responder.send(MethodOutcome::error("0", message));
                            }
                            break;
                        }
                    }
                }
            }
        });
    }

    /// The platform refused to start the flow; answer the pending
    /// responder with the refusal.
    async fn fail_pending(&self, message: &str) {
        if let Some(responder) = self.session.lock().await.take_responder() {
            let _ = responder.send(MethodOutcome::error("0", message));
        }
    }
}
