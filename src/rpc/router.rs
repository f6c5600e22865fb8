//! Operation-name dispatch
//!
//! The router hands each named operation to its coordinator flow and
//! returns the receiver for the terminal outcome. It never panics toward
//! the boundary: unknown names get the distinguished not-implemented
//! outcome, and every flow either resolves its responder or intentionally
//! parks it behind the permission prompt.

use crate::coordinator::{InstallCoordinator, MethodOutcome, MethodReceiver};
use serde_json::Value;
use tokio::sync::oneshot;

pub async fn handle_method(
    coordinator: &InstallCoordinator,
    method: &str,
    params: Option<Value>,
) -> MethodReceiver {
    let (responder, receiver) = oneshot::channel();
    let params = params.unwrap_or(Value::Null);

    match method {
        "getPlatformVersion" => {
            let _ = responder.send(coordinator.platform_version());
        }
        "installApk" => coordinator.install_apk(params, responder).await,
        "downloadAndInstallApk" => coordinator.download_and_install_apk(params, responder).await,
        "cancelDownload" => {
            let _ = responder.send(coordinator.cancel_download(params).await);
        }
        "openAppMarket" => {
            let _ = responder.send(coordinator.open_app_market(params).await);
        }
        "notifyForegroundRegained" => {
            coordinator.notify_foreground_regained().await;
            let _ = responder.send(MethodOutcome::success(Value::Bool(true)));
        }
        _ => {
            let _ = responder.send(MethodOutcome::NotImplemented);
        }
    }

    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstallerConfig;
    use crate::coordinator::InstallOperation;
    use crate::error::Result;
    use crate::platform::{DownloadRequest, PlatformServices, TaskEventSender};
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use std::sync::Arc;

    struct IdlePlatform;

    #[async_trait]
    impl PlatformServices for IdlePlatform {
        fn platform_version(&self) -> String {
            "Android 13".to_string()
        }

        async fn install_apk(&self, _apk_path: &Path, _events: TaskEventSender) -> Result<()> {
            Ok(())
        }

        async fn download_and_install(
            &self,
            _request: DownloadRequest,
            _events: TaskEventSender,
        ) -> Result<()> {
            Ok(())
        }

        async fn cancel_download(&self, _cancel_tag: &str) {}

        async fn open_market(&self, _target_package_name: &str, _open_system_market: bool) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_platform_version_dispatch() {
        let (coordinator, _events) =
            InstallCoordinator::new(Arc::new(IdlePlatform), InstallerConfig::default());

        let outcome = handle_method(&coordinator, "getPlatformVersion", None)
            .await
            .await
            .unwrap();
        assert_eq!(
            outcome,
            MethodOutcome::success(Value::String("Android 13".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_method_is_not_implemented() {
        let (coordinator, _events) =
            InstallCoordinator::new(Arc::new(IdlePlatform), InstallerConfig::default());

        let outcome = handle_method(&coordinator, "foo", Some(json!({"x": 1})))
            .await
            .await
            .unwrap();
        assert_eq!(outcome, MethodOutcome::NotImplemented);

        // no state was touched
        assert_eq!(coordinator.current_operation().await, InstallOperation::None);
        assert!(!coordinator.awaiting_permission_grant().await);
    }

    #[tokio::test]
    async fn test_validation_error_dispatch() {
        let (coordinator, _events) =
            InstallCoordinator::new(Arc::new(IdlePlatform), InstallerConfig::default());

        let outcome = handle_method(&coordinator, "cancelDownload", Some(json!({})))
            .await
            .await
            .unwrap();
        assert_eq!(
            outcome,
            MethodOutcome::error("cancelDownload", "cancelTag is must not be null!")
        );
    }
}
