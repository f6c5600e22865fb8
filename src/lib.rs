//! APK install coordinator
//!
//! Bridges an RPC method surface (install, download-and-install, cancel,
//! market-open) to a platform services layer that does the actual device
//! work. The coordinator owns a single mutable install session, resolves
//! each accepted request through a consumed one-shot responder, forwards
//! download progress and cancel tags as pushed events, and replays a flow
//! parked behind the OS install-permission prompt when the host signals
//! that its UI surface regained foreground.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod platform;
pub mod rpc;

pub use config::InstallerConfig;
pub use coordinator::{
    CancelDownloadParams, ChannelEvent, DownloadAndInstallParams, InstallApkParams,
    InstallCoordinator, InstallOperation, MethodOutcome, MethodReceiver, OpenAppMarketParams,
    Responder,
};
pub use error::{ErrorKind, InstallerError, Result};
pub use platform::{
    DownloadRequest, PlatformServices, TaskEvent, TaskEventSender, OPEN_INSTALL_PACKAGE_PERMISSION,
};
pub use rpc::{InstallerRpcClient, InstallerRpcServer};
