pub mod client;
pub mod router;
pub mod server;
pub mod types;

pub use client::{ClientError, InstallerRpcClient};
pub use server::InstallerRpcServer;
pub use types::{RpcError, RpcRequest, RpcResponse};
