//! HTTP JSON-RPC client with typed helpers for the operation surface

use crate::coordinator::{ChannelEvent, DownloadAndInstallParams, OpenAppMarketParams};
use crate::rpc::types::{RpcRequest, RpcResponse};
use hyper::{body::Bytes, Method, Request, Uri};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use serde_json::{json, Value};
use std::error::Error;
use std::fmt;

type Body = http_body_util::Full<Bytes>;

/// Failure reported by the client: either a transport problem or an
/// error object answered by the server (which keeps its string code).
#[derive(Debug)]
pub struct ClientError {
    pub code: String,
    pub message: String,
}

impl ClientError {
    fn transport(message: impl Into<String>) -> Self {
        Self {
            code: "transport".to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC Error {}: {}", self.code, self.message)
    }
}

impl Error for ClientError {}

pub struct InstallerRpcClient {
    client: Client<
        hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
        Body,
    >,
    server_url: String,
    request_id: std::sync::atomic::AtomicU64,
}

impl InstallerRpcClient {
    pub fn new_http(url: &str) -> Self {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .unwrap()
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https);

        Self {
            client,
            server_url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Send one JSON-RPC call and return its raw result value
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let id = self
            .request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let rpc_request = RpcRequest::new(method, Some(params), json!(id));

        let json_body = serde_json::to_string(&rpc_request)
            .map_err(|e| ClientError::transport(format!("JSON serialization error: {}", e)))?;

        let uri: Uri = self
            .server_url
            .parse()
            .map_err(|e| ClientError::transport(format!("Invalid URL: {}", e)))?;

        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(json_body))
            .map_err(|e| ClientError::transport(format!("Request build error: {}", e)))?;

        let resp = self
            .client
            .request(req)
            .await
            .map_err(|e| ClientError::transport(format!("HTTP request error: {}", e)))?;

        let body_bytes = http_body_util::BodyExt::collect(resp.into_body())
            .await
            .map_err(|e| ClientError::transport(format!("Body read error: {}", e)))?
            .to_bytes();

        let rpc_response: RpcResponse = serde_json::from_slice(&body_bytes)
            .map_err(|e| ClientError::transport(format!("JSON parse error: {}", e)))?;

        if let Some(error) = rpc_response.error {
            return Err(ClientError {
                code: error.code,
                message: error.message,
            });
        }

        Ok(rpc_response.result.unwrap_or(Value::Null))
    }

    pub async fn get_platform_version(&self) -> Result<String, ClientError> {
        let result = self.request("getPlatformVersion", Value::Null).await?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::transport(format!("Response parse error: {}", e)))
    }

    /// Install a local APK; resolves with the `{"apkPath": ...}` payload
    pub async fn install_apk(&self, file_path: &str) -> Result<Value, ClientError> {
        self.request("installApk", json!({"filePath": file_path}))
            .await
    }

    /// Download an APK and install it; resolves with `{"apkPath": ...}`
    pub async fn download_and_install_apk(
        &self,
        params: DownloadAndInstallParams,
    ) -> Result<Value, ClientError> {
        self.request("downloadAndInstallApk", json!(params)).await
    }

    pub async fn cancel_download(&self, cancel_tag: &str) -> Result<bool, ClientError> {
        let result = self
            .request("cancelDownload", json!({"cancelTag": cancel_tag}))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::transport(format!("Response parse error: {}", e)))
    }

    pub async fn open_app_market(&self, params: OpenAppMarketParams) -> Result<bool, ClientError> {
        let result = self.request("openAppMarket", json!(params)).await?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::transport(format!("Response parse error: {}", e)))
    }

    /// Deliver the resume trigger to the coordinator
    pub async fn notify_foreground_regained(&self) -> Result<bool, ClientError> {
        let result = self
            .request("notifyForegroundRegained", Value::Null)
            .await?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::transport(format!("Response parse error: {}", e)))
    }

    /// Long-poll the next pushed event; `None` when the server timed out
    pub async fn poll_event(
        &self,
        timeout_seconds: Option<u64>,
    ) -> Result<Option<ChannelEvent>, ClientError> {
        let params = match timeout_seconds {
            Some(seconds) => json!({"timeoutSeconds": seconds}),
            None => Value::Null,
        };
        let result = self.request("pollEvent", params).await?;
        if result.is_null() {
            Ok(None)
        } else {
            let event = serde_json::from_value(result)
                .map_err(|e| ClientError::transport(format!("Response parse error: {}", e)))?;
            Ok(Some(event))
        }
    }
}
