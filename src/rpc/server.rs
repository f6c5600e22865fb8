//! HTTP JSON-RPC server for the install coordinator
//!
//! POST-only, one JSON-RPC call per request body. Request/response
//! methods dispatch through the router; the outbound event channel is
//! exposed through the long-polling `pollEvent` method, which returns
//! the next queued event or null when the timeout elapses.

use crate::coordinator::{ChannelEvent, InstallCoordinator};
use crate::rpc::router;
use crate::rpc::types::{RpcRequest, RpcResponse};
use hyper::{body::Bytes, service::Service, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

type Body = http_body_util::Full<Bytes>;
type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub struct InstallerRpcServer {
    coordinator: Arc<InstallCoordinator>,
    events: Arc<Mutex<mpsc::UnboundedReceiver<ChannelEvent>>>,
    poll_timeout: Duration,
}

impl InstallerRpcServer {
    /// Wrap a coordinator and its event receiver for serving
    pub fn new(
        coordinator: Arc<InstallCoordinator>,
        events: mpsc::UnboundedReceiver<ChannelEvent>,
    ) -> Self {
        let poll_timeout = Duration::from_secs(coordinator.config().poll_timeout_seconds);
        Self {
            coordinator,
            events: Arc::new(Mutex::new(events)),
            poll_timeout,
        }
    }

    /// Bind and serve. Returns the bound address and the accept-loop task.
    pub async fn start(self, addr: SocketAddr) -> Result<(SocketAddr, JoinHandle<()>), BoxError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        println!("RPC Server listening on {}", local_addr);

        let service = RpcService {
            coordinator: self.coordinator,
            events: self.events,
            poll_timeout: self.poll_timeout,
        };

        let handle = tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(err) => {
                        eprintln!("Accept error: {:?}", err);
                        continue;
                    }
                };
                let io = TokioIo::new(stream);
                let service = service.clone();

                tokio::spawn(async move {
                    if let Err(err) = hyper::server::conn::http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        eprintln!("Error serving connection: {:?}", err);
                    }
                });
            }
        });

        Ok((local_addr, handle))
    }
}

#[derive(Clone)]
struct RpcService {
    coordinator: Arc<InstallCoordinator>,
    events: Arc<Mutex<mpsc::UnboundedReceiver<ChannelEvent>>>,
    poll_timeout: Duration,
}

impl Service<Request<hyper::body::Incoming>> for RpcService {
    type Response = Response<Body>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<hyper::body::Incoming>) -> Self::Future {
        let coordinator = Arc::clone(&self.coordinator);
        let events = Arc::clone(&self.events);
        let poll_timeout = self.poll_timeout;

        Box::pin(async move {
            if req.method() != Method::POST {
                return Ok(Response::builder()
                    .status(StatusCode::METHOD_NOT_ALLOWED)
                    .body(Body::from("Method not allowed"))?);
            }

            let body_bytes = match http_body_util::BodyExt::collect(req.into_body()).await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    return Ok(Response::builder()
                        .status(StatusCode::BAD_REQUEST)
                        .body(Body::from(format!("Failed to read body: {}", e)))?);
                }
            };

            let rpc_request: RpcRequest = match serde_json::from_slice(&body_bytes) {
                Ok(req) => req,
                Err(e) => {
                    return Ok(Response::builder()
                        .status(StatusCode::BAD_REQUEST)
                        .body(Body::from(format!("Invalid JSON-RPC request: {}", e)))?);
                }
            };

            let response =
                handle_rpc_request(&coordinator, &events, poll_timeout, rpc_request).await;
            let response_json = serde_json::to_string(&response)?;

            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .body(Body::from(response_json))?)
        })
    }
}

async fn handle_rpc_request(
    coordinator: &InstallCoordinator,
    events: &Mutex<mpsc::UnboundedReceiver<ChannelEvent>>,
    poll_timeout: Duration,
    request: RpcRequest,
) -> RpcResponse {
    if request.method == "pollEvent" {
        return poll_event(events, poll_timeout, request).await;
    }

    let receiver = router::handle_method(coordinator, &request.method, request.params).await;
    match receiver.await {
        Ok(outcome) => RpcResponse::from_outcome(request.id, outcome),
        // responder dropped: the request was replaced by a newer one
        Err(_) => RpcResponse::error(request.id, "0", "request abandoned"),
    }
}

async fn poll_event(
    events: &Mutex<mpsc::UnboundedReceiver<ChannelEvent>>,
    default_timeout: Duration,
    request: RpcRequest,
) -> RpcResponse {
    let timeout = request
        .params
        .as_ref()
        .and_then(|params| params.get("timeoutSeconds"))
        .and_then(Value::as_u64)
        .map(Duration::from_secs)
        .unwrap_or(default_timeout);

    let next = {
        let mut events = events.lock().await;
        tokio::time::timeout(timeout, events.recv()).await
    };

    match next {
        Ok(Some(event)) => match serde_json::to_value(&event) {
            Ok(value) => RpcResponse::success(request.id, value),
            Err(e) => RpcResponse::error(request.id, "pollEvent", format!("serialize error: {}", e)),
        },
        Ok(None) => RpcResponse::error(request.id, "pollEvent", "event channel closed"),
        // timeout with an empty queue
        Err(_) => RpcResponse::success(request.id, Value::Null),
    }
}
