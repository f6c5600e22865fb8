//! JSON-RPC 2.0 wire types
//!
//! Error codes are strings because the operation surface uses
//! operation-scoped codes ("0", "cancelDownload", "openAppMarket")
//! rather than numeric ranges. An unknown method is answered with a
//! distinguished result payload, not an error object.

use crate::coordinator::MethodOutcome;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError {
                code: code.into(),
                message: message.into(),
            }),
            id,
        }
    }

    /// Distinguished reply for an unknown method name
    pub fn not_implemented(id: Value) -> Self {
        Self::success(id, json!({"notImplemented": true}))
    }

    pub fn from_outcome(id: Value, outcome: MethodOutcome) -> Self {
        match outcome {
            MethodOutcome::Success(result) => Self::success(id, result),
            MethodOutcome::Error { code, message } => Self::error(id, code, message),
            MethodOutcome::NotImplemented => Self::not_implemented(id),
        }
    }
}
