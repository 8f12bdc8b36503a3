//! JSON-RPC 2.0 message types

use dox_core::DoxError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = dox_core::RPC_INVALID_PARAMS;
pub const INTERNAL_ERROR: i32 = dox_core::RPC_INTERNAL_ERROR;

/// MCP JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(
        dead_code,
        reason = "required by MCP protocol for deserialization, always '2.0'"
    )]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

impl McpResponse {
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(id: Value, error: McpError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// MCP error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
}

impl McpError {
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    #[must_use]
    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::new(METHOD_NOT_FOUND, message)
    }
}

impl From<DoxError> for McpError {
    fn from(err: DoxError) -> Self {
        Self::new(err.rpc_code(), err.to_string())
    }
}

impl std::fmt::Display for McpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dox_error_codes() {
        let not_found: McpError = DoxError::not_found("Manual", "m1").into();
        assert_eq!(not_found.code, INVALID_PARAMS);
        assert_eq!(not_found.message, "Manual not found: m1");

        let upstream: McpError = DoxError::Upstream("timeout".into()).into();
        assert_eq!(upstream.code, INTERNAL_ERROR);
    }

    #[test]
    fn test_response_serialization_skips_absent_fields() {
        let ok = serde_json::to_value(McpResponse::success(json!(1), json!({}))).unwrap();
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(McpResponse::failure(
            json!(2),
            McpError::method_not_found("Method not found: x"),
        ))
        .unwrap();
        assert!(err.get("result").is_none());
        assert_eq!(err["error"]["code"], -32601);
    }
}
