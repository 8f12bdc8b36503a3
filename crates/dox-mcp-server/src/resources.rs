//! MCP resource handlers

use crate::rpc::{McpError, INVALID_REQUEST};
use crate::state::ServerState;
use dox_core::ResourceUri;
use serde_json::{json, Value};

/// `resources/list` result.
///
/// # Errors
///
/// Propagates store failures.
pub fn list_resources(state: &ServerState) -> Result<Value, McpError> {
    let resources = dox_core::list_resources(state.store())?;
    Ok(json!({ "resources": resources }))
}

/// `resources/read` result for `uri`.
///
/// # Errors
///
/// `-32600` for a scheme this server does not serve; otherwise the code of
/// the underlying lookup failure.
pub fn read_resource(state: &ServerState, uri: &str) -> Result<Value, McpError> {
    let Some(parsed) = ResourceUri::parse(uri)? else {
        return Err(McpError::new(
            INVALID_REQUEST,
            format!("Unknown resource URI scheme: {uri}"),
        ));
    };
    let content = dox_core::read_resource(state.store(), &parsed)?;
    Ok(json!({ "contents": [content] }))
}
