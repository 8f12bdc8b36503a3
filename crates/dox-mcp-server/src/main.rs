//! `DoX` MCP Server
//!
//! MCP (Model Context Protocol) server over the sports-governance policy
//! repository. Exposes policy lookups, manual templates and manual generation
//! as tools, generated manuals as `manual://` resources, and a guided
//! manual-generation prompt.

// Clippy pedantic allows:
// - Tool list and request dispatch functions are necessarily large
// - Tool call arguments are consumed by selection parsing
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]

use anyhow::Context;
use clap::Parser;
use dox_core::DoxConfig;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod prompts;
mod resources;
mod rpc;
mod state;
mod tools;

use rpc::{McpError, McpRequest, McpResponse, PARSE_ERROR};
use state::ServerState;

const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Parser, Debug)]
#[command(
    name = "dox-mcp",
    about = "MCP server for policy lookup and manual generation",
    long_about = "Serves the policy repository over MCP (JSON-RPC 2.0 on stdio).\n\
                  \n\
                  Configuration is read from ~/.dox.toml, ./.dox.toml and --config, \
                  in increasing precedence, then DOX_* environment variables.",
    version
)]
struct Args {
    /// Configuration file layered over the discovered ones
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON seed file for the policy store (overrides configuration)
    #[arg(short, long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging to stderr (stdout is for JSON-RPC)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let mut settings = DoxConfig::discover(args.config.as_deref())
        .context("Failed to load configuration")?
        .with_env_overrides()
        .resolve()
        .context("Invalid configuration")?;
    if let Some(seed) = args.seed {
        settings.seed_path = Some(seed);
    }

    log::info!(
        "{} MCP Server {} starting...",
        settings.server_name,
        settings.server_version
    );

    let state = ServerState::from_settings(settings)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&state, stdin.lock(), stdout.lock())?;

    log::info!("MCP Server shutting down");
    Ok(())
}

/// Answer newline-delimited requests from `input` until it is exhausted.
///
/// # Errors
///
/// Fails when `output` can no longer be written.
fn serve<R: BufRead, W: Write>(state: &ServerState, input: R, mut output: W) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("Failed to read stdin: {e}");
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<McpRequest>(&line) {
            Ok(request) => {
                log::debug!("Received request: method={}", request.method);
                handle_request(state, request)
            }
            Err(e) => {
                log::error!("Invalid JSON: {e} - line: {line}");
                Some(McpResponse::failure(
                    Value::Null,
                    McpError::new(PARSE_ERROR, format!("Parse error: {e}")),
                ))
            }
        };

        if let Some(response) = response {
            serde_json::to_writer(&mut output, &response).context("Failed to write response")?;
            writeln!(output).context("Failed to write newline")?;
            output.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Handle an MCP request; notifications (no id) get no response
fn handle_request(state: &ServerState, request: McpRequest) -> Option<McpResponse> {
    let Some(id) = request.id else {
        log::debug!("Notification: {}", request.method);
        return None;
    };
    let params = request.params.unwrap_or(Value::Null);

    let result = match request.method.as_str() {
        // Protocol handshake
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": state.settings().server_name,
                "version": state.settings().server_version
            },
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {}
            }
        })),

        "notifications/initialized" | "ping" => Ok(json!({})),

        "tools/list" => Ok(json!({ "tools": tools::list_tools() })),

        "tools/call" => call_tool(state, &params),

        "resources/list" => resources::list_resources(state),

        "resources/read" => match params.get("uri").and_then(Value::as_str) {
            Some(uri) => resources::read_resource(state, uri),
            None => Err(McpError::invalid_params("Missing resource uri")),
        },

        "prompts/list" => Ok(json!({ "prompts": prompts::list_prompts() })),

        "prompts/get" => match params.get("name").and_then(Value::as_str) {
            Some(name) => {
                let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
                prompts::get_prompt(state, name, &arguments)
            }
            None => Err(McpError::invalid_params("Missing prompt name")),
        },

        // Unknown method
        method => {
            log::warn!("Unknown method: {method}");
            Err(McpError::method_not_found(format!(
                "Method not found: {method}"
            )))
        }
    };

    Some(match result {
        Ok(result) => McpResponse::success(id, result),
        Err(e) => {
            log::error!("{} failed: {e}", request.method);
            McpResponse::failure(id, e)
        }
    })
}

fn call_tool(state: &ServerState, params: &Value) -> Result<Value, McpError> {
    let tool_name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
    let arguments = match params.get("arguments") {
        Some(Value::Null) | None => json!({}),
        Some(args) => args.clone(),
    };

    log::info!("Calling tool: {tool_name} with args: {arguments}");

    let result = tools::call_tool(state, tool_name, arguments)?;
    let text = serde_json::to_string_pretty(&result)
        .map_err(|e| McpError::new(rpc::INTERNAL_ERROR, e.to_string()))?;
    Ok(json!({
        "content": [{
            "type": "text",
            "text": text
        }]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::seeded_state;
    use std::io::Cursor;

    fn exchange(lines: &[Value]) -> Vec<Value> {
        let state = seeded_state();
        let input: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let mut output = Vec::new();
        serve(&state, Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn request(id: u64, method: &str, params: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
    }

    #[test]
    fn test_initialize_reports_server_info() {
        let responses = exchange(&[request(1, "initialize", json!({}))]);
        assert_eq!(responses.len(), 1);
        let result = &responses[0]["result"];
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "DoX Policy Management");
        assert!(result["capabilities"]["resources"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
    }

    #[test]
    fn test_notifications_get_no_response() {
        let responses = exchange(&[
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            request(2, "tools/list", json!({})),
        ]);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 2);
        assert_eq!(responses[0]["result"]["tools"].as_array().unwrap().len(), 18);
    }

    #[test]
    fn test_tools_call_wraps_result_as_text() {
        let responses = exchange(&[request(
            3,
            "tools/call",
            json!({"name": "list_sports", "arguments": {"active_only": false}}),
        )]);
        let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["total"], 3);
    }

    #[test]
    fn test_tools_call_errors_carry_codes() {
        let responses = exchange(&[
            request(4, "tools/call", json!({"name": "nope"})),
            request(5, "tools/call", json!({"name": "generate_manual", "arguments": {"title": "X", "categories": ["crowd_control"]}})),
            request(6, "tools/call", json!({})),
        ]);
        assert_eq!(responses[0]["error"]["code"], -32601);
        assert_eq!(responses[1]["error"]["code"], -32602);
        assert_eq!(
            responses[1]["error"]["message"],
            "No policies found matching the criteria"
        );
        assert_eq!(responses[2]["error"]["code"], -32602);
        assert!(responses.iter().all(|r| r.get("result").is_none()));
    }

    #[test]
    fn test_resources_and_prompts() {
        let responses = exchange(&[
            request(7, "resources/list", json!({})),
            request(8, "resources/read", json!({"uri": "manual://template/default"})),
            request(9, "resources/read", json!({"uri": "gopher://1"})),
            request(10, "prompts/list", json!({})),
            request(11, "prompts/get", json!({"name": "dox_generate_manual"})),
        ]);
        assert_eq!(
            responses[0]["result"]["resources"][0]["uri"],
            "policy://BSB-EQP-001"
        );
        assert!(responses[1]["result"]["contents"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("# Manual Template: Standard Manual"));
        assert_eq!(responses[2]["error"]["code"], -32600);
        assert_eq!(responses[3]["result"]["prompts"][1]["name"], "dox_generate_manual");
        assert_eq!(
            responses[4]["result"]["messages"][0]["content"]["type"],
            "text"
        );
    }

    #[test]
    fn test_unknown_method_and_parse_error() {
        let state = seeded_state();
        let input = "{not json}\n\n{\"jsonrpc\":\"2.0\",\"id\":12,\"method\":\"sampling/create\"}\n";
        let mut output = Vec::new();
        serve(&state, Cursor::new(input), &mut output).unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[1]["error"]["code"], -32601);
        assert_eq!(
            responses[1]["error"]["message"],
            "Method not found: sampling/create"
        );
    }
}
