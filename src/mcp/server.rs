//! The stdio JSON-RPC server loop and lifecycle state machine.

use std::io::{BufRead, Write};
use std::sync::OnceLock;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{ChartsmithError, Result};
use crate::mcp::protocol::{
    svg_content, CallToolParams, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    ServerCapabilities, ServerInfo, ToolsCapability, JSONRPC_VERSION, PROTOCOL_VERSION,
};
use crate::mcp::schema::validate_and_coerce;
use crate::mcp::tools;
use crate::theme::Theme;

pub const SERVER_NAME: &str = "chartsmith";

/// Startup configuration: message and work ceilings.
///
/// All limits are policy, not contract; each may be raised or lowered via
/// `CHARTSMITH_MAX_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub max_message_bytes: usize,
    pub max_matrix_cells: usize,
    pub max_tree_depth: usize,
    pub max_samples: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: 4 * 1024 * 1024,
            max_matrix_cells: 1_000_000,
            max_tree_depth: 64,
            max_samples: 2_000_000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_message_bytes: env_usize("CHARTSMITH_MAX_MESSAGE_BYTES", defaults.max_message_bytes),
            max_matrix_cells: env_usize("CHARTSMITH_MAX_MATRIX_CELLS", defaults.max_matrix_cells),
            max_tree_depth: env_usize("CHARTSMITH_MAX_TREE_DEPTH", defaults.max_tree_depth),
            max_samples: env_usize("CHARTSMITH_MAX_SAMPLES", defaults.max_samples),
        }
    }
}

fn env_usize(key: &str, fallback: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(fallback)
}

/// Process-wide configuration, read once at first use.
pub fn config() -> &'static ServerConfig {
    static CONFIG: OnceLock<ServerConfig> = OnceLock::new();
    CONFIG.get_or_init(ServerConfig::from_env)
}

/// Lifecycle of one server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerState {
    Created,
    Initialized,
    Serving,
    Shutdown,
}

pub struct McpServer {
    state: ServerState,
    theme: Theme,
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl McpServer {
    pub fn new() -> Self {
        Self { state: ServerState::Created, theme: Theme::default() }
    }

    /// Reads newline-delimited JSON-RPC messages until EOF or shutdown.
    ///
    /// Every response is written as one line and flushed immediately; a
    /// failing tool call never takes the loop down with it.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        info!(tools = tools::global().len(), "server ready");
        for line in reader.lines() {
            let line = line?;
            if self.state == ServerState::Shutdown {
                break;
            }
            if let Some(response) = self.handle_line(&line) {
                let text = serde_json::to_string(&response)?;
                writeln!(writer, "{}", text)?;
                writer.flush()?;
            }
        }
        self.state = ServerState::Shutdown;
        info!("server shut down on EOF");
        Ok(())
    }

    /// Handles one raw input line; `None` means nothing to write
    /// (blank line or absorbed notification).
    pub fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() {
            return None;
        }
        if line.len() > config().max_message_bytes {
            let err = ChartsmithError::MessageTooLarge(line.len());
            return Some(JsonRpcResponse::error(None, err.rpc_code(), &err.to_string()));
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                // Valid JSON that is not an envelope gets InvalidRequest;
                // anything else is a parse error.
                let err = if serde_json::from_str::<Value>(line).is_ok() {
                    ChartsmithError::InvalidRequest(e.to_string())
                } else {
                    ChartsmithError::Parse(e.to_string())
                };
                return Some(JsonRpcResponse::error(None, err.rpc_code(), &err.to_string()));
            }
        };

        if request.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            let err = ChartsmithError::InvalidRequest("jsonrpc must be \"2.0\"".to_string());
            return Some(JsonRpcResponse::error(request.id, err.rpc_code(), &err.to_string()));
        }

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }
        Some(self.handle_request(request))
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => {
                if self.state == ServerState::Initialized {
                    self.state = ServerState::Serving;
                }
            }
            "notifications/shutdown" | "shutdown" => {
                self.state = ServerState::Shutdown;
            }
            // All other notifications are absorbed silently.
            other => debug!(method = other, "ignoring notification"),
        }
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        // Only initialize is allowed before the handshake.
        if self.state == ServerState::Created && request.method != "initialize" {
            let err = ChartsmithError::NotInitialized;
            return JsonRpcResponse::error(request.id, err.rpc_code(), &err.to_string());
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            other => {
                let err = ChartsmithError::MethodNotFound(other.to_string());
                JsonRpcResponse::error(request.id, err.rpc_code(), &err.to_string())
            }
        }
    }

    /// Idempotent: repeated initialize calls return the same payload and
    /// never reset state.
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        if self.state == ServerState::Created {
            self.state = ServerState::Initialized;
        }
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, -32603, &e.to_string()),
        }
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools: Vec<_> = tools::global().iter().map(|t| t.info()).collect();
        JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
    }

    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        match self.call_tool(request) {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(id, -32603, &e.to_string()),
            },
            Err(err) => {
                error!(error = %err, "tool call failed");
                JsonRpcResponse::error(id, err.rpc_code(), &err.to_string())
            }
        }
    }

    fn call_tool(&mut self, request: JsonRpcRequest) -> Result<crate::mcp::protocol::CallToolResult> {
        let params = request.params.ok_or_else(|| ChartsmithError::InvalidArguments {
            path: "/".to_string(),
            reason: "missing params".to_string(),
        })?;
        let params: CallToolParams =
            serde_json::from_value(params).map_err(|e| ChartsmithError::InvalidArguments {
                path: "/".to_string(),
                reason: e.to_string(),
            })?;

        let tool = tools::global()
            .get(&params.name)
            .ok_or_else(|| ChartsmithError::ToolNotFound(params.name.clone()))?;

        let span = tracing::debug_span!("tools/call", tool = tool.name);
        let _guard = span.enter();

        let args = params.arguments.unwrap_or(Value::Null);
        let coerced = validate_and_coerce(&tool.input_schema, args)?;
        let svg = (tool.handler)(coerced, &self.theme)?;
        debug!(bytes = svg.len(), "rendered");
        Ok(svg_content(&svg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(server: &mut McpServer, value: Value) -> Option<JsonRpcResponse> {
        server.handle_line(&serde_json::to_string(&value).unwrap())
    }

    fn initialized_server() -> McpServer {
        let mut server = McpServer::new();
        let _ = call(&mut server, json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}}));
        server
    }

    #[test]
    fn initialize_reports_identity_and_capabilities() {
        let mut server = McpServer::new();
        let resp = call(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        )
        .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[test]
    fn requests_before_initialize_are_rejected() {
        let mut server = McpServer::new();
        let resp = call(&mut server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32002);
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut server = initialized_server();
        let a = call(&mut server, json!({"jsonrpc": "2.0", "id": 5, "method": "initialize", "params": {}})).unwrap();
        let b = call(&mut server, json!({"jsonrpc": "2.0", "id": 6, "method": "initialize", "params": {}})).unwrap();
        assert_eq!(
            serde_json::to_string(&a.result).unwrap(),
            serde_json::to_string(&b.result).unwrap()
        );
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let mut server = initialized_server();
        let resp = call(&mut server, json!({"jsonrpc": "2.0", "id": 2, "method": "charts/paint"})).unwrap();
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let mut server = initialized_server();
        let resp = server.handle_line("{not json").unwrap();
        assert_eq!(resp.error.unwrap().code, -32700);
    }

    #[test]
    fn non_envelope_json_is_invalid_request() {
        let mut server = initialized_server();
        let resp = server.handle_line("[1,2,3]").unwrap();
        assert_eq!(resp.error.unwrap().code, -32600);
    }

    #[test]
    fn notifications_produce_no_response() {
        let mut server = initialized_server();
        assert!(call(
            &mut server,
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"})
        )
        .is_none());
        assert!(call(&mut server, json!({"jsonrpc": "2.0", "method": "notifications/progress"})).is_none());
    }

    #[test]
    fn unknown_tool_is_tool_not_found() {
        let mut server = initialized_server();
        let resp = call(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
                   "params": {"name": "nonexistent", "arguments": {}}}),
        )
        .unwrap();
        assert_eq!(resp.error.unwrap().code, -32001);
    }

    #[test]
    fn failing_tool_does_not_kill_the_loop() {
        let mut server = initialized_server();
        // Zero-total pie fails with a tool execution error...
        let resp = call(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
                   "params": {"name": "pie_chart",
                              "arguments": {"data": [{"label": "a", "value": 0.0}]}}}),
        )
        .unwrap();
        assert_eq!(resp.error.unwrap().code, -32000);

        // ...and the next call on the same server still succeeds.
        let resp = call(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
                   "params": {"name": "pie_chart",
                              "arguments": {"data": [{"label": "a", "value": 1.0}]}}}),
        )
        .unwrap();
        assert!(resp.error.is_none());
    }

    #[test]
    fn run_loop_reads_until_eof() {
        let input = format!(
            "{}\n{}\n",
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        );
        let mut output = Vec::new();
        let mut server = McpServer::new();
        server.run(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let v: Value = serde_json::from_str(line).unwrap();
            assert_eq!(v["jsonrpc"], "2.0");
        }
    }
}
