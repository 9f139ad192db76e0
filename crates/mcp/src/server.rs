#![forbid(unsafe_code)]

use crate::McpServer;
use crate::handlers::{dispatch_tool, tool_definitions};
use mt_storage::SqliteStore;
use serde_json::{Value, json};

impl McpServer {
    pub(crate) fn new(store: SqliteStore, token_ttl_ms: i64) -> Self {
        Self {
            initialized: false,
            store,
            token_ttl_ms,
        }
    }

    pub(crate) fn handle(&mut self, request: crate::JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();

        if method == "initialize" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": crate::MCP_VERSION,
                    "serverInfo": crate::server_info(),
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        if matches!(method, "notifications/initialized" | "initialized") {
            self.initialized = true;
            return None;
        }

        // Notifications never get a reply, not even an error.
        if request.is_notification() {
            return None;
        }

        if !self.initialized {
            return Some(crate::json_rpc_error(
                request.id,
                crate::NOT_INITIALIZED,
                "Server not initialized",
            ));
        }

        let result = match method {
            "ping" => json!({}),
            "tools/list" => json!({ "tools": tool_definitions() }),
            "tools/call" => match request.tool_call() {
                Ok((name, args)) => crate::tool_call_result(&self.call_tool(name, args)),
                Err(message) => {
                    return Some(crate::json_rpc_error(
                        request.id.clone(),
                        crate::INVALID_PARAMS,
                        message,
                    ));
                }
            },
            _ => {
                return Some(crate::json_rpc_error(
                    request.id,
                    crate::METHOD_NOT_FOUND,
                    &format!("Method not found: {method}"),
                ));
            }
        };
        Some(crate::json_rpc_response(request.id, result))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        let Some(resp) = dispatch_tool(self, name, args) else {
            tracing::debug!(tool = name, "unknown tool");
            return crate::handlers::unknown_tool(name);
        };
        let success = resp.get("success").and_then(|v| v.as_bool()).unwrap_or(false);
        if success {
            tracing::debug!(tool = name, "tool call succeeded");
        } else {
            let code = resp
                .get("error")
                .and_then(|e| e.get("code"))
                .and_then(|c| c.as_str())
                .unwrap_or("UNKNOWN");
            tracing::info!(tool = name, code, "tool call failed");
        }
        resp
    }
}
