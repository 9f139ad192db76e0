#![forbid(unsafe_code)]

use serde::Deserialize;
use serde_json::{Value, json};

pub(crate) const PARSE_ERROR: i64 = -32700;
pub(crate) const INVALID_REQUEST: i64 = -32600;
pub(crate) const METHOD_NOT_FOUND: i64 = -32601;
pub(crate) const INVALID_PARAMS: i64 = -32602;
/// Any method other than `initialize` before the client sent `initialized`.
pub(crate) const NOT_INITIALIZED: i64 = -32002;

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    pub(crate) method: String,
    #[serde(default)]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

impl JsonRpcRequest {
    pub(crate) fn is_notification(&self) -> bool {
        self.id.is_none() && self.method.starts_with("notifications/")
    }

    /// `params.name` and `params.arguments` of a `tools/call`.
    pub(crate) fn tool_call(&self) -> Result<(&str, Value), &'static str> {
        let params = self
            .params
            .as_ref()
            .and_then(Value::as_object)
            .ok_or("params must be an object")?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or("params.name must be a string")?;
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        Ok((name, arguments))
    }
}

pub(crate) fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub(crate) fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

/// `tools/call` result: the envelope as one pretty-printed text block, with
/// `isError` mirroring the envelope's `success`.
pub(crate) fn tool_call_result(envelope: &Value) -> Value {
    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    json!({
        "content": [{
            "type": "text",
            "text": serde_json::to_string_pretty(envelope).unwrap_or_else(|_| "{}".to_string())
        }],
        "isError": !success
    })
}
