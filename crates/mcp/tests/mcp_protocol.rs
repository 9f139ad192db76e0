#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};

#[test]
fn initialize_reports_server_info_and_tool_capability() {
    let mut server = Server::start("initialize_reports_server_info");
    let init = server.request(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
    }));
    let result = init.get("result").expect("initialize must return result");
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "milestone-tracker-mcp");
    assert!(result["capabilities"].get("tools").is_some());
}

#[test]
fn requests_before_initialized_notification_are_refused() {
    let mut server = Server::start("requests_before_initialized");
    let _ = server.request(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {}
    }));
    let early = server.request(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/list",
        "params": {}
    }));
    assert_json_rpc_error(&early, -32002);

    // Unknown notifications are dropped silently; the next reply belongs to id 3.
    server.send(json!({ "jsonrpc": "2.0", "method": "notifications/cancelled", "params": {} }));
    server.send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }));
    let ping = server.request(json!({ "jsonrpc": "2.0", "id": 3, "method": "ping" }));
    assert_eq!(ping["id"], 3);
    assert!(ping.get("result").is_some());
}

#[test]
fn tools_list_exposes_console_and_portal_tools_sorted() {
    let mut server = Server::start_initialized("tools_list_sorted");
    let resp = server.request(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/list",
        "params": {}
    }));
    let tools = resp
        .get("result")
        .and_then(|v| v.get("tools"))
        .and_then(|v| v.as_array())
        .expect("result.tools");
    let names = tools
        .iter()
        .filter_map(|tool| tool.get("name").and_then(|v| v.as_str()))
        .collect::<Vec<_>>();

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 29);
    for expected in [
        "milestones_approve",
        "milestones_reject",
        "portal_submit",
        "analytics_summary",
        "schedules_create",
        "milestone_templates_create",
        "milestone_templates_list",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object", "{tool}");
    }
}

#[test]
fn malformed_input_yields_json_rpc_errors() {
    let mut server = Server::start_initialized("malformed_input");

    server.send_raw("{not json");
    assert_json_rpc_error(&server.recv(), -32700);

    let no_method = server.request(json!({ "jsonrpc": "2.0", "id": 5 }));
    assert_json_rpc_error(&no_method, -32600);

    let unknown = server.request(json!({ "jsonrpc": "2.0", "id": 6, "method": "resources/list" }));
    assert_json_rpc_error(&unknown, -32601);

    let bad_params = server.request(json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": "organizations_list"
    }));
    assert_json_rpc_error(&bad_params, -32602);
}

#[test]
fn tool_failures_are_envelopes_not_protocol_errors() {
    let mut server = Server::start_initialized("tool_failures_are_envelopes");

    let resp = server.request(json!({
        "jsonrpc": "2.0",
        "id": 8,
        "method": "tools/call",
        "params": { "name": "milestones_get", "arguments": { "milestone_id": "MS-999" } }
    }));
    assert_eq!(resp["result"]["isError"], true);
    let payload = extract_tool_text(&resp);
    assert_eq!(payload["success"], false);
    assert_eq!(error_code(&payload), "UNKNOWN_ID");
    assert!(payload["error"]["recovery"].is_string());

    let unknown = server.call("branch_checkout", json!({}));
    assert_eq!(error_code(&unknown), "UNKNOWN_TOOL");

    let not_object = server.call("organizations_list", json!(["vendor"]));
    assert_eq!(error_code(&not_object), "INVALID_INPUT");

    let bad_enum = server.call("organizations_list", json!({ "org_type": "supplier" }));
    assert_eq!(error_code(&bad_enum), "INVALID_INPUT");
    assert!(
        bad_enum["error"]["message"]
            .as_str()
            .unwrap_or("")
            .contains("client|vendor|contractor|consultant")
    );
}

#[test]
fn content_length_framing_is_answered_in_kind() {
    let storage_dir = std::env::temp_dir().join(format!(
        "mt_mcp_content_length_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    let mut child = Command::new(env!("CARGO_BIN_EXE_mt_mcp"))
        .arg("--storage-dir")
        .arg(&storage_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn mt_mcp");
    let mut stdin = child.stdin.take().expect("stdin");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout"));

    let mut send = |req: serde_json::Value| {
        let body = serde_json::to_vec(&req).expect("serialize request");
        write!(stdin, "Content-Length: {}\r\n\r\n", body.len()).expect("write header");
        stdin.write_all(&body).expect("write body");
        stdin.flush().expect("flush");
    };
    let mut recv = || {
        let mut content_length = None;
        loop {
            let mut line = String::new();
            let read = stdout.read_line(&mut line).expect("read header line");
            assert!(read > 0, "unexpected EOF reading response headers");
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                break;
            }
            if let Some((key, value)) = trimmed.split_once(':')
                && key.trim().eq_ignore_ascii_case("content-length")
            {
                content_length = Some(value.trim().parse::<usize>().expect("content-length"));
            }
        }
        let mut buf = vec![0u8; content_length.expect("missing Content-Length")];
        stdout.read_exact(&mut buf).expect("read body");
        serde_json::from_slice::<serde_json::Value>(&buf).expect("parse body")
    };

    send(json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }));
    assert!(recv().get("result").is_some());
    send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }));
    send(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": { "name": "organizations_list", "arguments": {} }
    }));
    let listed = recv();
    assert_eq!(listed["id"], 2);
    assert_eq!(extract_tool_text(&listed)["result"]["count"], 0);

    let _ = child.kill();
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(&storage_dir);
}
