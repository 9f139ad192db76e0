#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub(crate) const PORTAL_SECRET: &str = "integration-test-portal-secret-0001";

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
    next_id: i64,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        Self::start_with_args(test_name, &[])
    }

    pub(crate) fn start_with_args(test_name: &str, extra_args: &[&str]) -> Self {
        let storage_dir = temp_dir(test_name);
        let mut child = Command::new(env!("CARGO_BIN_EXE_mt_mcp"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .arg("--portal-secret")
            .arg(PORTAL_SECRET)
            .args(extra_args)
            .env_remove("MT_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn mt_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
            next_id: 100,
        }
    }

    pub(crate) fn start_initialized(test_name: &str) -> Self {
        let mut server = Self::start(test_name);
        server.initialize_default();
        server
    }

    pub(crate) fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        writeln!(self.stdin, "{line}").expect("write raw line");
        self.stdin.flush().expect("flush raw line");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    /// Calls a tool and returns the decoded envelope.
    pub(crate) fn call(&mut self, tool: &str, arguments: Value) -> Value {
        self.next_id += 1;
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments }
        }));
        extract_tool_text(&resp)
    }

    /// Calls a tool that must succeed and returns its `result`.
    pub(crate) fn call_ok(&mut self, tool: &str, arguments: Value) -> Value {
        let payload = self.call(tool, arguments);
        assert_eq!(
            payload.get("success").and_then(|v| v.as_bool()),
            Some(true),
            "{tool} failed: {payload}"
        );
        payload.get("result").cloned().expect("result")
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.storage_dir);
    }
}

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("mt_mcp_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) fn extract_tool_text(resp: &Value) -> Value {
    let text = resp
        .get("result")
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .expect("result.content[0].text");
    if let Ok(parsed) = serde_json::from_str(text) {
        return parsed;
    }
    Value::String(text.to_string())
}

pub(crate) fn assert_json_rpc_error(resp: &Value, expected_code: i64) {
    let code = resp
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_i64())
        .expect("error.code");
    assert_eq!(code, expected_code);
}

pub(crate) fn error_code(payload: &Value) -> &str {
    payload
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("missing string at {pointer} in {value}"))
}

pub(crate) struct Parties {
    pub(crate) client_id: String,
    pub(crate) vendor_id: String,
    pub(crate) manager_id: String,
    pub(crate) project_id: String,
}

/// Client, vendor, manager and one project with a 2026 window.
pub(crate) fn seed_project(server: &mut Server) -> Parties {
    let client = server.call_ok(
        "organizations_create",
        json!({ "name": "Harbor Logistics", "org_type": "client", "country": "NL" }),
    );
    let vendor = server.call_ok(
        "organizations_create",
        json!({ "name": "Steelworks Ltd", "org_type": "vendor" }),
    );
    let client_id = str_at(&client, "/organization/id").to_string();
    let vendor_id = str_at(&vendor, "/organization/id").to_string();
    let manager = server.call_ok(
        "users_create",
        json!({
            "email": "pm@harbor.example",
            "first_name": "Dana",
            "last_name": "Okafor",
            "role": "project_manager",
            "organization_id": client_id
        }),
    );
    let manager_id = str_at(&manager, "/user/id").to_string();
    let project = server.call_ok(
        "projects_create",
        json!({
            "name": "Terminal 4 expansion",
            "client_id": client_id,
            "project_manager_id": manager_id,
            "vendor_id": vendor_id,
            "start_date": "2026-01-01",
            "end_date": "2027-06-30",
            "budget": 250000.0
        }),
    );
    let project_id = str_at(&project, "/project/id").to_string();
    Parties {
        client_id,
        vendor_id,
        manager_id,
        project_id,
    }
}
