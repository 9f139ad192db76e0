#![forbid(unsafe_code)]

mod entry;
mod handlers;
mod server;
mod support;

pub(crate) use support::*;

use entry::{Invocation, ServerConfig};
use mt_storage::{SqliteStore, StoreOptions};
use std::fmt::Write as _;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "milestone-tracker-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn write_last_crash(storage_dir: &std::path::Path, kind: &str, detail: &str) {
    // Best-effort; request bodies are never written here.
    let _ = std::fs::create_dir_all(storage_dir);
    let path = storage_dir.join("mt_mcp_last_crash.txt");

    let mut out = String::new();
    let _ = writeln!(out, "ts={}", ts_ms_to_rfc3339(now_ms_i64()));
    let _ = writeln!(out, "pid={}", std::process::id());
    let _ = writeln!(out, "kind={kind}");
    let _ = writeln!(out, "build={}", build_fingerprint());
    let _ = writeln!(out, "detail={detail}");

    let _ = std::fs::write(path, out);
}

fn install_crash_reporter(storage_dir: std::path::PathBuf) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let mut detail = info.to_string();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let _ = write!(&mut detail, "\nbacktrace:\n{backtrace}");
        write_last_crash(&storage_dir, "panic", &detail);
        default_hook(info);
    }));
}

pub(crate) struct McpServer {
    initialized: bool,
    store: SqliteStore,
    token_ttl_ms: i64,
}

fn usage() -> &'static str {
    "mt_mcp - milestone tracker MCP server (stdio)\n\n\
USAGE:\n\
  mt_mcp [--storage-dir DIR] [--portal-secret SECRET] [--public-base-url URL]\n\
         [--token-ttl-days DAYS]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version/build and exit\n\
\n\
ENVIRONMENT:\n\
  MT_STORAGE_DIR, MT_PORTAL_SECRET, MT_PUBLIC_BASE_URL, MT_TOKEN_TTL_DAYS\n\
  MT_LOG           tracing filter for stderr logs (default: warn)\n"
}

fn version_line() -> String {
    format!("mt_mcp {SERVER_VERSION} build={}", build_fingerprint())
}

/// Logs go to stderr; stdout carries protocol frames only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage_dir = config.storage_dir.clone();
    install_crash_reporter(storage_dir.clone());

    let store = SqliteStore::open_with(
        &config.storage_dir,
        StoreOptions {
            portal_secret: config.portal_secret.clone(),
            public_base_url: config.public_base_url.clone(),
        },
    )?;
    tracing::info!(
        storage_dir = %storage_dir.display(),
        token_ttl_days = config.token_ttl_days,
        "milestone tracker server starting"
    );

    let mut server = McpServer::new(store, config.token_ttl_ms());
    let result = entry::run_stdio(&mut server);
    if let Err(err) = &result {
        tracing::error!(error = %err, "stdio loop failed");
        write_last_crash(&storage_dir, "error", &format!("{err:?}"));
    }
    result
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match entry::parse_invocation(&args, |key| std::env::var(key).ok()) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("mt_mcp: {message}\n\n{}", usage());
            std::process::exit(2);
        }
    };

    match invocation {
        Invocation::Help => {
            print!("{}", usage());
            Ok(())
        }
        Invocation::Version => {
            println!("{}", version_line());
            Ok(())
        }
        Invocation::Serve(config) => {
            init_tracing();
            serve(config)
        }
    }
}
