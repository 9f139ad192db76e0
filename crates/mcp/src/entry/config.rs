#![forbid(unsafe_code)]

//! Command-line flags with environment fallbacks. Flags win over env.

use std::path::PathBuf;

const DEFAULT_STORAGE_DIR: &str = ".milestone_tracker";
const DEFAULT_TOKEN_TTL_DAYS: i64 = 90;
const MAX_TOKEN_TTL_DAYS: i64 = 3_650;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    pub(crate) storage_dir: PathBuf,
    pub(crate) portal_secret: Option<String>,
    pub(crate) public_base_url: Option<String>,
    pub(crate) token_ttl_days: i64,
}

impl ServerConfig {
    pub(crate) fn token_ttl_ms(&self) -> i64 {
        self.token_ttl_days * 86_400_000
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Invocation {
    Help,
    Version,
    Serve(ServerConfig),
}

pub(crate) fn parse_invocation<F>(args: &[String], env_var: F) -> Result<Invocation, String>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| {
        env_var(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let mut storage_dir = env("MT_STORAGE_DIR");
    let mut portal_secret = env("MT_PORTAL_SECRET");
    let mut public_base_url = env("MT_PUBLIC_BASE_URL");
    let mut token_ttl_days = env("MT_TOKEN_TTL_DAYS");

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };
        let slot = match flag {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            "--storage-dir" => &mut storage_dir,
            "--portal-secret" => &mut portal_secret,
            "--public-base-url" => &mut public_base_url,
            "--token-ttl-days" => &mut token_ttl_days,
            other => return Err(format!("unknown argument: {other}")),
        };
        let value = match inline {
            Some(value) => value,
            None => iter
                .next()
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))?,
        };
        *slot = Some(value);
    }

    let token_ttl_days = match token_ttl_days {
        None => DEFAULT_TOKEN_TTL_DAYS,
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|days| (1..=MAX_TOKEN_TTL_DAYS).contains(days))
            .ok_or_else(|| {
                format!("token ttl must be between 1 and {MAX_TOKEN_TTL_DAYS} days (got {raw})")
            })?,
    };

    Ok(Invocation::Serve(ServerConfig {
        storage_dir: PathBuf::from(storage_dir.unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string())),
        portal_secret,
        public_base_url,
        token_ttl_days,
    }))
}
