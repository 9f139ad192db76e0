#![forbid(unsafe_code)]

use serde_json::{Value, json};

/// `<profile>` or `<profile>+<sha>` when the build embedded `MT_GIT_SHA`.
pub(crate) fn build_fingerprint() -> String {
    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
    match option_env!("MT_GIT_SHA").map(str::trim).filter(|sha| !sha.is_empty()) {
        Some(sha) => format!("{profile}+{sha}"),
        None => profile.to_string(),
    }
}

/// `serverInfo` block of the `initialize` reply.
pub(crate) fn server_info() -> Value {
    json!({
        "name": crate::SERVER_NAME,
        "version": crate::SERVER_VERSION,
        "build": build_fingerprint()
    })
}
