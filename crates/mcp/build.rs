#![forbid(unsafe_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let Some(git_dir) = find_git_dir(&manifest_dir) else {
        return;
    };
    let head_path = git_dir.join("HEAD");
    println!("cargo:rerun-if-changed={}", head_path.display());

    let Some(sha) = fs::read_to_string(&head_path)
        .ok()
        .and_then(|head| resolve_head(&git_dir, head.trim()))
    else {
        return;
    };
    let short = sha.chars().take(12).collect::<String>();
    println!("cargo:rustc-env=MT_GIT_SHA={short}");
}

fn find_git_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".git"))
        .find(|dot_git| dot_git.is_dir())
}

/// Detached heads carry the sha; symbolic heads point at a loose or packed ref.
fn resolve_head(git_dir: &Path, head: &str) -> Option<String> {
    let Some(ref_path) = head.strip_prefix("ref:").map(str::trim) else {
        return Some(head.to_string()).filter(|sha| !sha.is_empty());
    };

    let loose = git_dir.join(ref_path);
    if let Ok(text) = fs::read_to_string(&loose) {
        println!("cargo:rerun-if-changed={}", loose.display());
        return Some(text.trim().to_string()).filter(|sha| !sha.is_empty());
    }

    let packed = git_dir.join("packed-refs");
    println!("cargo:rerun-if-changed={}", packed.display());
    fs::read_to_string(&packed).ok()?.lines().find_map(|line| {
        let (sha, name) = line.trim().split_once(' ')?;
        (name == ref_path && !sha.starts_with('#')).then(|| sha.to_string())
    })
}
