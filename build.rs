//! Build script - embeds a human-readable version string for `--version`.
//!
//! Prefers `git describe --tags --always --dirty`; when the checkout has no
//! tags (or no git at all) a pseudo-version of the form
//! `v{CARGO_PKG_VERSION}-{timestamp}-{commit}` is generated instead, using
//! the commit timestamp for clean builds and the build timestamp otherwise.

use std::process::Command;

use chrono::Utc;

fn main() {
    ["src", "build.rs", "Cargo.toml", "Cargo.lock"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    let components = [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        git_version().map(|v| format!("({v})")),
        rustc_version(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", components.join(" "));
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn rustc_version() -> Option<String> {
    run("rustc", &["--version"])
}

fn git_version() -> Option<String> {
    match run("git", &["describe", "--tags", "--always", "--dirty"]) {
        // A bare commit hash means no tags exist; fall back to a
        // pseudo-version anchored on the Cargo.toml version.
        Some(desc) if desc.contains('v') || desc.contains("-g") => Some(desc),
        _ => Some(pseudo_version()),
    }
}

fn pseudo_version() -> String {
    let commit =
        run("git", &["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let dirty = run("git", &["status", "--porcelain"]).map(|out| !out.is_empty());

    // Commit timestamp for clean builds keeps the version deterministic;
    // dirty builds get the build timestamp instead.
    let timestamp = if dirty == Some(false) {
        run("git", &["log", "-1", "--format=%ct"])
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.format("%Y%m%d%H%M%S").to_string())
            .unwrap_or_else(|| Utc::now().format("%Y%m%d%H%M%S").to_string())
    } else {
        Utc::now().format("%Y%m%d%H%M%S").to_string()
    };

    let dirty_suffix = if dirty == Some(true) { "+dirty" } else { "" };

    format!(
        "v{}-{timestamp}-{commit}{dirty_suffix}",
        env!("CARGO_PKG_VERSION")
    )
}
