//! Build information served on `/--version`

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Commit hash, injected at build time
pub const COMMIT: Option<&str> = option_env!("S3_PROXY_COMMIT");
/// Build date, injected at build time
pub const BUILD_DATE: Option<&str> = option_env!("S3_PROXY_BUILD_DATE");

/// Version line of this build
pub fn version_line() -> String {
    format_version(VERSION, COMMIT, BUILD_DATE)
}

fn format_version(version: &str, commit: Option<&str>, date: Option<&str>) -> String {
    match (commit, date) {
        (Some(commit), Some(date)) if !commit.is_empty() && !date.is_empty() => {
            format!("{}-{} (built at {})\n", version, commit, date)
        }
        _ => format!("{}\n", version),
    }
}
