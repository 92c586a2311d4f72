//! Tracing setup shared by both binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directive used when `RUST_LOG` is unset or blank.
const DEFAULT_DIRECTIVE: &str = "docsync=info";

/// Install a stderr subscriber filtered by `RUST_LOG`, `docsync=info` by default.
///
/// Logs go to stderr so stdout carries only user-facing status lines.
pub fn init() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter_from(rust_log.as_deref()))
        .init();
}

/// Filter for a `RUST_LOG` value. The default applies only when it is unset.
fn filter_from(rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}
