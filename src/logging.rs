//! Tracing subscriber setup
//!
//! File output always goes through a non-blocking rolling appender. Text mode
//! also echoes to stdout; JSON mode writes the file only.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// Per-dependency levels used when `RUST_LOG` is unset. A bare name means warn.
const DEPENDENCY_DIRECTIVES: &[&str] = &["sqlx", "tower_http=info", "hyper"];

/// Directive string for the configured level
fn default_directives(level: &str) -> String {
    let mut directives = vec![level.to_string()];
    for target in DEPENDENCY_DIRECTIVES {
        if target.contains('=') {
            directives.push((*target).to_string());
        } else {
            directives.push(format!("{}=warn", target));
        }
    }
    directives.join(",")
}

fn appender(config: &AppConfig) -> RollingFileAppender {
    match config.rotation.as_str() {
        "hourly" => rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => rolling::daily(&config.log_dir, &config.log_file),
        _ => rolling::never(&config.log_dir, &config.log_file),
    }
}

/// Install the global subscriber. Keep the guard alive for the life of the process
/// or buffered file output is lost.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (file_writer, guard) = tracing_appender::non_blocking(appender(config));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(file_writer)
                    .with_ansi(false),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(file_writer)
                    .with_ansi(false),
            )
            .with(fmt::layer().with_target(false).with_ansi(true))
            .init();
    }

    guard
}
