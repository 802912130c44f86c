//! Logging setup
//!
//! Console output (plain or JSON) plus an optional daily-rotated file.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "staff_server=info,tower_http=info";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level`. The returned guard must live until shutdown
/// when file logging is enabled.
pub fn init_logger(
    level: &str,
    json: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if level == "info" {
            EnvFilter::new(DEFAULT_DIRECTIVES)
        } else {
            EnvFilter::new(format!("staff_server={level},tower_http={level}"))
        }
    });

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(Path::new(dir))?;
            let appender = tracing_appender::rolling::daily(dir, "staff-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
    });

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);
    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()?;
    }

    Ok(guard)
}
