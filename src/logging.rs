//! Structured logging configuration
//!
//! Diagnostics go through `tracing`: pretty console output for interactive
//! use, JSON for machine consumption, optional rolling file output.
//! Configured via [`crate::config`] and the standard `RUST_LOG` filter.

use crate::config::get_config;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize the logging system based on configuration.
pub fn init_logging() {
    let config = get_config();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let json = config.logging.format == "json";

    match config.logging.output.as_str() {
        "file" => {
            let appender =
                tracing_appender::rolling::daily(&config.paths.log_directory, "weblog-analyzer.log");
            let layer = fmt::layer().with_writer(appender).with_ansi(false);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .init();
            } else {
                tracing_subscriber::registry().with(filter).with(layer).init();
            }
        }
        "both" => {
            let appender =
                tracing_appender::rolling::daily(&config.paths.log_directory, "weblog-analyzer.log");
            let file_layer = fmt::layer().with_writer(appender).with_ansi(false);
            let console_layer = fmt::layer().with_writer(std::io::stderr);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(console_layer.json())
                    .with(file_layer.json())
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(console_layer)
                    .with(file_layer)
                    .init();
            }
        }
        _ => {
            // Diagnostics go to stderr so stdout stays clean for reports
            // and CSV export.
            let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.pretty())
                    .init();
            }
        }
    }
}
