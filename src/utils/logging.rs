use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the logging system with the specified log level.
///
/// # Arguments
///
/// * `log_level` - An `EnvFilter` directive (e.g. "info", "notus=debug")
/// * `log_dir` - When set, also write to a daily rotating `notus.log` in this directory
pub fn init_logging(log_level: &str, log_dir: Option<&Path>) {
    let filter = match EnvFilter::try_new(log_level) {
        Ok(f) => f,
        Err(_) => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", log_level);
            EnvFilter::new("info")
        }
    };

    let console_layer = fmt::layer()
        .with_line_number(true)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "notus.log");
            let file_layer = fmt::layer()
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .init();
        }
    }
}
