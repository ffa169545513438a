//! Tracing subscriber setup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. With
/// `logging.file` set, output goes to a daily rotated file in that directory
/// and the returned guard must be kept alive to flush it.
pub fn init(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(true)
        .with_file(true)
        .with_thread_ids(true)
        .with_target(false);

    match &logging.file {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "titanic-survival");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let builder = builder.with_writer(non_blocking).with_ansi(false);
            if logging.json {
                builder.json().init();
            } else {
                builder.init();
            }
            Some(guard)
        }
        None => {
            if logging.json {
                builder.json().init();
            } else {
                builder.init();
            }
            None
        }
    }
}
