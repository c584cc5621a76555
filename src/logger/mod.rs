//! Logging setup for the driver.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to a test that wants to see them).
//!
//! # Usage
//!
//! ```no_run
//! use compiler_frontend::logger::{self, LogLevel};
//!
//! logger::init_with_level(LogLevel::Debug);
//! tracing::info!("parsing {} file(s)", 2);
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Installs a compact `[LEVEL] message` formatter on stderr.
///
/// Calling it twice fails inside `tracing-subscriber`; the second call is
/// ignored.
pub fn init_with_level(level: LogLevel) {
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level.into());

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_filter(filter);

    let _ = Registry::default().with(layer).try_init();
}
