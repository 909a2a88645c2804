//! Tracing setup for simulation runs.
//!
//! Console output follows the level chosen on the command line (or `RUST_LOG`).
//! When a log directory is given, the full trace of the run is also written to
//! `<dir>/leocdn-last-run.log`, replacing the previous run's log.

use std::fs::{File, create_dir_all};
use std::path::Path;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Name of the per-run trace file.
pub const RUN_LOG_FILE: &str = "leocdn-last-run.log";

/// Initializes tracing with a console layer and an optional full-trace file layer.
///
/// # Errors
///
/// - `std::io::Error` - Log directory cannot be created or the log file cannot be opened
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> std::io::Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_filter(console_filter);

    let Some(logs_dir) = logs_dir else {
        tracing_subscriber::registry().with(console_layer).init();
        return Ok(());
    };

    create_dir_all(logs_dir)?;
    let log_file_path = logs_dir.join(RUN_LOG_FILE);
    let log_file = File::create(&log_file_path)?;

    // Strategy tasks run on the blocking pool, thread names tell them apart
    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        "Tracing initialized: console={}, trace_file={}",
        console_level,
        log_file_path.display()
    );

    Ok(())
}

/// Console log levels selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Run and step progress
    #[default]
    Info,
    /// Per-strategy step details
    Debug,
    /// Every write set and input file
    Trace,
}

impl CliLogLevel {
    /// Converts the CLI level to a tracing level.
    ///
    /// # Examples
    /// ```
    /// use leocdn_core::tracing_setup::CliLogLevel;
    ///
    /// assert_eq!(CliLogLevel::Debug.as_tracing_level(), tracing::Level::DEBUG);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tracing_level())
    }
}
