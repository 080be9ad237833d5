//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global subscriber from [`LogConfig`]
//! - Route output to console, file, both, or nowhere
//! - Honor silent mode while operators are being prompted
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format with RFC 3339 timestamps, or human-readable text
//! - Silent mode is an explicit shared flag checked on every console write,
//!   not process-wide state
//! - A log file that cannot be opened degrades to console-only output

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LogConfig;

/// Shared switch that mutes console log output.
#[derive(Debug, Clone, Default)]
pub struct SilentMode {
    flag: Arc<AtomicBool>,
}

impl SilentMode {
    pub fn new(silent: bool) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(silent)),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn set(&self, silent: bool) {
        self.flag.store(silent, Ordering::SeqCst);
    }

    /// Go silent until the returned guard is dropped, then restore the
    /// previous setting.
    pub fn suppress(&self) -> SilentGuard {
        let previous = self.flag.swap(true, Ordering::SeqCst);
        SilentGuard {
            mode: self.clone(),
            previous,
        }
    }
}

/// Restores the prior silent setting on drop.
#[must_use = "silent mode ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SilentGuard {
    mode: SilentMode,
    previous: bool,
}

impl Drop for SilentGuard {
    fn drop(&mut self) {
        self.mode.set(self.previous);
    }
}

/// Console writer that discards output while silent.
#[derive(Clone)]
pub struct ConsoleWriter {
    silent: SilentMode,
}

impl ConsoleWriter {
    pub fn new(silent: SilentMode) -> Self {
        Self { silent }
    }
}

/// Either stdout or a sink, chosen per event.
pub enum ConsoleSink {
    Stdout(io::Stdout),
    Discard(io::Sink),
}

impl io::Write for ConsoleSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ConsoleSink::Stdout(w) => w.write(buf),
            ConsoleSink::Discard(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ConsoleSink::Stdout(w) => w.flush(),
            ConsoleSink::Discard(w) => w.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleSink;

    fn make_writer(&'a self) -> Self::Writer {
        if self.silent.is_silent() {
            ConsoleSink::Discard(io::sink())
        } else {
            ConsoleSink::Stdout(io::stdout())
        }
    }
}

/// Where log output should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkPlan {
    pub console: bool,
    pub file: Option<PathBuf>,
}

/// Decide the sinks for a configuration and silent setting.
pub fn plan_sinks(config: &LogConfig, silent: bool) -> SinkPlan {
    let file = config
        .enable_file
        .then(|| PathBuf::from(&config.file_path));
    SinkPlan {
        console: !silent,
        file,
    }
}

/// Map a level name to a tracing level; unrecognized names mean `info`.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" | "fatal" | "panic" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to install global subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the background file writer alive; drop it last.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Open `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// A subscriber built from [`LogConfig`], not yet installed.
struct LogStack<S> {
    subscriber: S,
    guard: LoggingGuard,
    plan: SinkPlan,
    file_failure: Option<(PathBuf, io::Error)>,
}

/// Build the filter and fmt layers for `config`, writing console output to
/// `console`.
fn build_stack<W>(
    config: &LogConfig,
    silent: &SilentMode,
    console: W,
) -> LogStack<impl tracing::Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = parse_level(&config.level);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let plan = plan_sinks(config, silent.is_silent());

    let mut file_failure = None;
    let file_writer = match plan.file.as_deref().map(|p| (p, open_log_file(p))) {
        Some((_, Ok(file))) => Some(tracing_appender::non_blocking(file)),
        Some((path, Err(e))) => {
            file_failure = Some((path.to_path_buf(), e));
            None
        }
        None => None,
    };
    let (file_writer, file_guard) = match file_writer {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };

    // Console layer stays installed while silent; the writer checks the flag.
    let json = config.is_json();
    let console_layer = if json {
        fmt::layer().json().with_writer(console).boxed()
    } else {
        fmt::layer().with_writer(console).boxed()
    };

    let file_layer = file_writer.map(|writer| {
        if json {
            fmt::layer().json().with_ansi(false).with_writer(writer).boxed()
        } else {
            fmt::layer().with_ansi(false).with_writer(writer).boxed()
        }
    });

    let subscriber = Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer);

    LogStack {
        subscriber,
        guard: LoggingGuard { _file: file_guard },
        plan,
        file_failure,
    }
}

/// Emit the records that describe how logging came up.
fn announce(
    config: &LogConfig,
    silent: &SilentMode,
    plan: &SinkPlan,
    file_failure: Option<(PathBuf, io::Error)>,
) {
    if let Some((path, e)) = file_failure {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to open log file, logging to console only"
        );
    }

    tracing::debug!(
        level = %parse_level(&config.level),
        format = %config.format,
        file = ?plan.file,
        silent = silent.is_silent(),
        "Logging initialized"
    );
}

/// Install the global subscriber described by `config`.
pub fn init_logging(
    config: &LogConfig,
    silent: &SilentMode,
) -> Result<LoggingGuard, LoggingError> {
    let stack = build_stack(config, silent, ConsoleWriter::new(silent.clone()));
    stack.subscriber.try_init()?;
    announce(config, silent, &stack.plan, stack.file_failure);
    Ok(stack.guard)
}

/// A console-only subscriber for use before configuration is loaded.
///
/// Install it with `tracing::subscriber::with_default` around the first
/// configuration load so validation errors reach the operator.
pub fn bootstrap_subscriber(silent: &SilentMode) -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(ConsoleWriter::new(silent.clone())))
}
