//! Process-wide diagnostics for the notes core.
//!
//! # Responsibility
//! - Start the rolling file logger once per process.
//! - Keep log output to ids, tags and classifications.
//!
//! # Invariants
//! - Initialization never panics.
//! - A second call with the same level and directory is a no-op.
//! - A second call with a different level or directory is rejected.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "notes";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    status: LoggingStatus,
    _handle: LoggerHandle,
}

/// Level and directory of the running logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatus {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    EmptyLogDir,
    RelativeLogDir(String),
    CreateLogDir { dir: PathBuf, reason: String },
    Backend(String),
    LevelConflict { active: &'static str, requested: &'static str },
    DirConflict { active: PathBuf, requested: PathBuf },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyLogDir => write!(f, "log directory cannot be empty"),
            Self::RelativeLogDir(dir) => {
                write!(f, "log directory must be an absolute path, got `{dir}`")
            }
            Self::CreateLogDir { dir, reason } => write!(
                f,
                "failed to create log directory `{}`: {reason}",
                dir.display()
            ),
            Self::Backend(reason) => write!(f, "failed to start logger: {reason}"),
            Self::LevelConflict { active, requested } => write!(
                f,
                "logging already running at level `{active}`; refusing to switch to `{requested}`"
            ),
            Self::DirConflict { active, requested } => write!(
                f,
                "logging already writing to `{}`; refusing to switch to `{}`",
                active.display(),
                requested.display()
            ),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel`, `EmptyLogDir` or `RelativeLogDir` for bad input.
/// - `CreateLogDir` or `Backend` when the logger cannot start.
/// - `LevelConflict` or `DirConflict` when already running with another
///   configuration.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let requested = LoggingStatus {
        level: parse_level(level)?,
        log_dir: parse_log_dir(log_dir)?,
    };

    let active = ACTIVE.get_or_try_init(|| start_logger(&requested))?;
    ensure_same_config(&active.status, &requested)
}

/// `None` until [`init_logging`] has succeeded.
pub fn logging_status() -> Option<LoggingStatus> {
    ACTIVE.get().map(|active| active.status.clone())
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(config: &LoggingStatus) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|err| LoggingError::CreateLogDir {
        dir: config.log_dir.clone(),
        reason: err.to_string(),
    })?;

    let handle = Logger::try_with_str(config.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();

    info!(
        "event=logging_started module=logging status=ok level={} log_dir={} version={}",
        config.level,
        config.log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        status: config.clone(),
        _handle: handle,
    })
}

fn ensure_same_config(active: &LoggingStatus, requested: &LoggingStatus) -> Result<(), LoggingError> {
    if active.log_dir != requested.log_dir {
        return Err(LoggingError::DirConflict {
            active: active.log_dir.clone(),
            requested: requested.log_dir.clone(),
        });
    }
    if active.level != requested.level {
        return Err(LoggingError::LevelConflict {
            active: active.level,
            requested: requested.level,
        });
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::EmptyLogDir);
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::RelativeLogDir(trimmed.to_string()));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous(panic_info);
    }));
}

/// Flattens line breaks and caps `value` at `max_chars` characters.
pub(crate) fn sanitize_message(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut capped: String = flattened.chars().take(max_chars).collect();
    capped.push_str("...");
    capped
}
