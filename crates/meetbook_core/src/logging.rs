//! Process-wide log sink for the meeting store.
//!
//! # Responsibility
//! - Route the crate's `store_load` / `store_save` / `meeting_*` events into
//!   size-rotated files, by default in a `logs` directory beside the snapshot.
//! - Record at init which snapshot the process works on, so later events can
//!   be read against it.
//! - Capture panics with the snapshot path and a flattened payload.
//!
//! # Invariants
//! - At most one logger per process; repeating init with equal settings is a
//!   no-op, different settings are rejected.
//! - Init never panics.
//! - Before init, `log` macros throughout the crate are no-ops.

use crate::config::StoreConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "meetbook";
const LOG_DIR_NAME: &str = "logs";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 4 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
// Meeting names can end up in panic messages.
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    settings: LogSettings,
    _logger: LoggerHandle,
}

/// Logging setup failures.
#[derive(Debug)]
pub enum LoggingError {
    /// Level string is not a `log` level filter.
    InvalidLevel(String),
    /// Log directory must be absolute.
    RelativeLogDir(PathBuf),
    /// Log directory could not be resolved or created.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// `flexi_logger` refused to start.
    Backend(FlexiLoggerError),
    /// A logger with other settings is already running.
    AlreadyInitialized {
        active: LogSettings,
        requested: LogSettings,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected off|error|warn|info|debug|trace"
            ),
            Self::RelativeLogDir(path) => {
                write!(f, "log directory must be absolute, got `{}`", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "failed to prepare log directory `{}`: {source}", path.display())
            }
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::AlreadyInitialized { active, requested } => write!(
                f,
                "logging already initialized with {active}; refusing to switch to {requested}"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::InvalidLevel(_) | Self::RelativeLogDir(_) | Self::AlreadyInitialized { .. } => {
                None
            }
        }
    }
}

impl From<FlexiLoggerError> for LoggingError {
    fn from(value: FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

/// Level filter plus the directory the rotated files go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    level: LevelFilter,
    log_dir: PathBuf,
}

impl LogSettings {
    /// # Errors
    /// - `InvalidLevel` when `level` does not parse as a `LevelFilter`
    ///   (case-insensitive).
    /// - `RelativeLogDir` when `log_dir` is relative.
    pub fn new(level: &str, log_dir: impl Into<PathBuf>) -> Result<Self, LoggingError> {
        let level = parse_level(level)?;
        let log_dir = log_dir.into();
        if !log_dir.is_absolute() {
            return Err(LoggingError::RelativeLogDir(log_dir));
        }
        Ok(Self { level, log_dir })
    }

    /// Logs into `<snapshot dir>/logs`, resolving a relative snapshot path
    /// against the working directory.
    pub fn beside_store(level: &str, store: &StoreConfig) -> Result<Self, LoggingError> {
        let level = parse_level(level)?;
        let store_dir = match store.store_path().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let store_dir = if store_dir.is_absolute() {
            store_dir
        } else {
            let cwd = std::env::current_dir().map_err(|source| LoggingError::Io {
                path: store_dir.clone(),
                source,
            })?;
            cwd.join(store_dir)
        };
        Ok(Self {
            level,
            log_dir: store_dir.join(LOG_DIR_NAME),
        })
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

impl Display for LogSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "level={} log_dir={}",
            self.level.as_str().to_ascii_lowercase(),
            self.log_dir.display()
        )
    }
}

/// Starts the file logger and records which snapshot `store` points at.
///
/// Calling again with equal settings only logs the (possibly new) snapshot.
///
/// # Errors
/// - `AlreadyInitialized` when a logger with other settings is running.
/// - `Io` / `Backend` when the directory or the backend cannot be set up.
pub fn init_logging(settings: &LogSettings, store: &StoreConfig) -> Result<(), LoggingError> {
    let mut started = false;
    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        std::fs::create_dir_all(&settings.log_dir).map_err(|source| LoggingError::Io {
            path: settings.log_dir.clone(),
            source,
        })?;

        let logger = Logger::with(LogSpecification::builder().default(settings.level).build())
            .log_to_file(
                FileSpec::default()
                    .directory(settings.log_dir.as_path())
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()?;

        install_panic_hook_once(store.store_path().to_path_buf());
        started = true;

        Ok(LoggingState {
            settings: settings.clone(),
            _logger: logger,
        })
    })?;

    if state.settings != *settings {
        return Err(LoggingError::AlreadyInitialized {
            active: state.settings.clone(),
            requested: settings.clone(),
        });
    }

    let snapshot = match std::fs::metadata(store.store_path()) {
        Ok(meta) => format!("snapshot_bytes={}", meta.len()),
        Err(_) => "snapshot_bytes=missing".to_string(),
    };
    info!(
        "event=logging_init module=logging status=ok result={} {} store_path={} {} version={}",
        if started { "started" } else { "already_active" },
        state.settings,
        store.store_path().display(),
        snapshot,
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

/// Settings of the running logger, or `None` before init.
pub fn logging_status() -> Option<LogSettings> {
    LOGGING_STATE.get().map(|state| state.settings.clone())
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::InvalidLevel(level.trim().to_string()))
}

fn install_panic_hook_once(store_path: PathBuf) {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic_captured module=logging status=error store_path={} location={} payload={}",
            store_path.display(),
            location,
            panic_payload_summary(panic_info)
        );
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    flatten_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn flatten_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
