/// Galaxy3D Engine - global services shared by the visibility subsystem
///
/// Culling and LOD state is owned by the caller (Scene, Octree, LodSystem are
/// plain values). The only process-wide state is the logger, stored behind a
/// RwLock so a custom logger can be installed from any thread.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger state (initialized with DefaultLogger, minimum severity Info)
static LOG_STATE: OnceLock<RwLock<LogState>> = OnceLock::new();

/// Active logger and the minimum severity it receives
struct LogState {
    logger: Box<dyn Logger>,
    min_severity: LogSeverity,
}

impl LogState {
    fn new() -> Self {
        Self {
            logger: Box::new(DefaultLogger),
            min_severity: LogSeverity::Info,
        }
    }
}

fn log_state() -> &'static RwLock<LogState> {
    LOG_STATE.get_or_init(|| RwLock::new(LogState::new()))
}

// ===== PUBLIC API =====

/// Engine entry point for global services.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_visibility::galaxy3d::Engine;
/// use galaxy_3d_visibility::galaxy3d::log::LogSeverity;
///
/// // Show octree subdivision traces while tuning max_objects_per_node
/// Engine::set_log_level(LogSeverity::Trace);
/// ```
pub struct Engine;

impl Engine {
    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger,
    /// in-game console, test capture, etc.). The minimum severity is kept.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_visibility::galaxy3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut state) = log_state().write() {
            state.logger = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger, minimum severity Info)
    pub fn reset_logger() {
        if let Ok(mut state) = log_state().write() {
            *state = LogState::new();
        }
    }

    /// Set the minimum severity forwarded to the logger
    ///
    /// Entries below this level are dropped before a LogEntry is built.
    pub fn set_log_level(min_severity: LogSeverity) {
        if let Ok(mut state) = log_state().write() {
            state.min_severity = min_severity;
        }
    }

    /// Current minimum severity
    pub fn log_level() -> LogSeverity {
        log_state()
            .read()
            .map(|state| state.min_severity)
            .unwrap_or(LogSeverity::Info)
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source module (e.g., "galaxy3d::Octree")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if let Ok(state) = log_state().read() {
            if severity < state.min_severity {
                return;
            }
            state.logger.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
