//! Unit tests for Engine logging services
//!
//! IMPORTANT: LOG_STATE is a global OnceLock shared across all tests.
//! Tests that replace the logger or change the level are marked with
//! #[serial]; captured entries are filtered by source because unrelated
//! tests may log concurrently.

use crate::galaxy3d::Engine;
use crate::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

const TEST_SOURCE: &str = "galaxy3d::EngineTests";

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures entries from TEST_SOURCE only
struct TestLogger {
    entries: Arc<Mutex<Vec<(LogSeverity, String)>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<(LogSeverity, String)>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == TEST_SOURCE {
            self.entries.lock().unwrap().push((entry.severity, entry.message.clone()));
        }
    }
}

// ============================================================================
// LOGGER AND LEVEL
// ============================================================================

#[test]
#[serial]
fn test_set_logger_receives_entries() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    crate::engine_info!(TEST_SOURCE, "octree built with {} nodes", 9);
    crate::engine_warn!(TEST_SOURCE, "object outside bounds");

    let captured = entries.lock().unwrap().clone();
    assert_eq!(
        captured,
        vec![
            (LogSeverity::Info, "octree built with 9 nodes".to_string()),
            (LogSeverity::Warn, "object outside bounds".to_string()),
        ]
    );

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_log_level_filters_entries() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    crate::engine_trace!(TEST_SOURCE, "hidden at Info");
    Engine::set_log_level(LogSeverity::Trace);
    crate::engine_trace!(TEST_SOURCE, "visible at Trace");
    Engine::set_log_level(LogSeverity::Error);
    crate::engine_warn!(TEST_SOURCE, "hidden at Error");

    let captured = entries.lock().unwrap().clone();
    assert_eq!(captured, vec![(LogSeverity::Trace, "visible at Trace".to_string())]);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_restores_default_level() {
    Engine::set_log_level(LogSeverity::Debug);
    assert_eq!(Engine::log_level(), LogSeverity::Debug);

    Engine::reset_logger();

    assert_eq!(Engine::log_level(), LogSeverity::Info);
}

#[test]
#[serial]
fn test_engine_error_macro_records_location() {
    let locations = Arc::new(Mutex::new(Vec::new()));

    struct LocationLogger(Arc<Mutex<Vec<(Option<&'static str>, Option<u32>)>>>);
    impl Logger for LocationLogger {
        fn log(&self, entry: &LogEntry) {
            if entry.source == TEST_SOURCE {
                self.0.lock().unwrap().push((entry.file, entry.line));
            }
        }
    }

    Engine::set_logger(LocationLogger(locations.clone()));
    crate::engine_error!(TEST_SOURCE, "failed");

    let captured = locations.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    assert!(captured[0].0.is_some_and(|file| file.ends_with("engine_tests.rs")));
    assert!(captured[0].1.is_some());

    Engine::reset_logger();
}
