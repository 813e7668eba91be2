//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, DefaultLogger and the error-building macros.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::error::{Error, Result};
use std::time::SystemTime;

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_without_file_line() {
    let entry = LogEntry {
        severity: LogSeverity::Info,
        timestamp: SystemTime::now(),
        source: "galaxy3d::DeletionQueue".to_string(),
        message: "Queue created".to_string(),
        file: None,
        line: None,
    };

    assert_eq!(entry.severity, LogSeverity::Info);
    assert_eq!(entry.source, "galaxy3d::DeletionQueue");
    assert!(entry.file.is_none());
    assert!(entry.line.is_none());
}

#[test]
fn test_log_entry_clone() {
    let entry1 = LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "galaxy3d::vulkan".to_string(),
        message: "Device lost".to_string(),
        file: Some("vulkan_swapchain.rs"),
        line: Some(42),
    };

    let entry2 = entry1.clone();
    assert_eq!(entry1.severity, entry2.severity);
    assert_eq!(entry1.message, entry2.message);
    assert_eq!(entry2.file, Some("vulkan_swapchain.rs"));
    assert_eq!(entry2.line, Some(42));
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: "galaxy3d::test".to_string(),
            message: "message".to_string(),
            file: if severity == LogSeverity::Error { Some("log_tests.rs") } else { None },
            line: if severity == LogSeverity::Error { Some(1) } else { None },
        });
    }
}

// ============================================================================
// ERROR MACRO TESTS
// ============================================================================

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("galaxy3d::test", "failed with code {}", 7);
    assert_eq!(err, Error::BackendError("failed with code 7".to_string()));
}

#[test]
fn test_engine_warn_err_builds_backend_error() {
    let err = crate::engine_warn_err!("galaxy3d::test", "soft failure");
    assert_eq!(err, Error::BackendError("soft failure".to_string()));
}

#[test]
fn test_engine_bail_returns_early() {
    fn bails(flag: bool) -> Result<u32> {
        if flag {
            crate::engine_bail!("galaxy3d::test", "bailed out");
        }
        Ok(1)
    }
    assert_eq!(bails(false), Ok(1));
    assert_eq!(bails(true), Err(Error::BackendError("bailed out".to_string())));
}

#[test]
fn test_engine_bail_warn_returns_early() {
    fn bails() -> Result<()> {
        crate::engine_bail_warn!("galaxy3d::test", "skipping {}", "frame");
    }
    assert_eq!(bails(), Err(Error::BackendError("skipping frame".to_string())));
}
