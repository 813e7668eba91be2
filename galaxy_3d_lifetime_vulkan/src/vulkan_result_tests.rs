//! Unit tests for vk::Result mapping
//!
//! Pure mapping, no GPU required.

use super::*;
use galaxy_3d_lifetime::galaxy3d::Engine;
use galaxy_3d_lifetime::galaxy3d::log::{LogEntry, LogSeverity, Logger};
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

#[test]
fn test_timing_codes_keep_their_variant() {
    assert_eq!(vk_result_to_error(vk::Result::TIMEOUT, "acquire"), Error::Timeout);
    assert_eq!(vk_result_to_error(vk::Result::NOT_READY, "acquire"), Error::NotReady);
    assert_eq!(vk_result_to_error(vk::Result::ERROR_OUT_OF_DATE_KHR, "present"), Error::OutOfDate);
}

#[test]
fn test_device_and_surface_loss_are_device_lost() {
    assert_eq!(vk_result_to_error(vk::Result::ERROR_DEVICE_LOST, "submit"), Error::DeviceLost);
    assert_eq!(vk_result_to_error(vk::Result::ERROR_SURFACE_LOST_KHR, "acquire"), Error::DeviceLost);
    assert!(vk_result_to_error(vk::Result::ERROR_DEVICE_LOST, "submit").is_device_fatal());
}

#[test]
fn test_memory_codes_are_out_of_memory() {
    assert_eq!(vk_result_to_error(vk::Result::ERROR_OUT_OF_HOST_MEMORY, "create"), Error::OutOfMemory);
    assert_eq!(vk_result_to_error(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY, "create"), Error::OutOfMemory);
}

#[test]
fn test_other_codes_are_backend_errors() {
    let error = vk_result_to_error(vk::Result::ERROR_INITIALIZATION_FAILED, "Failed to create semaphore");
    assert_eq!(
        error,
        Error::BackendError("Failed to create semaphore: ERROR_INITIALIZATION_FAILED".to_string())
    );
    assert!(!error.is_recoverable());
}

#[test]
fn test_timing_codes_are_recoverable() {
    for code in [vk::Result::TIMEOUT, vk::Result::NOT_READY, vk::Result::ERROR_OUT_OF_DATE_KHR] {
        assert!(vk_result_to_error(code, "acquire").is_recoverable(), "{:?}", code);
    }
}

#[test]
fn test_backend_errors_are_logged_with_location() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: Arc::clone(&entries) });

    let error = vk_result_to_error(vk::Result::ERROR_FEATURE_NOT_PRESENT, "Failed to create bindless pool");
    let timeout = vk_result_to_error(vk::Result::TIMEOUT, "Failed to create bindless pool");
    Engine::reset_logger();

    assert!(matches!(error, Error::BackendError(_)));
    assert_eq!(timeout, Error::Timeout);

    // Only the backend error is logged; timing codes are left to the caller
    let logged: Vec<LogEntry> = entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.message.starts_with("Failed to create bindless pool"))
        .cloned()
        .collect();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].severity, LogSeverity::Error);
    assert_eq!(logged[0].source, "galaxy3d::vulkan");
    assert_eq!(logged[0].message, "Failed to create bindless pool: ERROR_FEATURE_NOT_PRESENT");
    assert!(logged[0].file.is_some_and(|f| f.ends_with("vulkan_result.rs")));
}
