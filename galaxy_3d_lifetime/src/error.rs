//! Error types for the Galaxy3D lifetime core
//!
//! Errors fall in four families:
//! - exhaustion (`SlotsExhausted`, `OutOfMemory`): recoverable, caller-visible
//! - timing (`Timeout`, `NotReady`, `OutOfDate`): retry on a later frame
//! - device-fatal (`DeviceLost`, `BackendError`): tear the device context down
//! - misuse (`UnexpectedState`, `InvalidResource`): programming errors

use std::fmt;
use crate::descriptor::DescriptorCategory;

/// Result type for Galaxy3D lifetime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D lifetime errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (Vulkan, DirectX, etc.)
    BackendError(String),

    /// Storage for a bitmap or device object could not be allocated
    OutOfMemory,

    /// Invalid resource handed to an operation (wrong category, dead slot...)
    InvalidResource(String),

    /// Initialization failed (bad configuration, reservation failure)
    InitializationFailed(String),

    /// Every slot of a descriptor category is live
    SlotsExhausted {
        /// Category that ran out of slots
        category: DescriptorCategory,
        /// Declared maximum for that category
        capacity: u32,
    },

    /// The platform acquire timed out before an image became available
    Timeout,

    /// No image was available and the caller asked not to block
    NotReady,

    /// The presentation surface changed and the swapchain must be rebuilt
    OutOfDate,

    /// The device was lost; nothing on it can be trusted anymore
    DeviceLost,

    /// An internal invariant was violated by the caller
    UnexpectedState(String),
}

impl Error {
    /// Whether the frame loop may retry or degrade gracefully (skip a frame,
    /// recreate the swapchain) after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::SlotsExhausted { .. }
                | Error::OutOfMemory
                | Error::Timeout
                | Error::NotReady
                | Error::OutOfDate
        )
    }

    /// Whether the whole device context has to be torn down.
    pub fn is_device_fatal(&self) -> bool {
        matches!(self, Error::DeviceLost | Error::BackendError(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::SlotsExhausted { category, capacity } => write!(
                f,
                "Descriptor slots exhausted: all {} {} slots are live",
                capacity,
                category.name()
            ),
            Error::Timeout => write!(f, "Timed out waiting for a presentable image"),
            Error::NotReady => write!(f, "No presentable image ready"),
            Error::OutOfDate => write!(f, "Swapchain out of date"),
            Error::DeviceLost => write!(f, "Device lost"),
            Error::UnexpectedState(msg) => write!(f, "Unexpected state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
