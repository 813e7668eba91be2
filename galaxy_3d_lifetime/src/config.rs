/// Lifetime configuration
///
/// Sizes the deletion ring, the descriptor slot bitmaps and the acquire
/// timeout of one device context.

use std::time::Duration;
use crate::descriptor::DescriptorLimits;
use crate::error::{Error, Result};

/// Configuration for a `DeviceContext`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifetimeConfig {
    /// Frames the loop may have in flight on the device at once
    pub frames_in_flight: usize,
    /// Number of deletion epochs; a queued handle is destroyed this many
    /// frames later. Must be at least `frames_in_flight`.
    pub epoch_count: usize,
    /// Declared maxima of the bindless descriptor table
    pub descriptor_limits: DescriptorLimits,
    /// How long `acquire_image` may block. `Duration::MAX` waits forever.
    pub acquire_timeout: Duration,
}

impl Default for LifetimeConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            epoch_count: 3,
            descriptor_limits: DescriptorLimits::default(),
            acquire_timeout: Duration::MAX,
        }
    }
}

impl LifetimeConfig {
    /// Check the epoch ring against the frames in flight
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if there are no frames in flight,
    /// no epochs, or fewer epochs than frames in flight (handles would be
    /// destroyed while a submission still uses them).
    pub fn validate(&self) -> Result<()> {
        if self.frames_in_flight == 0 {
            return Err(Error::InitializationFailed(
                "frames_in_flight must be at least 1".to_string(),
            ));
        }
        if self.epoch_count == 0 {
            return Err(Error::InitializationFailed(
                "epoch_count must be at least 1".to_string(),
            ));
        }
        if self.epoch_count < self.frames_in_flight {
            return Err(Error::InitializationFailed(format!(
                "epoch_count ({}) must be at least frames_in_flight ({})",
                self.epoch_count, self.frames_in_flight
            )));
        }
        Ok(())
    }

    /// Same configuration with descriptor maxima clamped to the device limits
    pub fn with_device_limits(mut self, device: &DescriptorLimits) -> Self {
        self.descriptor_limits = self.descriptor_limits.clamped_to(device);
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
