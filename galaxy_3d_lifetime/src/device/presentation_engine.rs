/// PresentationEngine trait - platform image acquire/present calls

use std::time::Duration;
use crate::error::Result;

/// Result of a successful platform acquire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquiredImage {
    /// Index of the presentable image, stable for the swapchain's lifetime
    pub index: u32,
    /// The image is usable but the surface no longer matches exactly
    pub suboptimal: bool,
}

/// Outcome of a successful present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentStatus {
    Optimal,
    /// Presented, but the swapchain should be recreated soon
    Suboptimal,
}

/// Platform presentation engine (a Vulkan swapchain, for instance)
///
/// Owns the presentable images; the `PresentationRotator` owns the binary
/// semaphores it hands to `acquire_next_image` and `present`.
pub trait PresentationEngine {
    /// Presentable image handle
    type Image: Clone;
    /// Binary semaphore handle
    type Semaphore;

    /// Current presentable images, indexed by the indices `acquire_next_image` returns
    fn images(&self) -> Vec<Self::Image>;

    /// Create an unsignaled binary semaphore
    fn create_semaphore(&self) -> Result<Self::Semaphore>;

    /// Destroy a semaphore the device no longer references
    fn destroy_semaphore(&self, semaphore: Self::Semaphore);

    /// Acquire the next image, signaling `signal` once it is ready for rendering.
    ///
    /// Blocks up to `timeout`.
    ///
    /// # Errors
    ///
    /// - `Error::Timeout` / `Error::NotReady`: no image yet, retry later
    /// - `Error::OutOfDate`: recreate the swapchain
    /// - `Error::DeviceLost`: fatal
    fn acquire_next_image(&mut self, timeout: Duration, signal: &Self::Semaphore) -> Result<AcquiredImage>;

    /// Queue image `image_index` for presentation once `wait` is signaled
    fn present(&mut self, image_index: u32, wait: &Self::Semaphore) -> Result<PresentStatus>;
}
