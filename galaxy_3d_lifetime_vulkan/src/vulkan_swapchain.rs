/// Swapchain - Vulkan implementation of PresentationEngine
///
/// Owns the surface, the swapchain and its images. Semaphores are created
/// here but owned by the `PresentationRotator` driving this swapchain.

use galaxy_3d_lifetime::galaxy3d::{Error, Result};
use galaxy_3d_lifetime::galaxy3d::device::{AcquiredImage, PresentationEngine, PresentStatus};
use galaxy_3d_lifetime::{engine_bail, engine_bail_warn, engine_debug, engine_error};
use ash::vk;
use std::sync::Arc;
use std::time::Duration;

use crate::vulkan_context::GpuContext;
use crate::vulkan_result::vk_result_to_error;

/// Convert an acquire timeout to Vulkan nanoseconds (`u64::MAX` waits forever)
pub fn timeout_to_nanos(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX)
}

/// Pick the swapchain extent for a surface
///
/// Uses the surface's current extent when it has one, otherwise clamps the
/// requested size. A zero-sized surface (minimized window) cannot back a
/// swapchain: the caller retries once the window has a size again.
pub(crate) fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    width: u32,
    height: u32,
) -> Result<vk::Extent2D> {
    let extent = if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        vk::Extent2D {
            width: width.clamp(capabilities.min_image_extent.width, capabilities.max_image_extent.width),
            height: height.clamp(capabilities.min_image_extent.height, capabilities.max_image_extent.height),
        }
    };

    if extent.width == 0 || extent.height == 0 {
        engine_bail_warn!("galaxy3d::vulkan",
            "Cannot create a swapchain for a {}x{} surface", extent.width, extent.height);
    }
    Ok(extent)
}

/// Vulkan swapchain
pub struct Swapchain {
    /// Shared GPU context (device, swapchain loader)
    ctx: Arc<GpuContext>,
    /// Physical device for capabilities queries
    physical_device: vk::PhysicalDevice,

    /// Present queue
    present_queue: vk::Queue,

    /// Surface
    surface: vk::SurfaceKHR,
    surface_loader: ash::khr::surface::Instance,

    /// Swapchain
    swapchain: vk::SwapchainKHR,
    swapchain_loader: ash::khr::swapchain::Device,
    swapchain_images: Vec<vk::Image>,
    swapchain_format: vk::SurfaceFormatKHR,
    swapchain_extent: vk::Extent2D,
}

impl Swapchain {
    /// Create a new swapchain
    ///
    /// # Arguments
    ///
    /// * `ctx` - GPU context created with the swapchain extension enabled
    /// * `physical_device` - Vulkan physical device
    /// * `surface` - Window surface (owned by the swapchain from now on)
    /// * `surface_loader` - Surface loader
    /// * `present_queue` - Queue for presenting
    /// * `width` - Initial width, used when the surface leaves the extent to us
    /// * `height` - Initial height
    pub fn new(
        ctx: Arc<GpuContext>,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        surface_loader: ash::khr::surface::Instance,
        present_queue: vk::Queue,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let Some(swapchain_loader) = ctx.swapchain_loader.clone() else {
            engine_error!("galaxy3d::vulkan", "GpuContext was created without VK_KHR_swapchain");
            return Err(Error::InitializationFailed(
                "GpuContext was created without VK_KHR_swapchain".to_string(),
            ));
        };

        unsafe {
            // Choose surface format
            let surface_formats = surface_loader
                .get_physical_device_surface_formats(physical_device, surface)
                .map_err(|e| {
                    engine_error!("galaxy3d::vulkan", "Failed to query surface formats: {:?}", e);
                    Error::InitializationFailed(format!("Failed to get surface formats: {:?}", e))
                })?;

            let Some(&swapchain_format) = surface_formats
                .iter()
                .find(|f| f.format == vk::Format::B8G8R8A8_SRGB || f.format == vk::Format::R8G8B8A8_SRGB)
                .or_else(|| surface_formats.first())
            else {
                engine_error!("galaxy3d::vulkan", "Surface reports no formats");
                return Err(Error::InitializationFailed("Surface reports no formats".to_string()));
            };

            let mut this = Self {
                ctx,
                physical_device,
                present_queue,
                surface,
                surface_loader,
                swapchain: vk::SwapchainKHR::null(),
                swapchain_loader,
                swapchain_images: Vec::new(),
                swapchain_format,
                swapchain_extent: vk::Extent2D { width, height },
            };
            this.create_swapchain(width, height)?;

            engine_debug!("galaxy3d::vulkan", "Created swapchain with {} images ({}x{})",
                this.swapchain_images.len(), this.swapchain_extent.width, this.swapchain_extent.height);

            Ok(this)
        }
    }

    /// Recreate the swapchain for a new surface size
    ///
    /// The old swapchain is retired, not destroyed: queue the returned handle
    /// on the deferred deletion queue, then call `PresentationRotator::rebuild`.
    pub fn recreate(&mut self, width: u32, height: u32) -> Result<vk::SwapchainKHR> {
        let old_swapchain = self.swapchain;
        unsafe { self.create_swapchain(width, height)? };

        engine_debug!("galaxy3d::vulkan", "Recreated swapchain with {} images ({}x{})",
            self.swapchain_images.len(), self.swapchain_extent.width, self.swapchain_extent.height);

        Ok(old_swapchain)
    }

    /// Swapchain handle
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }

    pub fn format(&self) -> vk::Format {
        self.swapchain_format.format
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.swapchain_extent
    }

    /// Create a swapchain, passing the current one as `old_swapchain`
    unsafe fn create_swapchain(&mut self, width: u32, height: u32) -> Result<()> {
        // Query surface capabilities with new window size
        let surface_capabilities = self.surface_loader
            .get_physical_device_surface_capabilities(self.physical_device, self.surface)
            .map_err(|e| vk_result_to_error(e, "Failed to get surface capabilities"))?;

        let extent = choose_extent(&surface_capabilities, width, height)?;

        let image_count = surface_capabilities.min_image_count + 1;
        let image_count = if surface_capabilities.max_image_count > 0 {
            image_count.min(surface_capabilities.max_image_count)
        } else {
            image_count
        };

        let swapchain_create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(self.surface)
            .min_image_count(image_count)
            .image_format(self.swapchain_format.format)
            .image_color_space(self.swapchain_format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(surface_capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(vk::PresentModeKHR::FIFO)
            .clipped(true)
            .old_swapchain(self.swapchain);

        let swapchain = self.swapchain_loader
            .create_swapchain(&swapchain_create_info, None)
            .map_err(|e| vk_result_to_error(e, "Failed to create swapchain"))?;

        let images = match self.swapchain_loader.get_swapchain_images(swapchain) {
            Ok(images) => images,
            Err(e) => {
                self.swapchain_loader.destroy_swapchain(swapchain, None);
                return Err(vk_result_to_error(e, "Failed to get swapchain images"));
            }
        };

        self.swapchain = swapchain;
        self.swapchain_images = images;
        self.swapchain_extent = extent;
        Ok(())
    }
}

impl PresentationEngine for Swapchain {
    type Image = vk::Image;
    type Semaphore = vk::Semaphore;

    fn images(&self) -> Vec<vk::Image> {
        self.swapchain_images.clone()
    }

    fn create_semaphore(&self) -> Result<vk::Semaphore> {
        let create_info = vk::SemaphoreCreateInfo::default();
        unsafe {
            self.ctx.device.create_semaphore(&create_info, None)
                .map_err(|e| vk_result_to_error(e, "Failed to create semaphore"))
        }
    }

    fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        unsafe { self.ctx.device.destroy_semaphore(semaphore, None) }
    }

    fn acquire_next_image(&mut self, timeout: Duration, signal: &vk::Semaphore) -> Result<AcquiredImage> {
        let result = unsafe {
            self.swapchain_loader.acquire_next_image(
                self.swapchain,
                timeout_to_nanos(timeout),
                *signal,
                vk::Fence::null(),
            )
        };

        match result {
            Ok((index, suboptimal)) => Ok(AcquiredImage { index, suboptimal }),
            Err(e) => Err(vk_result_to_error(e, "Failed to acquire next swapchain image")),
        }
    }

    fn present(&mut self, image_index: u32, wait: &vk::Semaphore) -> Result<PresentStatus> {
        if image_index as usize >= self.swapchain_images.len() {
            engine_bail!("galaxy3d::vulkan",
                "present: image_index {} out of range (count: {})",
                image_index, self.swapchain_images.len());
        }

        let swapchains = [self.swapchain];
        let image_indices = [image_index];
        let wait_semaphores = [*wait];

        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        match unsafe { self.swapchain_loader.queue_present(self.present_queue, &present_info) } {
            Ok(false) => Ok(PresentStatus::Optimal),
            Ok(true) => Ok(PresentStatus::Suboptimal),
            Err(e) => Err(vk_result_to_error(e, "Failed to present swapchain image")),
        }
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            // Wait for device to finish
            self.ctx.device.device_wait_idle().ok();

            // Destroy swapchain
            self.swapchain_loader.destroy_swapchain(self.swapchain, None);

            // Destroy surface
            self.surface_loader.destroy_surface(self.surface, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_swapchain_tests.rs"]
mod tests;
