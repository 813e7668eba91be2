/// GpuContext - Shared device state for the Vulkan lifetime backend
///
/// Contains everything needed to destroy device objects later:
/// - Device for Vulkan API calls
/// - Allocator for memory frees
/// - Extension loaders for swapchains and acceleration structures

use galaxy_3d_lifetime::galaxy3d::{Error, Result};
use galaxy_3d_lifetime::galaxy3d::descriptor::DescriptorLimits;
use galaxy_3d_lifetime::engine_error;
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use std::sync::{Arc, Mutex};

/// Shared GPU context for all Vulkan lifetime objects.
///
/// Shared (via `Arc`) by the deferred deletion queue, the bindless table and
/// the swapchain. Device and instance destruction stay with the application,
/// after every `Arc` has been dropped.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator (shared, requires mutex for thread safety)
    pub allocator: Arc<Mutex<Allocator>>,

    /// Swapchain loader, if `VK_KHR_swapchain` is enabled
    pub swapchain_loader: Option<ash::khr::swapchain::Device>,

    /// Acceleration structure loader, if `VK_KHR_acceleration_structure` is enabled
    pub acceleration_structure_loader: Option<ash::khr::acceleration_structure::Device>,
}

impl GpuContext {
    /// Create a new GPU context
    ///
    /// # Arguments
    ///
    /// * `instance` - Vulkan instance (for extension loaders)
    /// * `device` - Vulkan logical device
    /// * `allocator` - GPU memory allocator
    /// * `swapchain` - Whether `VK_KHR_swapchain` is enabled on `device`
    /// * `ray_tracing` - Whether `VK_KHR_acceleration_structure` is enabled on `device`
    pub fn new(
        instance: &ash::Instance,
        device: ash::Device,
        allocator: Arc<Mutex<Allocator>>,
        swapchain: bool,
        ray_tracing: bool,
    ) -> Self {
        let swapchain_loader = swapchain.then(|| ash::khr::swapchain::Device::new(instance, &device));
        let acceleration_structure_loader =
            ray_tracing.then(|| ash::khr::acceleration_structure::Device::new(instance, &device));

        Self {
            device,
            allocator,
            swapchain_loader,
            acceleration_structure_loader,
        }
    }

    /// Create the allocator `new` expects
    pub fn create_allocator(
        instance: &ash::Instance,
        device: &ash::Device,
        physical_device: vk::PhysicalDevice,
        buffer_device_address: bool,
    ) -> Result<Arc<Mutex<Allocator>>> {
        let allocator = Allocator::new(&AllocatorCreateDesc {
            instance: instance.clone(),
            device: device.clone(),
            physical_device,
            debug_settings: Default::default(),
            buffer_device_address,
            allocation_sizes: Default::default(),
        })
        .map_err(|e| {
            engine_error!("galaxy3d::vulkan", "Failed to create GPU allocator: {:?}", e);
            Error::InitializationFailed(format!("Failed to create allocator: {:?}", e))
        })?;

        Ok(Arc::new(Mutex::new(allocator)))
    }

    /// Update-after-bind descriptor limits reported by the device
    ///
    /// Feed the result to `LifetimeConfig::with_device_limits`.
    pub fn device_descriptor_limits(
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        ray_tracing: bool,
    ) -> DescriptorLimits {
        let mut indexing = vk::PhysicalDeviceDescriptorIndexingProperties::default();
        let mut acceleration = vk::PhysicalDeviceAccelerationStructurePropertiesKHR::default();

        unsafe {
            let mut properties = vk::PhysicalDeviceProperties2::default().push_next(&mut indexing);
            if ray_tracing {
                properties = properties.push_next(&mut acceleration);
            }
            instance.get_physical_device_properties2(physical_device, &mut properties);
        }

        bindless_limits(&indexing, ray_tracing.then_some(&acceleration))
    }
}

/// Per-category maxima for a bindless set visible to every shader stage
///
/// Each category is bounded by both its per-set and its per-stage
/// update-after-bind limit. If the categories together still exceed the
/// per-stage resource budget, they are scaled down in proportion.
pub(crate) fn bindless_limits(
    indexing: &vk::PhysicalDeviceDescriptorIndexingProperties,
    acceleration: Option<&vk::PhysicalDeviceAccelerationStructurePropertiesKHR>,
) -> DescriptorLimits {
    let limits = DescriptorLimits {
        storage_buffers: indexing.max_descriptor_set_update_after_bind_storage_buffers
            .min(indexing.max_per_stage_descriptor_update_after_bind_storage_buffers),
        uniform_buffers: indexing.max_descriptor_set_update_after_bind_uniform_buffers
            .min(indexing.max_per_stage_descriptor_update_after_bind_uniform_buffers),
        samplers: indexing.max_descriptor_set_update_after_bind_samplers
            .min(indexing.max_per_stage_descriptor_update_after_bind_samplers),
        sampled_images: indexing.max_descriptor_set_update_after_bind_sampled_images
            .min(indexing.max_per_stage_descriptor_update_after_bind_sampled_images),
        storage_images: indexing.max_descriptor_set_update_after_bind_storage_images
            .min(indexing.max_per_stage_descriptor_update_after_bind_storage_images),
        acceleration_structures: acceleration.map_or(0, |a| {
            a.max_descriptor_set_update_after_bind_acceleration_structures
                .min(a.max_per_stage_descriptor_update_after_bind_acceleration_structures)
        }),
    };

    let budget = indexing.max_per_stage_update_after_bind_resources as u64;
    let total = limits.total();
    if total <= budget {
        return limits;
    }

    let scale = |max: u32| (max as u64 * budget / total) as u32;
    DescriptorLimits {
        storage_buffers: scale(limits.storage_buffers),
        uniform_buffers: scale(limits.uniform_buffers),
        samplers: scale(limits.samplers),
        sampled_images: scale(limits.sampled_images),
        storage_images: scale(limits.storage_images),
        acceleration_structures: scale(limits.acceleration_structures),
    }
}

#[cfg(test)]
#[path = "vulkan_context_tests.rs"]
mod tests;
