//! Integration tests for the Vulkan lifetime backend
//!
//! These tests create a headless Vulkan device (no window, no surface).
//! All tests require a GPU and are marked with #[ignore].
//!
//! Run with: cargo test --test vulkan_lifetime_tests -- --ignored

use galaxy_3d_lifetime::galaxy3d::descriptor::{BufferRange, DescriptorCategory, DescriptorLimits, DescriptorResource};
use galaxy_3d_lifetime::galaxy3d::utils::OwnedHandle;
use galaxy_3d_lifetime::galaxy3d::{DeviceContext, LifetimeConfig};
use galaxy_3d_lifetime_vulkan::galaxy3d::{GpuContext, VulkanDescriptorTable};
use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use gpu_allocator::MemoryLocation;
use std::sync::Arc;

/// Headless instance + device with the descriptor indexing features the
/// bindless table needs
struct TestDevice {
    _entry: ash::Entry,
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    device: ash::Device,
}

impl TestDevice {
    fn new() -> Self {
        unsafe {
            let entry = ash::Entry::load().unwrap();
            let app_info = vk::ApplicationInfo::default()
                .application_name(c"Galaxy3D Lifetime Tests")
                .api_version(vk::API_VERSION_1_2);
            let instance = entry
                .create_instance(&vk::InstanceCreateInfo::default().application_info(&app_info), None)
                .unwrap();

            let physical_device = instance.enumerate_physical_devices().unwrap()[0];
            let queue_family = instance
                .get_physical_device_queue_family_properties(physical_device)
                .iter()
                .position(|q| q.queue_flags.contains(vk::QueueFlags::GRAPHICS))
                .unwrap() as u32;

            let priorities = [1.0];
            let queue_infos = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(queue_family)
                .queue_priorities(&priorities)];
            let mut indexing = vk::PhysicalDeviceDescriptorIndexingFeatures::default()
                .runtime_descriptor_array(true)
                .descriptor_binding_partially_bound(true)
                .descriptor_binding_update_unused_while_pending(true)
                .descriptor_binding_storage_buffer_update_after_bind(true)
                .descriptor_binding_sampled_image_update_after_bind(true)
                .descriptor_binding_storage_image_update_after_bind(true);
            let device_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_infos)
                .push_next(&mut indexing);
            let device = instance.create_device(physical_device, &device_info, None).unwrap();

            Self { _entry: entry, instance, physical_device, device }
        }
    }

    fn create_buffer(&self, ctx: &GpuContext, size: u64) -> (vk::Buffer, Allocation) {
        unsafe {
            let info = vk::BufferCreateInfo::default()
                .size(size)
                .usage(vk::BufferUsageFlags::STORAGE_BUFFER)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);
            let buffer = self.device.create_buffer(&info, None).unwrap();
            let requirements = self.device.get_buffer_memory_requirements(buffer);
            let allocation = ctx
                .allocator
                .lock()
                .unwrap()
                .allocate(&AllocationCreateDesc {
                    name: "lifetime test buffer",
                    requirements,
                    location: MemoryLocation::GpuOnly,
                    linear: true,
                    allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                })
                .unwrap();
            self.device
                .bind_buffer_memory(buffer, allocation.memory(), allocation.offset())
                .unwrap();
            (buffer, allocation)
        }
    }

    fn destroy(self) {
        unsafe {
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}

fn test_limits() -> DescriptorLimits {
    DescriptorLimits {
        storage_buffers: 64,
        uniform_buffers: 0,
        samplers: 0,
        sampled_images: 64,
        storage_images: 16,
        acceleration_structures: 0,
    }
}

// ============================================================================
// DEVICE CONTEXT TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_vulkan_device_limits_are_reported() {
    let test_device = TestDevice::new();
    let limits = GpuContext::device_descriptor_limits(&test_device.instance, test_device.physical_device, false);
    assert!(limits.storage_buffers > 0);
    assert_eq!(limits.acceleration_structures, 0);
    test_device.destroy();
}

#[test]
#[ignore] // Requires GPU
fn test_vulkan_retire_buffer_through_epochs() {
    let test_device = TestDevice::new();
    let allocator = GpuContext::create_allocator(
        &test_device.instance,
        &test_device.device,
        test_device.physical_device,
        false,
    )
    .unwrap();
    let ctx = Arc::new(GpuContext::new(&test_device.instance, test_device.device.clone(), allocator, false, false));

    let device_limits = GpuContext::device_descriptor_limits(&test_device.instance, test_device.physical_device, false);
    let config = LifetimeConfig { descriptor_limits: test_limits(), ..Default::default() }
        .with_device_limits(&device_limits);
    let table = VulkanDescriptorTable::new(Arc::clone(&ctx), &config.descriptor_limits).unwrap();
    let mut context = DeviceContext::new(Arc::clone(&ctx), table, config).unwrap();

    for _ in 0..8 {
        context.begin_frame();
        let (buffer, allocation) = test_device.create_buffer(&ctx, 256);
        let slot = context
            .add_descriptor(DescriptorResource::StorageBuffer(BufferRange::whole(buffer)))
            .unwrap();
        assert_eq!(slot.category(), DescriptorCategory::StorageBuffer);
        context.retire_buffer(OwnedHandle::new(buffer), OwnedHandle::new(allocation), Some(slot));
        unsafe { test_device.device.device_wait_idle().unwrap() };
    }
    assert_eq!(context.deletion_queue().pending_count(), 6);

    // Device idle: destroy the rest, then the table, then the allocator
    drop(context);
    drop(ctx);
    test_device.destroy();
}
