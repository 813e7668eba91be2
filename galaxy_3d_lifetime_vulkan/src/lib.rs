/*!
# Galaxy 3D Lifetime - Vulkan Backend

Vulkan implementation of the galaxy_3d_lifetime backend traits.

This crate provides:
- `GpuContext`: device, allocator and extension loaders, implementing
  `DeviceDestroyer` (including `gpu-allocator` frees)
- `VulkanDescriptorTable`: update-after-bind bindless descriptor set,
  implementing `DescriptorTable`
- `Swapchain`: surface + swapchain, implementing `PresentationEngine`
- `vk_result_to_error`: mapping of Vulkan result codes onto lifetime errors

# Example

```no_run
use galaxy_3d_lifetime::galaxy3d::{DeviceContext, LifetimeConfig};
use galaxy_3d_lifetime_vulkan::galaxy3d::{GpuContext, VulkanDescriptorTable};
use std::sync::Arc;

# fn run(instance: ash::Instance, device: ash::Device, physical_device: ash::vk::PhysicalDevice)
#     -> galaxy_3d_lifetime::galaxy3d::Result<()> {
let allocator = GpuContext::create_allocator(&instance, &device, physical_device, false)?;
let ctx = Arc::new(GpuContext::new(&instance, device, allocator, true, false));

let device_limits = GpuContext::device_descriptor_limits(&instance, physical_device, false);
let config = LifetimeConfig::default().with_device_limits(&device_limits);
let table = VulkanDescriptorTable::new(Arc::clone(&ctx), &config.descriptor_limits)?;
let mut context = DeviceContext::new(ctx, table, config)?;
context.begin_frame();
# Ok(())
# }
```
*/

// Vulkan implementation modules
mod vulkan_context;
mod vulkan_destroyer;
mod vulkan_descriptor_table;
mod vulkan_swapchain;
mod vulkan_result;

// Main galaxy3d namespace module
pub mod galaxy3d {
    pub use crate::vulkan_context::GpuContext;
    pub use crate::vulkan_descriptor_table::{category_binding, category_descriptor_type, VulkanDescriptorTable};
    pub use crate::vulkan_swapchain::{timeout_to_nanos, Swapchain};
    pub use crate::vulkan_result::vk_result_to_error;
}
