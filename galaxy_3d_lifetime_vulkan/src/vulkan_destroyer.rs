/// DeviceDestroyer implementation for GpuContext
///
/// Destroy calls are infallible on the Vulkan side. The two ways they can
/// still go wrong (a poisoned allocator lock, a missing extension loader) are
/// logged and the object is leaked rather than panicking mid-frame.

use galaxy_3d_lifetime::galaxy3d::device::DeviceDestroyer;
use galaxy_3d_lifetime::engine_error;
use ash::vk;
use gpu_allocator::vulkan::Allocation;

use crate::vulkan_context::GpuContext;

impl DeviceDestroyer for GpuContext {
    type Buffer = vk::Buffer;
    type BufferView = vk::BufferView;
    type Image = vk::Image;
    type ImageView = vk::ImageView;
    type Sampler = vk::Sampler;
    type Pipeline = vk::Pipeline;
    type PipelineLayout = vk::PipelineLayout;
    type DescriptorPool = vk::DescriptorPool;
    type DescriptorSetLayout = vk::DescriptorSetLayout;
    type Semaphore = vk::Semaphore;
    type Fence = vk::Fence;
    type Swapchain = vk::SwapchainKHR;
    type AccelerationStructure = vk::AccelerationStructureKHR;
    type Allocation = Allocation;

    fn destroy_buffer(&self, buffer: vk::Buffer) {
        unsafe { self.device.destroy_buffer(buffer, None) }
    }

    fn destroy_buffer_view(&self, view: vk::BufferView) {
        unsafe { self.device.destroy_buffer_view(view, None) }
    }

    fn destroy_image(&self, image: vk::Image) {
        unsafe { self.device.destroy_image(image, None) }
    }

    fn destroy_image_view(&self, view: vk::ImageView) {
        unsafe { self.device.destroy_image_view(view, None) }
    }

    fn destroy_sampler(&self, sampler: vk::Sampler) {
        unsafe { self.device.destroy_sampler(sampler, None) }
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        unsafe { self.device.destroy_pipeline(pipeline, None) }
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        unsafe { self.device.destroy_pipeline_layout(layout, None) }
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        unsafe { self.device.destroy_descriptor_pool(pool, None) }
    }

    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) {
        unsafe { self.device.destroy_descriptor_set_layout(layout, None) }
    }

    fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        unsafe { self.device.destroy_semaphore(semaphore, None) }
    }

    fn destroy_fence(&self, fence: vk::Fence) {
        unsafe { self.device.destroy_fence(fence, None) }
    }

    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        match &self.swapchain_loader {
            Some(loader) => unsafe { loader.destroy_swapchain(swapchain, None) },
            None => {
                engine_error!("galaxy3d::vulkan",
                    "Cannot destroy swapchain {:?}: VK_KHR_swapchain not enabled", swapchain);
            }
        }
    }

    fn destroy_acceleration_structure(&self, acceleration_structure: vk::AccelerationStructureKHR) {
        match &self.acceleration_structure_loader {
            Some(loader) => unsafe { loader.destroy_acceleration_structure(acceleration_structure, None) },
            None => {
                engine_error!("galaxy3d::vulkan",
                    "Cannot destroy acceleration structure {:?}: VK_KHR_acceleration_structure not enabled",
                    acceleration_structure);
            }
        }
    }

    fn free_allocation(&self, allocation: Allocation) {
        match self.allocator.lock() {
            Ok(mut allocator) => {
                if let Err(e) = allocator.free(allocation) {
                    engine_error!("galaxy3d::vulkan", "Failed to free GPU allocation: {:?}", e);
                }
            }
            Err(_) => {
                engine_error!("galaxy3d::vulkan", "GPU allocator lock poisoned, leaking allocation");
            }
        }
    }
}
