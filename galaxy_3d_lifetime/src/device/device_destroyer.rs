/// DeviceDestroyer trait - per-category destroy primitives of a device

/// Destroy primitives for every resource category the deletion queue tracks
///
/// Implemented by backends (e.g. the Vulkan `GpuContext`). Each method
/// destroys one handle immediately; the deletion queue only calls them once
/// the device can no longer reference the handle.
///
/// Destruction is infallible at this layer. A backend whose primitive can
/// report failure (freeing a memory allocation, for instance) logs it as an
/// error and carries on.
pub trait DeviceDestroyer {
    type Buffer;
    type BufferView;
    type Image;
    type ImageView;
    type Sampler;
    type Pipeline;
    type PipelineLayout;
    type DescriptorPool;
    type DescriptorSetLayout;
    type Semaphore;
    type Fence;
    type Swapchain;
    type AccelerationStructure;
    /// Device memory allocation backing buffers and images
    type Allocation;

    fn destroy_buffer(&self, buffer: Self::Buffer);
    fn destroy_buffer_view(&self, view: Self::BufferView);
    fn destroy_image(&self, image: Self::Image);
    fn destroy_image_view(&self, view: Self::ImageView);
    fn destroy_sampler(&self, sampler: Self::Sampler);
    fn destroy_pipeline(&self, pipeline: Self::Pipeline);
    fn destroy_pipeline_layout(&self, layout: Self::PipelineLayout);
    fn destroy_descriptor_pool(&self, pool: Self::DescriptorPool);
    fn destroy_descriptor_set_layout(&self, layout: Self::DescriptorSetLayout);
    fn destroy_semaphore(&self, semaphore: Self::Semaphore);
    fn destroy_fence(&self, fence: Self::Fence);
    fn destroy_swapchain(&self, swapchain: Self::Swapchain);
    fn destroy_acceleration_structure(&self, acceleration_structure: Self::AccelerationStructure);
    fn free_allocation(&self, allocation: Self::Allocation);
}
