/// Per-epoch lists of handles waiting for destruction

use crate::device::DeviceDestroyer;
use super::resource_kind::{PendingKinds, ResourceKind};

/// Handles queued while one epoch was current, one list per kind.
///
/// Lists are drained in place on reclaim so their capacity is reused by the
/// next frame that lands on this epoch.
pub(crate) struct DeletionRecord<D: DeviceDestroyer> {
    pending: PendingKinds,
    pub(crate) acceleration_structures: Vec<D::AccelerationStructure>,
    pub(crate) pipelines: Vec<D::Pipeline>,
    pub(crate) pipeline_layouts: Vec<D::PipelineLayout>,
    pub(crate) descriptor_pools: Vec<D::DescriptorPool>,
    pub(crate) descriptor_set_layouts: Vec<D::DescriptorSetLayout>,
    pub(crate) samplers: Vec<D::Sampler>,
    pub(crate) image_views: Vec<D::ImageView>,
    pub(crate) buffer_views: Vec<D::BufferView>,
    pub(crate) swapchains: Vec<D::Swapchain>,
    pub(crate) images: Vec<D::Image>,
    pub(crate) buffers: Vec<D::Buffer>,
    pub(crate) semaphores: Vec<D::Semaphore>,
    pub(crate) fences: Vec<D::Fence>,
    pub(crate) allocations: Vec<D::Allocation>,
}

impl<D: DeviceDestroyer> DeletionRecord<D> {
    pub(crate) fn new() -> Self {
        Self {
            pending: PendingKinds::empty(),
            acceleration_structures: Vec::new(),
            pipelines: Vec::new(),
            pipeline_layouts: Vec::new(),
            descriptor_pools: Vec::new(),
            descriptor_set_layouts: Vec::new(),
            samplers: Vec::new(),
            image_views: Vec::new(),
            buffer_views: Vec::new(),
            swapchains: Vec::new(),
            images: Vec::new(),
            buffers: Vec::new(),
            semaphores: Vec::new(),
            fences: Vec::new(),
            allocations: Vec::new(),
        }
    }

    /// Flag `kind` as pending and hand the record back for the push
    pub(crate) fn mark(&mut self, kind: ResourceKind) -> &mut Self {
        self.pending |= kind.flag();
        self
    }

    pub(crate) fn pending(&self) -> PendingKinds {
        self.pending
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.acceleration_structures.len()
            + self.pipelines.len()
            + self.pipeline_layouts.len()
            + self.descriptor_pools.len()
            + self.descriptor_set_layouts.len()
            + self.samplers.len()
            + self.image_views.len()
            + self.buffer_views.len()
            + self.swapchains.len()
            + self.images.len()
            + self.buffers.len()
            + self.semaphores.len()
            + self.fences.len()
            + self.allocations.len()
    }

    /// Destroy every handle in `ResourceKind::DESTRUCTION_ORDER`, leaving
    /// the record empty. Returns the number of handles destroyed.
    pub(crate) fn destroy_all(&mut self, device: &D) -> usize {
        let mut destroyed = 0;
        destroyed += drain(&mut self.acceleration_structures, |h| device.destroy_acceleration_structure(h));
        destroyed += drain(&mut self.pipelines, |h| device.destroy_pipeline(h));
        destroyed += drain(&mut self.pipeline_layouts, |h| device.destroy_pipeline_layout(h));
        destroyed += drain(&mut self.descriptor_pools, |h| device.destroy_descriptor_pool(h));
        destroyed += drain(&mut self.descriptor_set_layouts, |h| device.destroy_descriptor_set_layout(h));
        destroyed += drain(&mut self.samplers, |h| device.destroy_sampler(h));
        destroyed += drain(&mut self.image_views, |h| device.destroy_image_view(h));
        destroyed += drain(&mut self.buffer_views, |h| device.destroy_buffer_view(h));
        destroyed += drain(&mut self.swapchains, |h| device.destroy_swapchain(h));
        destroyed += drain(&mut self.images, |h| device.destroy_image(h));
        destroyed += drain(&mut self.buffers, |h| device.destroy_buffer(h));
        destroyed += drain(&mut self.semaphores, |h| device.destroy_semaphore(h));
        destroyed += drain(&mut self.fences, |h| device.destroy_fence(h));
        destroyed += drain(&mut self.allocations, |h| device.free_allocation(h));
        self.pending = PendingKinds::empty();
        destroyed
    }
}

fn drain<H, F: FnMut(H)>(list: &mut Vec<H>, destroy: F) -> usize {
    let count = list.len();
    list.drain(..).for_each(destroy);
    count
}
