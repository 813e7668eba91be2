/// Epoch-based deferred deletion of device objects
///
/// The queue never asks the device what has completed. It relies on one
/// external invariant: the frame loop never has more frames in flight than
/// there are epochs. Under that invariant, by the time an epoch index comes
/// back around every submission recorded while it was current has retired,
/// and its handles can be destroyed.

use std::sync::Arc;
use crate::device::DeviceDestroyer;
use crate::error::{Error, Result};
use crate::{engine_debug, engine_error, engine_trace};
use super::deletion_record::DeletionRecord;
use super::resource_kind::{PendingKinds, ResourceKind};

/// Ring of per-epoch deletion records
///
/// A handle queued while epoch `E` is current is destroyed by the
/// `epoch_count`-th call to `advance_epoch` after it was queued, never
/// earlier, and exactly once. Dropping the queue destroys everything still
/// pending: by then the device must be idle.
///
/// # Example
///
/// ```ignore
/// let mut queue = DeferredDeletionQueue::new(device, 3)?;
/// queue.queue_buffer_deletion(old_buffer);
/// queue.queue_allocation_deletion(old_allocation);
///
/// // Once per frame, after waiting for the oldest frame's fence:
/// queue.advance_epoch();
/// ```
pub struct DeferredDeletionQueue<D: DeviceDestroyer> {
    device: Arc<D>,
    epochs: Box<[DeletionRecord<D>]>,
    current_epoch: usize,
}

impl<D: DeviceDestroyer> DeferredDeletionQueue<D> {
    /// Create a queue with `epoch_count` epochs, starting at epoch 0
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if `epoch_count` is 0.
    pub fn new(device: Arc<D>, epoch_count: usize) -> Result<Self> {
        if epoch_count == 0 {
            engine_error!("galaxy3d::DeletionQueue", "Deletion queue needs at least one epoch");
            return Err(Error::InitializationFailed(
                "Deletion queue needs at least one epoch".to_string(),
            ));
        }

        let epochs = (0..epoch_count).map(|_| DeletionRecord::new()).collect();
        engine_debug!("galaxy3d::DeletionQueue", "Created deferred deletion queue with {} epochs", epoch_count);

        Ok(Self {
            device,
            epochs,
            current_epoch: 0,
        })
    }

    /// Device the queued handles belong to
    pub fn device(&self) -> &Arc<D> {
        &self.device
    }

    fn current(&mut self, kind: ResourceKind) -> &mut DeletionRecord<D> {
        self.epochs[self.current_epoch].mark(kind)
    }

    // ===== QUEUEING =====

    pub fn queue_acceleration_structure_deletion(&mut self, acceleration_structure: D::AccelerationStructure) {
        self.current(ResourceKind::AccelerationStructure)
            .acceleration_structures
            .push(acceleration_structure);
    }

    pub fn queue_pipeline_deletion(&mut self, pipeline: D::Pipeline) {
        self.current(ResourceKind::Pipeline).pipelines.push(pipeline);
    }

    pub fn queue_pipeline_layout_deletion(&mut self, layout: D::PipelineLayout) {
        self.current(ResourceKind::PipelineLayout).pipeline_layouts.push(layout);
    }

    pub fn queue_descriptor_pool_deletion(&mut self, pool: D::DescriptorPool) {
        self.current(ResourceKind::DescriptorPool).descriptor_pools.push(pool);
    }

    pub fn queue_descriptor_set_layout_deletion(&mut self, layout: D::DescriptorSetLayout) {
        self.current(ResourceKind::DescriptorSetLayout)
            .descriptor_set_layouts
            .push(layout);
    }

    pub fn queue_sampler_deletion(&mut self, sampler: D::Sampler) {
        self.current(ResourceKind::Sampler).samplers.push(sampler);
    }

    pub fn queue_image_view_deletion(&mut self, view: D::ImageView) {
        self.current(ResourceKind::ImageView).image_views.push(view);
    }

    pub fn queue_buffer_view_deletion(&mut self, view: D::BufferView) {
        self.current(ResourceKind::BufferView).buffer_views.push(view);
    }

    pub fn queue_swapchain_deletion(&mut self, swapchain: D::Swapchain) {
        self.current(ResourceKind::Swapchain).swapchains.push(swapchain);
    }

    pub fn queue_image_deletion(&mut self, image: D::Image) {
        self.current(ResourceKind::Image).images.push(image);
    }

    pub fn queue_buffer_deletion(&mut self, buffer: D::Buffer) {
        self.current(ResourceKind::Buffer).buffers.push(buffer);
    }

    pub fn queue_semaphore_deletion(&mut self, semaphore: D::Semaphore) {
        self.current(ResourceKind::Semaphore).semaphores.push(semaphore);
    }

    pub fn queue_fence_deletion(&mut self, fence: D::Fence) {
        self.current(ResourceKind::Fence).fences.push(fence);
    }

    /// Queue a memory allocation; it is freed after every resource of the same epoch
    pub fn queue_allocation_deletion(&mut self, allocation: D::Allocation) {
        self.current(ResourceKind::Allocation).allocations.push(allocation);
    }

    // ===== RECLAIM =====

    /// Move to the next epoch and destroy what was queued the last time it was current.
    ///
    /// Returns the number of handles destroyed.
    pub fn advance_epoch(&mut self) -> usize {
        self.current_epoch = (self.current_epoch + 1) % self.epochs.len();
        self.clear_epoch(self.current_epoch)
    }

    /// Destroy every handle recorded in `epoch` and mark it empty.
    ///
    /// No-op (zero destroy calls) on an empty epoch. The caller guarantees the
    /// device no longer references anything queued there.
    pub fn clear_epoch(&mut self, epoch: usize) -> usize {
        debug_assert!(epoch < self.epochs.len(), "epoch {} out of range", epoch);

        let device = &*self.device;
        let record = &mut self.epochs[epoch];
        if record.is_empty() {
            return 0;
        }

        let destroyed = record.destroy_all(device);
        engine_trace!("galaxy3d::DeletionQueue", "Reclaimed {} handles from epoch {}", destroyed, epoch);
        destroyed
    }

    /// Destroy everything pending in every epoch. The device must be idle.
    pub fn flush(&mut self) -> usize {
        let destroyed: usize = (0..self.epochs.len()).map(|e| self.clear_epoch(e)).sum();
        if destroyed > 0 {
            engine_debug!("galaxy3d::DeletionQueue", "Flushed {} pending handles", destroyed);
        }
        destroyed
    }

    // ===== STATE =====

    /// Index of the epoch new deletions are recorded in
    pub fn current_epoch(&self) -> usize {
        self.current_epoch
    }

    /// Number of epochs in the ring (the reclaim look-back distance)
    pub fn epoch_count(&self) -> usize {
        self.epochs.len()
    }

    /// Whether `epoch` has nothing pending
    pub fn is_epoch_empty(&self, epoch: usize) -> bool {
        self.epochs[epoch].is_empty()
    }

    /// Kinds with pending handles in `epoch`
    pub fn pending_kinds(&self, epoch: usize) -> PendingKinds {
        self.epochs[epoch].pending()
    }

    /// Number of handles pending in `epoch`
    pub fn pending_in_epoch(&self, epoch: usize) -> usize {
        self.epochs[epoch].len()
    }

    /// Number of handles pending across all epochs
    pub fn pending_count(&self) -> usize {
        self.epochs.iter().map(DeletionRecord::len).sum()
    }
}

impl<D: DeviceDestroyer> Drop for DeferredDeletionQueue<D> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
#[path = "deletion_queue_tests.rs"]
mod tests;
