/// Per-device lifetime context
///
/// Bundles everything one device needs to retire resources safely: the
/// deferred deletion ring, the bindless slot allocator, the frame counter and
/// the resource ID generator. Nothing here is process-wide; two devices get
/// two independent contexts.
///
/// A retired resource's bindless slot follows the resource through the ring:
/// it stays live in the allocator until the epoch it was retired in is
/// reclaimed, so no frame still in flight can see the slot rewritten.

use std::sync::Arc;
use crate::config::LifetimeConfig;
use crate::deletion::DeferredDeletionQueue;
use crate::descriptor::{Descriptor, DescriptorResource, DescriptorSlotAllocator};
use crate::device::{DescriptorTable, DeviceDestroyer};
use crate::error::Result;
use crate::utils::OwnedHandle;
use crate::{engine_info, engine_trace};

/// Unique, increasing identifier of a resource created through a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Lifetime state of one device
///
/// # Frame loop
///
/// ```ignore
/// loop {
///     // wait for the fence of the frame that last used this slot, then:
///     context.begin_frame();
///     // record, submit, retire whatever this frame replaced
///     context.retire_buffer(old_buffer, old_allocation, Some(old_slot));
/// }
/// ```
pub struct DeviceContext<D: DeviceDestroyer, T: DescriptorTable> {
    config: LifetimeConfig,
    deletion_queue: DeferredDeletionQueue<D>,
    descriptors: DescriptorSlotAllocator<T>,
    /// Slots retired in each epoch, freed when the epoch is reclaimed
    retired_slots: Vec<Vec<Descriptor>>,
    frame_index: u64,
    next_resource_id: u64,
}

impl<D: DeviceDestroyer, T: DescriptorTable> DeviceContext<D, T> {
    /// Create a context from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if `config` does not validate or
    /// the slot bitmaps cannot be reserved.
    pub fn new(device: Arc<D>, table: T, config: LifetimeConfig) -> Result<Self> {
        config.validate()?;

        let deletion_queue = DeferredDeletionQueue::new(device, config.epoch_count)?;
        let descriptors = DescriptorSlotAllocator::new(table, &config.descriptor_limits)?;

        let retired_slots = (0..config.epoch_count).map(|_| Vec::new()).collect();

        engine_info!("galaxy3d::DeviceContext",
            "Device context ready ({} frames in flight, {} epochs)",
            config.frames_in_flight, config.epoch_count);

        Ok(Self {
            config,
            deletion_queue,
            descriptors,
            retired_slots,
            frame_index: 0,
            next_resource_id: 1,
        })
    }

    /// Start a new frame: advance the deletion epoch, destroying what was
    /// queued `epoch_count` frames ago and freeing the slots retired with it.
    ///
    /// Must only be called once the oldest in-flight frame has completed on
    /// the device. Returns the number of handles destroyed.
    pub fn begin_frame(&mut self) -> usize {
        self.frame_index += 1;
        let destroyed = self.deletion_queue.advance_epoch();
        self.release_slots(self.deletion_queue.current_epoch());
        destroyed
    }

    /// Number of `begin_frame` calls so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Hand out a new resource ID
    pub fn next_resource_id(&mut self) -> ResourceId {
        let id = ResourceId(self.next_resource_id);
        self.next_resource_id += 1;
        id
    }

    pub fn config(&self) -> &LifetimeConfig {
        &self.config
    }

    pub fn deletion_queue(&self) -> &DeferredDeletionQueue<D> {
        &self.deletion_queue
    }

    pub fn deletion_queue_mut(&mut self) -> &mut DeferredDeletionQueue<D> {
        &mut self.deletion_queue
    }

    pub fn descriptors(&self) -> &DescriptorSlotAllocator<T> {
        &self.descriptors
    }

    pub fn descriptors_mut(&mut self) -> &mut DescriptorSlotAllocator<T> {
        &mut self.descriptors
    }

    /// Publish `resource` in the bindless table
    pub fn add_descriptor(&mut self, resource: DescriptorResource<T>) -> Result<Descriptor> {
        self.descriptors.add(resource)
    }

    /// Number of retired slots not yet handed back to the allocator
    pub fn retired_slot_count(&self) -> usize {
        self.retired_slots.iter().map(Vec::len).sum()
    }

    // ===== RETIRE =====
    //
    // Each helper takes the resource's handles by ownership and queues them in
    // the current epoch. The descriptor slot, if any, is parked in the same
    // epoch and only becomes available to `add_descriptor` once that epoch is
    // reclaimed. An already-taken `OwnedHandle` is skipped.

    /// Queue the buffer, then its memory
    pub fn retire_buffer(
        &mut self,
        buffer: OwnedHandle<D::Buffer>,
        allocation: OwnedHandle<D::Allocation>,
        descriptor: Option<Descriptor>,
    ) {
        self.park_slot(descriptor);
        buffer.retire_with(|b| self.deletion_queue.queue_buffer_deletion(b));
        allocation.retire_with(|a| self.deletion_queue.queue_allocation_deletion(a));
    }

    /// Queue the view, the image and its memory
    pub fn retire_image(
        &mut self,
        image: OwnedHandle<D::Image>,
        view: OwnedHandle<D::ImageView>,
        allocation: OwnedHandle<D::Allocation>,
        descriptor: Option<Descriptor>,
    ) {
        self.park_slot(descriptor);
        view.retire_with(|v| self.deletion_queue.queue_image_view_deletion(v));
        image.retire_with(|i| self.deletion_queue.queue_image_deletion(i));
        allocation.retire_with(|a| self.deletion_queue.queue_allocation_deletion(a));
    }

    pub fn retire_sampler(&mut self, sampler: OwnedHandle<D::Sampler>, descriptor: Option<Descriptor>) {
        self.park_slot(descriptor);
        sampler.retire_with(|s| self.deletion_queue.queue_sampler_deletion(s));
    }

    /// Queue the acceleration structure with its backing buffer
    pub fn retire_acceleration_structure(
        &mut self,
        acceleration_structure: OwnedHandle<D::AccelerationStructure>,
        buffer: OwnedHandle<D::Buffer>,
        allocation: OwnedHandle<D::Allocation>,
        descriptor: Option<Descriptor>,
    ) {
        self.park_slot(descriptor);
        acceleration_structure.retire_with(|a| self.deletion_queue.queue_acceleration_structure_deletion(a));
        buffer.retire_with(|b| self.deletion_queue.queue_buffer_deletion(b));
        allocation.retire_with(|a| self.deletion_queue.queue_allocation_deletion(a));
    }

    /// Destroy everything still queued and free every retired slot.
    /// The device must be idle.
    pub fn flush(&mut self) -> usize {
        let destroyed = self.deletion_queue.flush();
        for epoch in 0..self.retired_slots.len() {
            self.release_slots(epoch);
        }
        destroyed
    }

    fn park_slot(&mut self, descriptor: Option<Descriptor>) {
        if let Some(descriptor) = descriptor {
            debug_assert!(
                self.descriptors.is_live(descriptor),
                "retiring dead {} slot {}", descriptor.category().name(), descriptor.index()
            );
            self.retired_slots[self.deletion_queue.current_epoch()].push(descriptor);
        }
    }

    fn release_slots(&mut self, epoch: usize) {
        let slots = &mut self.retired_slots[epoch];
        if slots.is_empty() {
            return;
        }

        engine_trace!("galaxy3d::DeviceContext", "Freeing {} slots retired in epoch {}", slots.len(), epoch);
        for descriptor in slots.drain(..) {
            self.descriptors.remove(descriptor);
        }
    }
}

impl<D: DeviceDestroyer, T: DescriptorTable> Drop for DeviceContext<D, T> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
#[path = "device_context_tests.rs"]
mod tests;
