/// Bindless descriptor slot allocator
///
/// Hands out stable slot indices per descriptor category and keeps the live
/// binding table in sync. Removing a slot only frees the index: the table
/// entry is left as is, and the caller must make sure no pending submission
/// still reads it. `DeviceContext::retire_*` does this by holding the slot
/// until the epoch that destroys the owning resource.

use crate::device::DescriptorTable;
use crate::error::{Error, Result};
use crate::utils::SlotBitmap;
use crate::{engine_debug, engine_error, engine_warn};
use super::descriptor::{Descriptor, DescriptorCategory, DescriptorLimits, DescriptorResource};

/// Slot allocator over one descriptor table
pub struct DescriptorSlotAllocator<T: DescriptorTable> {
    table: T,
    bitmaps: [SlotBitmap; DescriptorCategory::COUNT],
}

impl<T: DescriptorTable> DescriptorSlotAllocator<T> {
    /// Create an allocator with one bitmap per category, sized from `limits`
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if a category's bitmap cannot be
    /// reserved.
    pub fn new(table: T, limits: &DescriptorLimits) -> Result<Self> {
        let mut bitmaps: [SlotBitmap; DescriptorCategory::COUNT] = Default::default();

        for category in DescriptorCategory::ALL {
            let capacity = limits.max_for(category);
            bitmaps[category.index()].reserve(capacity).map_err(|e| {
                engine_error!("galaxy3d::DescriptorAllocator",
                    "Failed to reserve {} {} slots: {}", capacity, category.name(), e);
                Error::InitializationFailed(format!(
                    "Failed to reserve {} {} slots: {}", capacity, category.name(), e
                ))
            })?;
        }

        engine_debug!("galaxy3d::DescriptorAllocator",
            "Created descriptor allocator with {} slots", limits.total());

        Ok(Self { table, bitmaps })
    }

    /// Allocate a slot for `resource` and write it into the table
    ///
    /// # Errors
    ///
    /// Returns `Error::SlotsExhausted` if every slot of the resource's category
    /// is live. Nothing is written in that case.
    pub fn add(&mut self, resource: DescriptorResource<T>) -> Result<Descriptor> {
        let category = resource.category();
        let bitmap = &mut self.bitmaps[category.index()];

        let Some(index) = bitmap.find_empty() else {
            engine_warn!("galaxy3d::DescriptorAllocator",
                "All {} {} slots are live", bitmap.capacity(), category.name());
            return Err(Error::SlotsExhausted {
                category,
                capacity: bitmap.capacity(),
            });
        };

        bitmap.set(index);
        self.table.write_descriptor(index, &resource);
        Ok(Descriptor::new(category, index))
    }

    /// Rewrite the table entry of a live slot. The slot index does not change.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if `resource` belongs to another
    /// category than `descriptor`, or if the slot is not live. Both are
    /// caller bugs and assert in debug builds.
    pub fn update(&mut self, descriptor: Descriptor, resource: DescriptorResource<T>) -> Result<()> {
        let category = descriptor.category();

        if resource.category() != category {
            debug_assert!(false, "updating a {} slot with a {}", category.name(), resource.category().name());
            engine_error!("galaxy3d::DescriptorAllocator",
                "Cannot update {} slot {} with a {}",
                category.name(), descriptor.index(), resource.category().name());
            return Err(Error::InvalidResource(format!(
                "{} slot {} cannot hold a {}",
                category.name(), descriptor.index(), resource.category().name()
            )));
        }

        if !self.bitmaps[category.index()].test(descriptor.index()) {
            debug_assert!(false, "updating dead {} slot {}", category.name(), descriptor.index());
            engine_error!("galaxy3d::DescriptorAllocator",
                "Cannot update dead {} slot {}", category.name(), descriptor.index());
            return Err(Error::InvalidResource(format!(
                "{} slot {} is not live", category.name(), descriptor.index()
            )));
        }

        self.table.write_descriptor(descriptor.index(), &resource);
        Ok(())
    }

    /// Free a slot for the next `add`. The table entry is not cleared.
    pub fn remove(&mut self, descriptor: Descriptor) {
        let bitmap = &mut self.bitmaps[descriptor.category().index()];
        debug_assert!(
            descriptor.index() < bitmap.capacity(),
            "{} slot {} out of range (capacity {})",
            descriptor.category().name(), descriptor.index(), bitmap.capacity()
        );

        if bitmap.test(descriptor.index()) {
            bitmap.reset(descriptor.index());
        } else {
            debug_assert!(false, "removing dead {} slot {}", descriptor.category().name(), descriptor.index());
            engine_error!("galaxy3d::DescriptorAllocator",
                "Removing dead {} slot {}", descriptor.category().name(), descriptor.index());
        }
    }

    /// Whether the slot behind `descriptor` is live
    pub fn is_live(&self, descriptor: Descriptor) -> bool {
        self.bitmaps[descriptor.category().index()].test(descriptor.index())
    }

    /// Number of live slots in `category`
    pub fn live_count(&self, category: DescriptorCategory) -> u32 {
        self.bitmaps[category.index()].count()
    }

    /// Declared maximum of `category`
    pub fn capacity(&self, category: DescriptorCategory) -> u32 {
        self.bitmaps[category.index()].capacity()
    }

    /// The binding table slots are written into
    pub fn table(&self) -> &T {
        &self.table
    }
}

#[cfg(test)]
#[path = "descriptor_allocator_tests.rs"]
mod tests;
