/// Descriptor categories, limits, slot handles and bindable resources

use crate::device::DescriptorTable;

/// Independent resource categories of the bindless descriptor table.
///
/// Each category owns its own slot space: slot 3 of `StorageBuffer` and slot 3
/// of `Sampler` are unrelated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorCategory {
    StorageBuffer,
    UniformBuffer,
    Sampler,
    SampledImage,
    StorageImage,
    AccelerationStructure,
}

impl DescriptorCategory {
    /// Number of categories
    pub const COUNT: usize = 6;

    /// Every category, in binding order
    pub const ALL: [DescriptorCategory; Self::COUNT] = [
        DescriptorCategory::StorageBuffer,
        DescriptorCategory::UniformBuffer,
        DescriptorCategory::Sampler,
        DescriptorCategory::SampledImage,
        DescriptorCategory::StorageImage,
        DescriptorCategory::AccelerationStructure,
    ];

    /// Dense index of the category (also its binding number in the table)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name for logs and errors
    pub fn name(self) -> &'static str {
        match self {
            DescriptorCategory::StorageBuffer => "storage buffer",
            DescriptorCategory::UniformBuffer => "uniform buffer",
            DescriptorCategory::Sampler => "sampler",
            DescriptorCategory::SampledImage => "sampled image",
            DescriptorCategory::StorageImage => "storage image",
            DescriptorCategory::AccelerationStructure => "acceleration structure",
        }
    }
}

/// Declared maximum number of live descriptors per category
///
/// Each maximum sizes one `SlotBitmap`; the allocator never grows past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorLimits {
    pub storage_buffers: u32,
    pub uniform_buffers: u32,
    pub samplers: u32,
    pub sampled_images: u32,
    pub storage_images: u32,
    pub acceleration_structures: u32,
}

impl DescriptorLimits {
    /// Maximum for one category
    pub fn max_for(&self, category: DescriptorCategory) -> u32 {
        match category {
            DescriptorCategory::StorageBuffer => self.storage_buffers,
            DescriptorCategory::UniformBuffer => self.uniform_buffers,
            DescriptorCategory::Sampler => self.samplers,
            DescriptorCategory::SampledImage => self.sampled_images,
            DescriptorCategory::StorageImage => self.storage_images,
            DescriptorCategory::AccelerationStructure => self.acceleration_structures,
        }
    }

    /// Clamp every declared maximum to what the device reports
    pub fn clamped_to(&self, device: &DescriptorLimits) -> DescriptorLimits {
        DescriptorLimits {
            storage_buffers: self.storage_buffers.min(device.storage_buffers),
            uniform_buffers: self.uniform_buffers.min(device.uniform_buffers),
            samplers: self.samplers.min(device.samplers),
            sampled_images: self.sampled_images.min(device.sampled_images),
            storage_images: self.storage_images.min(device.storage_images),
            acceleration_structures: self.acceleration_structures.min(device.acceleration_structures),
        }
    }

    /// Sum of all maxima
    pub fn total(&self) -> u64 {
        DescriptorCategory::ALL
            .iter()
            .map(|&c| self.max_for(c) as u64)
            .sum()
    }
}

impl Default for DescriptorLimits {
    fn default() -> Self {
        Self {
            storage_buffers: 4096,
            uniform_buffers: 1024,
            samplers: 256,
            sampled_images: 8192,
            storage_images: 1024,
            acceleration_structures: 64,
        }
    }
}

/// Typed slot handle returned by `DescriptorSlotAllocator::add`
///
/// The holder uses it as the capability to update or remove the slot; the
/// index is what shaders use to reach the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    category: DescriptorCategory,
    index: u32,
}

impl Descriptor {
    pub(crate) fn new(category: DescriptorCategory, index: u32) -> Self {
        Self { category, index }
    }

    /// Category the slot belongs to
    pub fn category(&self) -> DescriptorCategory {
        self.category
    }

    /// Slot index inside the category's array
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// A sub-range of a buffer bound to a descriptor slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRange<B> {
    pub buffer: B,
    pub offset: u64,
    /// Size in bytes, or `u64::MAX` for "to the end of the buffer"
    pub range: u64,
}

impl<B> BufferRange<B> {
    /// Bind the whole buffer
    pub fn whole(buffer: B) -> Self {
        Self { buffer, offset: 0, range: u64::MAX }
    }
}

/// A device resource to write into a descriptor slot
pub enum DescriptorResource<T: DescriptorTable + ?Sized> {
    StorageBuffer(BufferRange<T::Buffer>),
    UniformBuffer(BufferRange<T::Buffer>),
    Sampler(T::Sampler),
    SampledImage(T::ImageView),
    StorageImage(T::ImageView),
    AccelerationStructure(T::AccelerationStructure),
}

impl<T: DescriptorTable + ?Sized> DescriptorResource<T> {
    /// Category this resource is bound under
    pub fn category(&self) -> DescriptorCategory {
        match self {
            DescriptorResource::StorageBuffer(_) => DescriptorCategory::StorageBuffer,
            DescriptorResource::UniformBuffer(_) => DescriptorCategory::UniformBuffer,
            DescriptorResource::Sampler(_) => DescriptorCategory::Sampler,
            DescriptorResource::SampledImage(_) => DescriptorCategory::SampledImage,
            DescriptorResource::StorageImage(_) => DescriptorCategory::StorageImage,
            DescriptorResource::AccelerationStructure(_) => DescriptorCategory::AccelerationStructure,
        }
    }
}
