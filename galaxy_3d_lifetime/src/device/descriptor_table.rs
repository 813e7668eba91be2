/// DescriptorTable trait - the live binding table the slot allocator writes into

use crate::descriptor::DescriptorResource;

/// Device-side binding table with one array per descriptor category
///
/// Implemented by backends (e.g. a Vulkan descriptor set created with
/// update-after-bind). Writes are visible to submissions recorded afterwards;
/// the slot allocator guarantees `slot` is below the category's declared
/// maximum.
pub trait DescriptorTable {
    /// Buffer handle bound by storage/uniform buffer slots
    type Buffer;
    /// Image view handle bound by sampled/storage image slots
    type ImageView;
    /// Sampler handle
    type Sampler;
    /// Acceleration structure handle
    type AccelerationStructure;

    /// Write `resource` into `slot` of the array matching its category
    fn write_descriptor(&self, slot: u32, resource: &DescriptorResource<Self>);
}
