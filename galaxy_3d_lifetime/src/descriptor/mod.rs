/// Descriptor module - bindless slot allocation

pub mod descriptor;
pub mod descriptor_allocator;

pub use descriptor::*;
pub use descriptor_allocator::DescriptorSlotAllocator;
