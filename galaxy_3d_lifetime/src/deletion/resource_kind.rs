/// Resource categories tracked by the deferred deletion queue

use bitflags::bitflags;

/// Category of a device object queued for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    AccelerationStructure,
    Pipeline,
    PipelineLayout,
    DescriptorPool,
    DescriptorSetLayout,
    Sampler,
    ImageView,
    BufferView,
    Swapchain,
    Image,
    Buffer,
    Semaphore,
    Fence,
    Allocation,
}

impl ResourceKind {
    /// Every kind, in the order an epoch destroys them.
    ///
    /// Objects that reference others go first: views before the images and
    /// buffers they view, memory allocations after everything bound to them.
    pub const DESTRUCTION_ORDER: [ResourceKind; 14] = [
        ResourceKind::AccelerationStructure,
        ResourceKind::Pipeline,
        ResourceKind::PipelineLayout,
        ResourceKind::DescriptorPool,
        ResourceKind::DescriptorSetLayout,
        ResourceKind::Sampler,
        ResourceKind::ImageView,
        ResourceKind::BufferView,
        ResourceKind::Swapchain,
        ResourceKind::Image,
        ResourceKind::Buffer,
        ResourceKind::Semaphore,
        ResourceKind::Fence,
        ResourceKind::Allocation,
    ];

    /// The single-bit set for this kind
    pub fn flag(self) -> PendingKinds {
        match self {
            ResourceKind::AccelerationStructure => PendingKinds::ACCELERATION_STRUCTURES,
            ResourceKind::Pipeline => PendingKinds::PIPELINES,
            ResourceKind::PipelineLayout => PendingKinds::PIPELINE_LAYOUTS,
            ResourceKind::DescriptorPool => PendingKinds::DESCRIPTOR_POOLS,
            ResourceKind::DescriptorSetLayout => PendingKinds::DESCRIPTOR_SET_LAYOUTS,
            ResourceKind::Sampler => PendingKinds::SAMPLERS,
            ResourceKind::ImageView => PendingKinds::IMAGE_VIEWS,
            ResourceKind::BufferView => PendingKinds::BUFFER_VIEWS,
            ResourceKind::Swapchain => PendingKinds::SWAPCHAINS,
            ResourceKind::Image => PendingKinds::IMAGES,
            ResourceKind::Buffer => PendingKinds::BUFFERS,
            ResourceKind::Semaphore => PendingKinds::SEMAPHORES,
            ResourceKind::Fence => PendingKinds::FENCES,
            ResourceKind::Allocation => PendingKinds::ALLOCATIONS,
        }
    }
}

bitflags! {
    /// Set of kinds with at least one pending handle in an epoch.
    /// An epoch is empty exactly when its set is empty.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PendingKinds: u16 {
        const ACCELERATION_STRUCTURES = 1 << 0;
        const PIPELINES = 1 << 1;
        const PIPELINE_LAYOUTS = 1 << 2;
        const DESCRIPTOR_POOLS = 1 << 3;
        const DESCRIPTOR_SET_LAYOUTS = 1 << 4;
        const SAMPLERS = 1 << 5;
        const IMAGE_VIEWS = 1 << 6;
        const BUFFER_VIEWS = 1 << 7;
        const SWAPCHAINS = 1 << 8;
        const IMAGES = 1 << 9;
        const BUFFERS = 1 << 10;
        const SEMAPHORES = 1 << 11;
        const FENCES = 1 << 12;
        const ALLOCATIONS = 1 << 13;
    }
}

impl PendingKinds {
    /// Whether `kind` has pending handles
    pub fn has(self, kind: ResourceKind) -> bool {
        self.contains(kind.flag())
    }
}
