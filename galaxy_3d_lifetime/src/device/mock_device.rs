/// Mock device for unit tests (no GPU required)
///
/// Handles are plain `u64` values. Every call is recorded so tests can
/// assert on exactly what was destroyed, written or acquired, and in which
/// order.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::deletion::ResourceKind;
use crate::descriptor::{DescriptorCategory, DescriptorResource};
use crate::device::{
    AcquiredImage, DescriptorTable, DeviceDestroyer, PresentationEngine, PresentStatus,
};
use crate::error::{Error, Result};

// ============================================================================
// Mock Device (destroy primitives)
// ============================================================================

#[derive(Debug, Default)]
pub struct MockDevice {
    pub destroyed: Mutex<Vec<(ResourceKind, u64)>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every destroy call so far, in call order
    pub fn destroyed(&self) -> Vec<(ResourceKind, u64)> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed.lock().unwrap().len()
    }

    fn record(&self, kind: ResourceKind, handle: u64) {
        self.destroyed.lock().unwrap().push((kind, handle));
    }
}

impl DeviceDestroyer for MockDevice {
    type Buffer = u64;
    type BufferView = u64;
    type Image = u64;
    type ImageView = u64;
    type Sampler = u64;
    type Pipeline = u64;
    type PipelineLayout = u64;
    type DescriptorPool = u64;
    type DescriptorSetLayout = u64;
    type Semaphore = u64;
    type Fence = u64;
    type Swapchain = u64;
    type AccelerationStructure = u64;
    type Allocation = u64;

    fn destroy_buffer(&self, buffer: u64) {
        self.record(ResourceKind::Buffer, buffer);
    }
    fn destroy_buffer_view(&self, view: u64) {
        self.record(ResourceKind::BufferView, view);
    }
    fn destroy_image(&self, image: u64) {
        self.record(ResourceKind::Image, image);
    }
    fn destroy_image_view(&self, view: u64) {
        self.record(ResourceKind::ImageView, view);
    }
    fn destroy_sampler(&self, sampler: u64) {
        self.record(ResourceKind::Sampler, sampler);
    }
    fn destroy_pipeline(&self, pipeline: u64) {
        self.record(ResourceKind::Pipeline, pipeline);
    }
    fn destroy_pipeline_layout(&self, layout: u64) {
        self.record(ResourceKind::PipelineLayout, layout);
    }
    fn destroy_descriptor_pool(&self, pool: u64) {
        self.record(ResourceKind::DescriptorPool, pool);
    }
    fn destroy_descriptor_set_layout(&self, layout: u64) {
        self.record(ResourceKind::DescriptorSetLayout, layout);
    }
    fn destroy_semaphore(&self, semaphore: u64) {
        self.record(ResourceKind::Semaphore, semaphore);
    }
    fn destroy_fence(&self, fence: u64) {
        self.record(ResourceKind::Fence, fence);
    }
    fn destroy_swapchain(&self, swapchain: u64) {
        self.record(ResourceKind::Swapchain, swapchain);
    }
    fn destroy_acceleration_structure(&self, acceleration_structure: u64) {
        self.record(ResourceKind::AccelerationStructure, acceleration_structure);
    }
    fn free_allocation(&self, allocation: u64) {
        self.record(ResourceKind::Allocation, allocation);
    }
}

// ============================================================================
// Mock Descriptor Table
// ============================================================================

/// One recorded descriptor write: (category, slot, handle)
pub type MockWrite = (DescriptorCategory, u32, u64);

#[derive(Debug, Default)]
pub struct MockDescriptorTable {
    pub writes: Mutex<Vec<MockWrite>>,
}

impl MockDescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<MockWrite> {
        self.writes.lock().unwrap().clone()
    }

    /// Last handle written to (category, slot), if any
    pub fn entry(&self, category: DescriptorCategory, slot: u32) -> Option<u64> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, s, _)| *c == category && *s == slot)
            .map(|(_, _, handle)| *handle)
    }
}

impl DescriptorTable for MockDescriptorTable {
    type Buffer = u64;
    type ImageView = u64;
    type Sampler = u64;
    type AccelerationStructure = u64;

    fn write_descriptor(&self, slot: u32, resource: &DescriptorResource<Self>) {
        let handle = match resource {
            DescriptorResource::StorageBuffer(range) | DescriptorResource::UniformBuffer(range) => range.buffer,
            DescriptorResource::Sampler(sampler) => *sampler,
            DescriptorResource::SampledImage(view) | DescriptorResource::StorageImage(view) => *view,
            DescriptorResource::AccelerationStructure(handle) => *handle,
        };
        self.writes.lock().unwrap().push((resource.category(), slot, handle));
    }
}

// ============================================================================
// Mock Presentation Engine
// ============================================================================

/// Scripted presentation engine.
///
/// `acquire_next_image` pops scripted results first; once the script is
/// empty it hands out image indices round-robin.
pub struct MockPresentationEngine {
    pub images: Vec<u64>,
    pub script: VecDeque<Result<AcquiredImage>>,
    /// Semaphore passed to each acquire call, in order
    pub acquire_semaphores: Vec<u64>,
    /// (image index, semaphore) passed to each present call, in order
    pub presents: Vec<(u32, u64)>,
    pub present_script: VecDeque<Result<PresentStatus>>,
    /// Shared so tests can inspect it after the engine is dropped
    pub destroyed_semaphores: Arc<Mutex<Vec<u64>>>,
    pub fail_semaphore_creation: bool,
    next_semaphore: Cell<u64>,
    next_image: u32,
}

impl MockPresentationEngine {
    pub fn new(image_count: usize) -> Self {
        Self {
            images: (0..image_count as u64).map(|i| 1000 + i).collect(),
            script: VecDeque::new(),
            acquire_semaphores: Vec::new(),
            presents: Vec::new(),
            present_script: VecDeque::new(),
            destroyed_semaphores: Arc::new(Mutex::new(Vec::new())),
            fail_semaphore_creation: false,
            next_semaphore: Cell::new(1),
            next_image: 0,
        }
    }

    /// Make the next acquire return `index`
    pub fn push_index(&mut self, index: u32) {
        self.script.push_back(Ok(AcquiredImage { index, suboptimal: false }));
    }

    /// Make the next acquire fail with `error`
    pub fn push_error(&mut self, error: Error) {
        self.script.push_back(Err(error));
    }
}

impl PresentationEngine for MockPresentationEngine {
    type Image = u64;
    type Semaphore = u64;

    fn images(&self) -> Vec<u64> {
        self.images.clone()
    }

    fn create_semaphore(&self) -> Result<u64> {
        if self.fail_semaphore_creation {
            return Err(Error::OutOfMemory);
        }
        let id = self.next_semaphore.get();
        self.next_semaphore.set(id + 1);
        Ok(id)
    }

    fn destroy_semaphore(&self, semaphore: u64) {
        self.destroyed_semaphores.lock().unwrap().push(semaphore);
    }

    fn acquire_next_image(&mut self, _timeout: Duration, signal: &u64) -> Result<AcquiredImage> {
        self.acquire_semaphores.push(*signal);
        if let Some(result) = self.script.pop_front() {
            return result;
        }
        let index = self.next_image;
        self.next_image = (self.next_image + 1) % self.images.len() as u32;
        Ok(AcquiredImage { index, suboptimal: false })
    }

    fn present(&mut self, image_index: u32, wait: &u64) -> Result<PresentStatus> {
        self.presents.push((image_index, *wait));
        self.present_script.pop_front().unwrap_or(Ok(PresentStatus::Optimal))
    }
}
