/// Bindless descriptor table - Vulkan implementation of DescriptorTable
///
/// One descriptor set with one array binding per descriptor category, created
/// with update-after-bind so slots can be rewritten while earlier frames that
/// do not use them are still executing.

use galaxy_3d_lifetime::galaxy3d::{Error, Result};
use galaxy_3d_lifetime::galaxy3d::descriptor::{DescriptorCategory, DescriptorLimits, DescriptorResource};
use galaxy_3d_lifetime::galaxy3d::device::DescriptorTable;
use galaxy_3d_lifetime::{engine_debug, engine_error};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

/// Vulkan descriptor type backing each category
pub fn category_descriptor_type(category: DescriptorCategory) -> vk::DescriptorType {
    match category {
        DescriptorCategory::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        DescriptorCategory::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
        DescriptorCategory::Sampler => vk::DescriptorType::SAMPLER,
        DescriptorCategory::SampledImage => vk::DescriptorType::SAMPLED_IMAGE,
        DescriptorCategory::StorageImage => vk::DescriptorType::STORAGE_IMAGE,
        DescriptorCategory::AccelerationStructure => vk::DescriptorType::ACCELERATION_STRUCTURE_KHR,
    }
}

/// Binding number of a category's array in the bindless set
pub fn category_binding(category: DescriptorCategory) -> u32 {
    category.index() as u32
}

/// Bindless descriptor set
pub struct VulkanDescriptorTable {
    ctx: Arc<GpuContext>,
    layout: vk::DescriptorSetLayout,
    pool: vk::DescriptorPool,
    set: vk::DescriptorSet,
}

impl VulkanDescriptorTable {
    /// Create the layout, pool and set for `limits`
    ///
    /// Categories with a zero maximum get no binding.
    pub fn new(ctx: Arc<GpuContext>, limits: &DescriptorLimits) -> Result<Self> {
        let categories: Vec<DescriptorCategory> = DescriptorCategory::ALL
            .into_iter()
            .filter(|&c| limits.max_for(c) > 0)
            .collect();

        if categories.is_empty() {
            engine_error!("galaxy3d::vulkan", "Bindless table needs at least one non-empty category");
            return Err(Error::InitializationFailed(
                "Bindless table needs at least one non-empty category".to_string(),
            ));
        }

        let bindings: Vec<vk::DescriptorSetLayoutBinding> = categories
            .iter()
            .map(|&c| {
                vk::DescriptorSetLayoutBinding::default()
                    .binding(category_binding(c))
                    .descriptor_type(category_descriptor_type(c))
                    .descriptor_count(limits.max_for(c))
                    .stage_flags(vk::ShaderStageFlags::ALL)
            })
            .collect();

        let binding_flags: Vec<vk::DescriptorBindingFlags> = categories
            .iter()
            .map(|_| {
                vk::DescriptorBindingFlags::PARTIALLY_BOUND
                    | vk::DescriptorBindingFlags::UPDATE_AFTER_BIND
                    | vk::DescriptorBindingFlags::UPDATE_UNUSED_WHILE_PENDING
            })
            .collect();

        let pool_sizes: Vec<vk::DescriptorPoolSize> = categories
            .iter()
            .map(|&c| vk::DescriptorPoolSize {
                ty: category_descriptor_type(c),
                descriptor_count: limits.max_for(c),
            })
            .collect();

        unsafe {
            let mut flags_info = vk::DescriptorSetLayoutBindingFlagsCreateInfo::default()
                .binding_flags(&binding_flags);
            let layout_info = vk::DescriptorSetLayoutCreateInfo::default()
                .flags(vk::DescriptorSetLayoutCreateFlags::UPDATE_AFTER_BIND_POOL)
                .bindings(&bindings)
                .push_next(&mut flags_info);

            let layout = ctx.device.create_descriptor_set_layout(&layout_info, None)
                .map_err(|e| {
                    engine_error!("galaxy3d::vulkan", "Failed to create bindless set layout: {:?}", e);
                    Error::InitializationFailed(format!("Failed to create descriptor set layout: {:?}", e))
                })?;

            let pool_info = vk::DescriptorPoolCreateInfo::default()
                .flags(vk::DescriptorPoolCreateFlags::UPDATE_AFTER_BIND)
                .pool_sizes(&pool_sizes)
                .max_sets(1);

            let pool = match ctx.device.create_descriptor_pool(&pool_info, None) {
                Ok(pool) => pool,
                Err(e) => {
                    ctx.device.destroy_descriptor_set_layout(layout, None);
                    engine_error!("galaxy3d::vulkan", "Failed to create bindless descriptor pool: {:?}", e);
                    return Err(Error::InitializationFailed(format!("Failed to create descriptor pool: {:?}", e)));
                }
            };

            let layouts = [layout];
            let alloc_info = vk::DescriptorSetAllocateInfo::default()
                .descriptor_pool(pool)
                .set_layouts(&layouts);

            let set = match ctx.device.allocate_descriptor_sets(&alloc_info) {
                Ok(sets) if !sets.is_empty() => sets[0],
                result => {
                    let reason = result.err();
                    ctx.device.destroy_descriptor_pool(pool, None);
                    ctx.device.destroy_descriptor_set_layout(layout, None);
                    engine_error!("galaxy3d::vulkan", "Failed to allocate bindless descriptor set: {:?}", reason);
                    return Err(Error::InitializationFailed(format!(
                        "Failed to allocate descriptor set: {:?}", reason
                    )));
                }
            };

            engine_debug!("galaxy3d::vulkan",
                "Created bindless descriptor table with {} bindings", bindings.len());

            Ok(Self { ctx, layout, pool, set })
        }
    }

    /// Set layout, for pipeline layout creation
    pub fn layout(&self) -> vk::DescriptorSetLayout {
        self.layout
    }

    /// The bindless set to bind once per command buffer
    pub fn set(&self) -> vk::DescriptorSet {
        self.set
    }
}

impl DescriptorTable for VulkanDescriptorTable {
    type Buffer = vk::Buffer;
    type ImageView = vk::ImageView;
    type Sampler = vk::Sampler;
    type AccelerationStructure = vk::AccelerationStructureKHR;

    fn write_descriptor(&self, slot: u32, resource: &DescriptorResource<Self>) {
        let category = resource.category();
        let write = vk::WriteDescriptorSet::default()
            .dst_set(self.set)
            .dst_binding(category_binding(category))
            .dst_array_element(slot)
            .descriptor_type(category_descriptor_type(category));

        unsafe {
            match resource {
                DescriptorResource::StorageBuffer(range) | DescriptorResource::UniformBuffer(range) => {
                    let infos = [vk::DescriptorBufferInfo::default()
                        .buffer(range.buffer)
                        .offset(range.offset)
                        .range(range.range)];
                    self.ctx.device.update_descriptor_sets(&[write.buffer_info(&infos)], &[]);
                }
                DescriptorResource::Sampler(sampler) => {
                    let infos = [vk::DescriptorImageInfo::default().sampler(*sampler)];
                    self.ctx.device.update_descriptor_sets(&[write.image_info(&infos)], &[]);
                }
                DescriptorResource::SampledImage(view) => {
                    let infos = [vk::DescriptorImageInfo::default()
                        .image_view(*view)
                        .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)];
                    self.ctx.device.update_descriptor_sets(&[write.image_info(&infos)], &[]);
                }
                DescriptorResource::StorageImage(view) => {
                    let infos = [vk::DescriptorImageInfo::default()
                        .image_view(*view)
                        .image_layout(vk::ImageLayout::GENERAL)];
                    self.ctx.device.update_descriptor_sets(&[write.image_info(&infos)], &[]);
                }
                DescriptorResource::AccelerationStructure(acceleration_structure) => {
                    let structures = [*acceleration_structure];
                    let mut as_write = vk::WriteDescriptorSetAccelerationStructureKHR::default()
                        .acceleration_structures(&structures);
                    let write = write.descriptor_count(1).push_next(&mut as_write);
                    self.ctx.device.update_descriptor_sets(&[write], &[]);
                }
            }
        }
    }
}

impl Drop for VulkanDescriptorTable {
    fn drop(&mut self) {
        unsafe {
            // Frees the set as well
            self.ctx.device.destroy_descriptor_pool(self.pool, None);
            self.ctx.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_descriptor_table_tests.rs"]
mod tests;
