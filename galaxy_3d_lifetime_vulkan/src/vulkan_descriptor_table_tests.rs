//! Unit tests for bindless table category mapping
//!
//! Pure mapping, no GPU required.

use super::*;
use std::collections::HashSet;

#[test]
fn test_each_category_has_its_own_binding() {
    let bindings: HashSet<u32> = DescriptorCategory::ALL.into_iter().map(category_binding).collect();
    assert_eq!(bindings.len(), DescriptorCategory::COUNT);
    assert_eq!(category_binding(DescriptorCategory::StorageBuffer), 0);
    assert_eq!(category_binding(DescriptorCategory::AccelerationStructure), 5);
}

#[test]
fn test_category_descriptor_types() {
    assert_eq!(category_descriptor_type(DescriptorCategory::StorageBuffer), vk::DescriptorType::STORAGE_BUFFER);
    assert_eq!(category_descriptor_type(DescriptorCategory::UniformBuffer), vk::DescriptorType::UNIFORM_BUFFER);
    assert_eq!(category_descriptor_type(DescriptorCategory::Sampler), vk::DescriptorType::SAMPLER);
    assert_eq!(category_descriptor_type(DescriptorCategory::SampledImage), vk::DescriptorType::SAMPLED_IMAGE);
    assert_eq!(category_descriptor_type(DescriptorCategory::StorageImage), vk::DescriptorType::STORAGE_IMAGE);
    assert_eq!(
        category_descriptor_type(DescriptorCategory::AccelerationStructure),
        vk::DescriptorType::ACCELERATION_STRUCTURE_KHR
    );
}
