/// Mapping of `vk::Result` codes onto lifetime errors

use galaxy_3d_lifetime::galaxy3d::Error;
use galaxy_3d_lifetime::engine_err;
use ash::vk;

/// Translate a failed Vulkan call into an `Error`
///
/// Timing codes (`TIMEOUT`, `NOT_READY`, `ERROR_OUT_OF_DATE_KHR`) and device
/// loss keep their own variants so callers can react to them; anything else
/// is logged and becomes a `BackendError` carrying `what` and the raw code.
pub fn vk_result_to_error(result: vk::Result, what: &str) -> Error {
    match result {
        vk::Result::TIMEOUT => Error::Timeout,
        vk::Result::NOT_READY => Error::NotReady,
        vk::Result::ERROR_OUT_OF_DATE_KHR => Error::OutOfDate,
        vk::Result::ERROR_DEVICE_LOST | vk::Result::ERROR_SURFACE_LOST_KHR => Error::DeviceLost,
        vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => Error::OutOfMemory,
        other => engine_err!("galaxy3d::vulkan", "{}: {:?}", what, other),
    }
}

#[cfg(test)]
#[path = "vulkan_result_tests.rs"]
mod tests;
