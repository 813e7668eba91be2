/// Device module - narrow interfaces a graphics backend implements

pub mod device_destroyer;
pub mod descriptor_table;
pub mod presentation_engine;

pub use device_destroyer::*;
pub use descriptor_table::*;
pub use presentation_engine::*;

// Mock device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
