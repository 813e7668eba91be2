/// Context module - per-device lifetime state

pub mod device_context;

pub use device_context::{DeviceContext, ResourceId};
