/// Presentation module - presentable image and semaphore rotation

pub mod sync_primitive;
pub mod presentation_rotator;

pub use sync_primitive::BinarySemaphore;
pub use presentation_rotator::{PresentationRotator, MAX_PRESENTABLE_IMAGES};
