/// Small supporting data structures

pub mod slot_bitmap;
pub mod owned_handle;

pub use slot_bitmap::SlotBitmap;
pub use owned_handle::OwnedHandle;
