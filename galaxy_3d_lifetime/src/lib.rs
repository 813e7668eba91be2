/*!
# Galaxy 3D Lifetime

GPU resource lifetime management for the Galaxy 3D engine.

This crate decides *when* device objects may be destroyed or reused, without
ever asking the device what has completed. It is platform-agnostic: backends
(Vulkan, etc.) implement a few narrow traits and get safe reclamation for free.

## Architecture

- **DeferredDeletionQueue**: ring of per-epoch deletion lists, reclaimed once
  the epoch comes back around
- **DescriptorSlotAllocator**: stable bindless slot indices per descriptor category
- **PresentationRotator**: presentable images with rotating acquire/present semaphores
- **DeviceContext**: per-device bundle of the above plus frame counter and resource IDs
- **DeviceDestroyer / DescriptorTable / PresentationEngine**: backend traits

Backend implementations provide concrete handle types through these traits.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod utils;
pub mod device;
pub mod deletion;
pub mod descriptor;
pub mod presentation;
pub mod context;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging front-end
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::LifetimeConfig;

    // Per-device context
    pub use crate::context::{DeviceContext, ResourceId};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Backend traits
    pub mod device {
        pub use crate::device::{
            AcquiredImage, DescriptorTable, DeviceDestroyer, PresentationEngine, PresentStatus,
        };
    }

    // Deferred deletion sub-module
    pub mod deletion {
        pub use crate::deletion::*;
    }

    // Bindless descriptor sub-module
    pub mod descriptor {
        pub use crate::descriptor::*;
    }

    // Presentation sub-module
    pub mod presentation {
        pub use crate::presentation::*;
    }

    // Small data structures
    pub mod utils {
        pub use crate::utils::{OwnedHandle, SlotBitmap};
    }
}
