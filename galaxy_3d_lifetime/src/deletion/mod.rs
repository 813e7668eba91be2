/// Deferred deletion module - epoch-based reclamation of device objects

pub mod resource_kind;
mod deletion_record;
pub mod deletion_queue;

pub use resource_kind::{PendingKinds, ResourceKind};
pub use deletion_queue::DeferredDeletionQueue;
