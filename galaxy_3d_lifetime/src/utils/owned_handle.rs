use std::fmt;

/// Exclusively-owned device handle.
///
/// Holds a raw device handle until ownership is transferred out with
/// [`take`](Self::take) or [`retire_with`](Self::retire_with). Once taken the
/// wrapper is empty and dropping it does nothing. Dropping a wrapper that
/// still holds its handle leaks the device object; debug builds log it.
pub struct OwnedHandle<H> {
    handle: Option<H>,
}

impl<H> OwnedHandle<H> {
    /// Take ownership of a raw handle
    pub fn new(handle: H) -> Self {
        Self { handle: Some(handle) }
    }

    /// Borrow the handle, if still owned
    pub fn get(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Whether the handle is still owned
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Transfer ownership out, leaving the wrapper empty
    pub fn take(&mut self) -> Option<H> {
        self.handle.take()
    }

    /// Transfer ownership to `retire` (typically a `queue_*_deletion` call).
    /// Returns whether a handle was handed over.
    ///
    /// # Example
    ///
    /// ```ignore
    /// buffer.retire_with(|b| deletion_queue.queue_buffer_deletion(b));
    /// ```
    pub fn retire_with<F: FnOnce(H)>(mut self, retire: F) -> bool {
        match self.handle.take() {
            Some(handle) => {
                retire(handle);
                true
            }
            None => false,
        }
    }
}

impl<H> Default for OwnedHandle<H> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<H> From<H> for OwnedHandle<H> {
    fn from(handle: H) -> Self {
        Self::new(handle)
    }
}

impl<H: fmt::Debug> fmt::Debug for OwnedHandle<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedHandle").field(&self.handle).finish()
    }
}

impl<H> Drop for OwnedHandle<H> {
    fn drop(&mut self) {
        if cfg!(debug_assertions) && self.handle.is_some() {
            crate::engine_warn!(
                "galaxy3d::OwnedHandle",
                "{} dropped while still owned; the device object leaks",
                std::any::type_name::<H>()
            );
        }
    }
}

#[cfg(test)]
#[path = "owned_handle_tests.rs"]
mod tests;
