use crate::error::{Error, Result};

const WORD_BITS: u32 = u64::BITS;

/// Fixed-capacity bitmap handing out small `u32` slot indices.
///
/// Backs the bindless descriptor allocator: one bitmap per descriptor
/// category, sized once from the declared per-category maximum. The lowest
/// free index is always handed out first, so freed indices are reused before
/// the bitmap grows into higher slots.
///
/// Not synchronized: the owner serializes access.
///
/// # Example
///
/// ```ignore
/// let mut bitmap = SlotBitmap::with_capacity(4)?;
/// let a = bitmap.add();  // Some(0)
/// let b = bitmap.add();  // Some(1)
/// bitmap.remove(0);
/// let c = bitmap.add();  // Some(0)
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlotBitmap {
    words: Vec<u64>,
    capacity: u32,
    count: u32,
}

impl SlotBitmap {
    /// Create an unreserved bitmap (capacity 0). Call `reserve` once before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bitmap already reserved to `capacity` bits
    pub fn with_capacity(capacity: u32) -> Result<Self> {
        let mut bitmap = Self::new();
        bitmap.reserve(capacity)?;
        Ok(bitmap)
    }

    /// Size the storage to `capacity` bits, all clear.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the word storage cannot be allocated.
    pub fn reserve(&mut self, capacity: u32) -> Result<()> {
        debug_assert!(
            self.words.is_empty() && self.capacity == 0,
            "SlotBitmap::reserve called twice"
        );

        let word_count = capacity.div_ceil(WORD_BITS) as usize;
        self.words
            .try_reserve_exact(word_count)
            .map_err(|_| Error::OutOfMemory)?;
        self.words.resize(word_count, 0);
        self.capacity = capacity;
        self.count = 0;
        Ok(())
    }

    /// Lowest unset index, or `None` if all `capacity` bits are set
    pub fn find_empty(&self) -> Option<u32> {
        let (word_index, word) = self
            .words
            .iter()
            .enumerate()
            .find(|(_, word)| **word != u64::MAX)?;

        // Bits past `capacity` in the last word are never set, so the first
        // clear bit may lie outside the bitmap.
        let index = word_index as u32 * WORD_BITS + (!word).trailing_zeros();
        (index < self.capacity).then_some(index)
    }

    /// Mark `index` live
    pub fn set(&mut self, index: u32) {
        debug_assert!(index < self.capacity, "slot {} out of range (capacity {})", index, self.capacity);
        debug_assert!(!self.test(index), "slot {} is already live", index);

        let (word, mask) = Self::locate(index);
        if self.words[word] & mask == 0 {
            self.words[word] |= mask;
            self.count += 1;
        }
    }

    /// Mark `index` free
    pub fn reset(&mut self, index: u32) {
        debug_assert!(index < self.capacity, "slot {} out of range (capacity {})", index, self.capacity);
        debug_assert!(self.test(index), "slot {} is not live", index);

        let (word, mask) = Self::locate(index);
        if self.words[word] & mask != 0 {
            self.words[word] &= !mask;
            self.count -= 1;
        }
    }

    /// Whether `index` is live
    pub fn test(&self, index: u32) -> bool {
        if index >= self.capacity {
            return false;
        }
        let (word, mask) = Self::locate(index);
        self.words[word] & mask != 0
    }

    /// Find the lowest free index and mark it live
    pub fn add(&mut self) -> Option<u32> {
        let index = self.find_empty()?;
        self.set(index);
        Some(index)
    }

    /// Free a live index
    pub fn remove(&mut self, index: u32) {
        self.reset(index);
    }

    /// Number of live indices (always the number of set bits)
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of indices the bitmap can hand out
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Whether no index is live
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether every index is live
    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    fn locate(index: u32) -> (usize, u64) {
        ((index / WORD_BITS) as usize, 1u64 << (index % WORD_BITS))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_bitmap_tests.rs"]
mod tests;
