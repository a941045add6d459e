//! Memory management utilities

/// Reusable slot pool for per-tick scratch values.
///
/// Slots are never freed individually: `flush` rewinds the cursor and the next
/// `acquire` hands back the first slot again, overwritten. Capacity grows by
/// doubling when every slot is in use, so a steady-state tick allocates
/// nothing. A value obtained from `acquire` must be read or copied out before
/// the pool is flushed.
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<T>,
    used: usize,
}

impl<T: Default> Pool<T> {
    /// Create a pool with `capacity` pre-built slots (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::default);
        Self { slots, used: 0 }
    }

    /// Hand out the next free slot, growing the pool when exhausted
    pub fn acquire(&mut self) -> &mut T {
        if self.used == self.slots.len() {
            let grown = self.slots.len() * 2;
            log::trace!("Pool grew from {} to {} slots", self.slots.len(), grown);
            self.slots.resize_with(grown, T::default);
        }
        let index = self.used;
        self.used += 1;
        &mut self.slots[index]
    }
}

impl<T> Pool<T> {
    /// Make every slot available again
    pub fn flush(&mut self) {
        self.used = 0;
    }

    /// Number of slots handed out since the last flush
    pub fn len(&self) -> usize {
        self.used
    }

    /// True when nothing was acquired since the last flush
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Total number of slots currently allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot `index` if it was acquired since the last flush
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.used {
            self.slots.get(index)
        } else {
            None
        }
    }

    /// Slots acquired since the last flush, in acquisition order
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.used]
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}
