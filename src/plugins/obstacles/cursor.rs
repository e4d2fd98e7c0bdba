//! Round-robin cursor over a fixed pool.

/// Index of the next slot a spawner will reuse.
///
/// Invariant: `index < len` for the pool it is used with (when `len > 0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnCursor(usize);

impl SpawnCursor {
    pub fn get(self) -> usize {
        self.0
    }

    /// Take the current slot index and advance with wraparound.
    ///
    /// Returns `None` for an empty pool and leaves the cursor untouched. A cursor left past
    /// the end by a shorter pool restarts at slot 0.
    pub fn take(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if self.0 >= len {
            self.0 = 0;
        }
        let slot = self.0;
        self.0 = (slot + 1) % len;
        Some(slot)
    }
}
