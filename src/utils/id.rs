use std::sync::atomic::{AtomicU32, Ordering};

/// Counter that hands out process-unique IDs.
///
/// Backed by a `u32` that eventually wraps around, which is fine for the short-lived objects it
/// numbers (trackers come and go with every overview rebuild).
pub struct IdCounter {
    value: AtomicU32,
}

impl IdCounter {
    pub const fn new() -> Self {
        Self {
            value: AtomicU32::new(0),
        }
    }

    pub fn next(&self) -> u32 {
        self.value.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for IdCounter {
    fn default() -> Self {
        Self::new()
    }
}
