use std::sync::atomic::{fence, AtomicUsize, Ordering};

/// Thread-safe reference count for bridge wrappers.
///
/// Starts at zero; the creating side adds the first reference explicitly
/// when it hands the wrapper out. Increments use relaxed ordering since new
/// references can only be formed from an existing one; the final decrement
/// synchronizes with an acquire fence before the caller destroys the object.
pub struct RefCount(AtomicUsize);

const MAX_REF_COUNT: usize = isize::MAX as usize;

impl RefCount {
    pub const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    pub fn add_ref(&self) {
        let old = self.0.fetch_add(1, Ordering::Relaxed);
        assert!(old < MAX_REF_COUNT);
    }

    /// Adds a reference only while at least one other is held. Returns false
    /// once the count has reached zero: the wrapper is past the point of no
    /// return and must not be handed out again.
    pub fn try_add_ref(&self) -> bool {
        let mut count = self.0.load(Ordering::Relaxed);
        loop {
            if count == 0 {
                return false;
            }
            assert!(count < MAX_REF_COUNT);
            match self
                .0
                .compare_exchange_weak(count, count + 1, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return true,
                Err(observed) => count = observed,
            }
        }
    }

    /// Drops one reference. Returns true if that was the last one, in which
    /// case the caller must destroy the wrapper.
    pub fn release(&self) -> bool {
        let old = self.0.fetch_sub(1, Ordering::Release);
        debug_assert!(old >= 1);
        if old == 1 {
            fence(Ordering::Acquire);
            true
        } else {
            false
        }
    }

    pub fn has_one_ref(&self) -> bool {
        self.0.load(Ordering::Acquire) == 1
    }

    pub fn has_at_least_one_ref(&self) -> bool {
        self.0.load(Ordering::Acquire) >= 1
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}
