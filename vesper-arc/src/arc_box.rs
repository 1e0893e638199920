use std::ops::{Deref, DerefMut};
use std::sync::atomic::{fence, AtomicU64, Ordering};

/// Represents a value, as it is stored on the counted heap.
///
/// The header carries the strong-reference count and whether the cell is a
/// process-lifetime static (the Boolean/Nil singletons). Static cells keep a
/// live counter for API uniformity, but they are never registered with the
/// allocator registry and never destroyed by a decrement.
pub struct ArcBox<T> {
    ref_cnt: AtomicU64,
    is_static: bool,
    pub(crate) value: T,
}

impl<T> ArcBox<T> {
    /// Creates a counted cell with an initial count of one.
    pub(crate) fn new(value: T) -> Self {
        Self {
            ref_cnt: AtomicU64::new(1),
            is_static: false,
            value,
        }
    }

    /// Creates a static (process-lifetime) cell, suitable for `static` items.
    pub const fn new_static(value: T) -> Self {
        Self {
            ref_cnt: AtomicU64::new(1),
            is_static: true,
            value,
        }
    }

    /// Returns the current strong-reference count.
    pub fn ref_count(&self) -> u64 {
        self.ref_cnt.load(Ordering::Relaxed)
    }

    /// Returns whether this cell is exempt from destruction and registry tracking.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Increments the strong-reference count, returning the new count.
    pub(crate) fn increment(&self) -> u64 {
        self.ref_cnt.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Decrements the strong-reference count (floored at zero), returning the
    /// new count. An `Acquire` fence is issued on the transition to zero so
    /// the destroying thread observes every prior release of the value.
    pub(crate) fn decrement(&self) -> u64 {
        let mut current = self.ref_cnt.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return 0;
            }
            match self.ref_cnt.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    if current == 1 {
                        fence(Ordering::Acquire);
                    }
                    return current - 1;
                }
                Err(observed) => current = observed,
            }
        }
    }
}

impl<T> Deref for ArcBox<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for ArcBox<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}
