//! Monotonic logical clock shared by instances.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter advanced once per `modified()` call on any instance using it.
///
/// Instances compare their recorded ticks against each other to decide
/// whether something upstream changed since they last looked.
#[derive(Debug, Default)]
pub struct ModificationClock {
    counter: AtomicU64,
}

impl ModificationClock {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Current value without advancing.
    pub fn now(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Advances the clock and returns the new value.
    pub fn tick(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

static GLOBAL_CLOCK: ModificationClock = ModificationClock::new();

/// The process-wide clock used unless a constructor is given its own.
pub fn global_clock() -> &'static ModificationClock {
    &GLOBAL_CLOCK
}
