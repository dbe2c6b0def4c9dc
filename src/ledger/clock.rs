//! Time source for record timestamps
//!
//! Timestamps are u32 Unix seconds. `Library` clamps the clock to at least
//! 1 so a return timestamp can never be mistaken for "still out".

use std::cell::Cell;
use std::rc::Rc;

use chrono::Utc;

/// Source of the current Unix time in seconds
pub trait Clock {
    fn now(&self) -> u32;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u32 {
        u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX)
    }
}

/// Manually driven clock; clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, ts: u32) {
        self.now.set(ts);
    }

    pub fn advance(&self, secs: u32) {
        self.now.set(self.now.get().saturating_add(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u32 {
        self.now.get()
    }
}
