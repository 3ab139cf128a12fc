//! Nullable clock: deterministic time for testing.

use fundgov_types::{Timestamp, SECS_PER_DAY};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
    }

    pub fn advance_days(&self, days: u64) {
        self.advance(days * SECS_PER_DAY);
    }

    /// Jump to an absolute time.
    pub fn set(&self, timestamp: Timestamp) {
        self.current.set(timestamp.as_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(1_000);
        assert_eq!(clock.now(), Timestamp::new(1_000));
        clock.advance(5);
        clock.advance_days(1);
        assert_eq!(clock.now(), Timestamp::new(1_005 + 86_400));
        clock.set(Timestamp::new(7));
        assert_eq!(clock.now().as_secs(), 7);
    }
}
