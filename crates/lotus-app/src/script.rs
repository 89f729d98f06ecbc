//! Simulated presses of the day/night switch.

use std::time::Duration;

/// Toggle times, consumed in order as session time passes.
#[derive(Debug, Clone, Default)]
pub struct ToggleScript {
    times: Vec<Duration>,
    next: usize,
}

impl ToggleScript {
    pub fn from_millis(times_ms: &[u64]) -> Self {
        let mut times: Vec<Duration> = times_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect();
        times.sort_unstable();
        Self { times, next: 0 }
    }

    /// Number of presses due at or before `now` that have not fired yet.
    pub fn take_due(&mut self, now: Duration) -> usize {
        let start = self.next;
        while self.times.get(self.next).is_some_and(|&at| at <= now) {
            self.next += 1;
        }
        self.next - start
    }

    pub fn remaining(&self) -> usize {
        self.times.len() - self.next
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
