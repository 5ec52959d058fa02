// ── Record identifier generation ──

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Source of record identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier never returned before by this generator.
    fn next_id(&self) -> u64;
}

/// Wall-clock milliseconds, bumped past the previous id when the clock
/// has not advanced (or went backwards). Strictly increasing per instance.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: AtomicU64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_ms() -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl IdGenerator for ClockIds {
    fn next_id(&self) -> u64 {
        let now = Self::now_ms();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Deterministic counter for tests: `start`, `start + 1`, ...
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ids_strictly_increase_within_one_millisecond() {
        let ids = ClockIds::new();
        let batch: Vec<u64> = (0..1000).map(|_| ids.next_id()).collect();
        assert!(batch.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn clock_ids_track_wall_clock() {
        let before = ClockIds::now_ms();
        let id = ClockIds::new().next_id();
        assert!(id >= before);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::starting_at(100);
        assert_eq!(ids.next_id(), 100);
        assert_eq!(ids.next_id(), 101);
    }
}
