//! Story id allocation.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::model::RecordId;

/// Hands out strictly increasing ids based on the wall clock in milliseconds.
///
/// Two allocations within the same millisecond (or after the clock stepped
/// backwards) still get distinct ids: each id is `max(now_ms, last + 1)`.
/// Once `last` reaches `i64::MAX` there is no larger id left, so allocation
/// restarts from the clock.
#[derive(Debug, Default)]
pub struct RecordIdAllocator {
    last: AtomicI64,
}

impl RecordIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start above an already used id, e.g. the newest id in history.
    pub fn starting_after(last: RecordId) -> Self {
        Self {
            last: AtomicI64::new(last),
        }
    }

    pub fn next_id(&self) -> RecordId {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&self, now_ms: i64) -> RecordId {
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = match last.checked_add(1) {
                Some(next) => now_ms.max(next),
                None => now_ms,
            };
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
