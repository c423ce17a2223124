//! In-flight request tracking.
//!
//! # Responsibilities
//! - Count requests currently being handled
//! - Hand out a guard per request that releases its slot on drop
//! - Let the shutdown sequence report how much work is still running
//!
//! # Design Decisions
//! - Guards release on drop, so a panicking or cancelled request is never
//!   counted forever
//! - Relaxed ordering is enough for request sequence numbers (uniqueness only)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global counter for request sequence numbers.
static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique sequence number of a tracked request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    fn next() -> Self {
        Self(REQUEST_SEQ.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Counts in-flight requests for the drain phase.
#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    active: Arc<AtomicU64>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new in-flight request. The slot is released when the guard drops.
    pub fn track(&self) -> InFlightGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            active: Arc::clone(&self.active),
            seq: RequestSeq::next(),
        }
    }

    /// Requests currently being handled.
    pub fn active_count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }
}

/// Held for the lifetime of one request.
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<AtomicU64>,
    seq: RequestSeq,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(request_seq = %self.seq, "Request finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_unique() {
        let a = RequestSeq::next();
        let b = RequestSeq::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("req-"));
    }

    #[test]
    fn tracker_counts() {
        let tracker = InFlightTracker::new();
        assert_eq!(tracker.active_count(), 0);

        let guard1 = tracker.track();
        assert_eq!(tracker.active_count(), 1);

        let guard2 = tracker.clone().track();
        assert_eq!(tracker.active_count(), 2);

        drop(guard1);
        assert_eq!(tracker.active_count(), 1);

        drop(guard2);
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn guard_released_on_panic() {
        let tracker = InFlightTracker::new();
        let inner = tracker.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.track();
            panic!("request blew up");
        });

        assert!(result.is_err());
        assert_eq!(tracker.active_count(), 0);
    }
}
