//! Processed-link counter backing the progress display

use serde::Serialize;

/// Counts links handed off against the size of the imported list
///
/// `advance` clamps at the total: over-reporting is absorbed and the amount
/// actually applied is returned, so `processed <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressTracker {
    processed: usize,
    total: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self { processed: 0, total }
    }

    /// Start over for a freshly imported list
    pub fn reset(&mut self, total: usize) {
        self.processed = 0;
        self.total = total;
    }

    /// Record `n` more processed links, returning how many were counted
    pub fn advance(&mut self, n: usize) -> usize {
        let applied = n.min(self.remaining());
        self.processed += applied;
        applied
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.total - self.processed
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.processed == self.total
    }

    /// Completed share in `0.0..=1.0`; an empty list reports 0
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

impl std::fmt::Display for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.processed, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_clamps_at_total() {
        let mut tracker = ProgressTracker::new(5);
        assert_eq!(tracker.advance(3), 3);
        assert_eq!(tracker.advance(10), 2);
        assert_eq!(tracker.advance(1), 0);
        assert_eq!(tracker.processed(), 5);
        assert!(tracker.is_complete());
    }

    #[test]
    fn processed_never_exceeds_total_for_any_sequence() {
        let steps = [0usize, 1, 7, 2, 0, 13, 1, 1, 100];
        for total in [0usize, 1, 5, 20, 45] {
            let mut tracker = ProgressTracker::new(total);
            for step in steps {
                tracker.advance(step);
                assert!(tracker.processed() <= tracker.total());
                assert_eq!(tracker.is_complete(), total > 0 && tracker.processed() == total);
            }
        }
    }

    #[test]
    fn empty_list_is_never_complete() {
        let mut tracker = ProgressTracker::default();
        tracker.advance(1);
        assert!(!tracker.is_complete());
        assert_eq!(tracker.fraction(), 0.0);
    }

    #[test]
    fn reset_starts_over_with_new_total() {
        let mut tracker = ProgressTracker::new(2);
        tracker.advance(2);
        tracker.reset(45);
        assert_eq!(tracker.processed(), 0);
        assert_eq!(tracker.total(), 45);
        assert!(!tracker.is_complete());
        assert_eq!(tracker.to_string(), "0/45");
    }
}
