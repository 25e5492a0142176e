/// Tag carried by a fetch so its response can be checked for staleness
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter for one kind of fetch.
///
/// Every fetch takes a generation from [`begin`](Self::begin). A response is
/// accepted only if no newer fetch has already been applied, so a slow poll
/// finishing after a newer manual refresh is dropped.
#[derive(Debug, Default)]
pub struct RefreshTracker {
    issued: u64,
    applied: u64,
}

impl RefreshTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Check a response and mark it applied if it is current
    pub fn accept(&mut self, generation: Generation) -> bool {
        if generation.0 <= self.applied {
            tracing::debug!(
                generation = generation.0,
                applied = self.applied,
                "discarding stale response"
            );
            return false;
        }
        self.applied = generation.0;
        true
    }

    /// Whether a fetch is outstanding
    pub fn in_flight(&self) -> bool {
        self.issued > self.applied
    }

    pub fn latest_issued(&self) -> Generation {
        Generation(self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_poll_is_discarded() {
        let mut tracker = RefreshTracker::new();
        let poll = tracker.begin();
        let manual = tracker.begin();

        assert!(tracker.accept(manual));
        assert!(!tracker.accept(poll));
        assert!(!tracker.in_flight());
    }

    #[test]
    fn test_in_order_responses_all_apply() {
        let mut tracker = RefreshTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(tracker.accept(first));
        assert!(tracker.in_flight());
        assert!(tracker.accept(second));
        assert!(!tracker.accept(second));
    }

    #[test]
    fn test_generations_increase() {
        let mut tracker = RefreshTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        assert!(b > a);
        assert_eq!(tracker.latest_issued(), b);
    }
}
