use crate::hash::Hash;
use std::collections::VecDeque;

/// Hashes of the boards a bot recently moved into, oldest first.
/// Used to steer the search away from repeating positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepetitionHistory {
    recent: VecDeque<Hash>,
    capacity: usize,
}

impl RepetitionHistory {
    pub const DEFAULT_LENGTH: usize = 6;

    pub fn new(capacity: usize) -> Self {
        RepetitionHistory {
            recent: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn record(&mut self, hash: Hash) {
        self.recent.push_back(hash);
        if self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }

    /// How many entries ago a hash was recorded, 0 being the latest.
    /// The most recent occurrence counts
    pub fn distance(&self, hash: Hash) -> Option<usize> {
        self.recent.iter().rev().position(|&h| h == hash)
    }

    /// Summary of the recorded hashes, 0 while nothing is recorded.
    /// Values computed under one history are only valid under the same one
    pub fn fingerprint(&self) -> Hash {
        self.recent.iter().fold(0, |acc: Hash, &h| {
            (acc.rotate_left(5) ^ h).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}
impl Default for RepetitionHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::RepetitionHistory;

    #[test]
    fn keeps_only_the_latest_hashes() {
        let mut history = RepetitionHistory::new(3);
        for h in 1..=5 {
            history.record(h);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.distance(1), None);
        assert_eq!(history.distance(2), None);
        assert_eq!(history.distance(3), Some(2));
        assert_eq!(history.distance(5), Some(0));
    }

    #[test]
    fn latest_occurrence_wins() {
        let mut history = RepetitionHistory::default();
        history.record(9);
        history.record(4);
        history.record(9);
        assert_eq!(history.distance(9), Some(0));
        assert_eq!(history.distance(4), Some(1));
    }

    #[test]
    fn fingerprint_follows_the_contents() {
        let mut a = RepetitionHistory::new(2);
        assert_eq!(a.fingerprint(), 0);
        a.record(1);
        a.record(2);
        let mut b = RepetitionHistory::new(2);
        b.record(2);
        b.record(1);
        assert_ne!(a.fingerprint(), 0);
        assert_ne!(a.fingerprint(), b.fingerprint());

        // Only what is still held counts
        let mut c = RepetitionHistory::new(2);
        c.record(7);
        c.record(1);
        c.record(2);
        assert_eq!(a.fingerprint(), c.fingerprint());
    }
}
