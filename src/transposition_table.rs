use crate::{evaluation::Score, hash::Hash};
use std::collections::HashMap;

/// How a stored value relates to the true value of the position
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Bound {
    Exact,
    /// The search failed high, the true value is at least this
    Lower,
    /// The search failed low, the true value is at most this
    Upper,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct TranspositionEntry {
    pub value: Score,
    pub depth_remaining: u8,
    pub bound: Bound,
}

/// A per bot table of search results. There is no replacement scheme, once it
/// holds `capacity` entries the whole table is dropped
pub struct TranspositionTable {
    entries: HashMap<Hash, TranspositionEntry>,
    capacity: usize,
}
impl TranspositionTable {
    pub const DEFAULT_CAPACITY: usize = 500_000;

    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, key: Hash) -> Option<&TranspositionEntry> {
        self.entries.get(&key)
    }

    /// Returns the entry for a key only if it was searched at least `depth_needed`
    /// plies deep
    pub fn probe(&self, key: Hash, depth_needed: u8) -> Option<TranspositionEntry> {
        self.entries
            .get(&key)
            .filter(|e| e.depth_remaining >= depth_needed)
            .copied()
    }

    pub fn set(&mut self, key: Hash, entry: TranspositionEntry) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.entries.clear();
        }
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear()
    }
}
impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(value: Score, depth_remaining: u8) -> TranspositionEntry {
        TranspositionEntry {
            value,
            depth_remaining,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn shallow_entries_are_not_returned() {
        let mut tt = TranspositionTable::default();
        tt.set(42, exact(7, 2));
        assert_eq!(tt.probe(42, 2), Some(exact(7, 2)));
        assert_eq!(tt.probe(42, 1), Some(exact(7, 2)));
        assert_eq!(tt.probe(42, 3), None);
        assert_eq!(tt.probe(43, 0), None);
        assert_eq!(tt.get(42), Some(&exact(7, 2)));
    }

    #[test]
    fn newer_entries_replace_older_ones() {
        let mut tt = TranspositionTable::default();
        tt.set(1, exact(7, 5));
        tt.set(1, exact(-3, 1));
        assert_eq!(tt.get(1), Some(&exact(-3, 1)));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn full_table_is_cleared_wholesale() {
        let mut tt = TranspositionTable::new(3);
        for key in 0..3 {
            tt.set(key, exact(key as Score, 1));
        }
        assert_eq!(tt.len(), 3);
        // Overwriting an existing key never clears
        tt.set(2, exact(9, 1));
        assert_eq!(tt.len(), 3);

        tt.set(3, exact(3, 1));
        assert_eq!(tt.len(), 1);
        assert!(tt.get(0).is_none());
        assert_eq!(tt.get(3), Some(&exact(3, 1)));
    }
}
