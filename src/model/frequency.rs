//! Frequency-of-frequency tables.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// Maps an observed count `c` to `Nc`, the number of distinct n-grams seen
/// exactly `c` times.
///
/// Keys are exactly the counts that occur, so every stored `Nc` is positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyOfFrequency {
    classes: BTreeMap<u32, u64>,
}

impl FrequencyOfFrequency {
    /// Create a new empty table.
    pub fn new() -> Self {
        FrequencyOfFrequency::default()
    }

    /// Build the table from per-n-gram counts. Zero counts are ignored.
    pub fn from_counts<I: IntoIterator<Item = u32>>(counts: I) -> Self {
        let mut classes = BTreeMap::new();
        for count in counts.into_iter().filter(|&count| count > 0) {
            *classes.entry(count).or_insert(0) += 1;
        }
        FrequencyOfFrequency { classes }
    }

    /// `Nc` for the given count, 0 if no n-gram occurs that often.
    pub fn get(&self, count: u32) -> u64 {
        self.classes.get(&count).copied().unwrap_or(0)
    }

    /// The smallest populated count strictly greater than `count`, with its `Nc`.
    pub fn next_populated_above(&self, count: u32) -> Option<(u32, u64)> {
        self.classes
            .range((Excluded(count), Unbounded))
            .next()
            .map(|(&count, &n)| (count, n))
    }

    /// The largest observed count.
    pub fn max_count(&self) -> Option<u32> {
        self.classes.last_key_value().map(|(&count, _)| count)
    }

    /// `N1`, the number of n-grams seen exactly once.
    pub fn singletons(&self) -> u64 {
        self.get(1)
    }

    /// Number of distinct n-grams the table was built from.
    pub fn distinct(&self) -> u64 {
        self.classes.values().sum()
    }

    /// Iterate over `(c, Nc)` in ascending count order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.classes.iter().map(|(&count, &n)| (count, n))
    }

    /// Number of populated frequency classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts() {
        let table = FrequencyOfFrequency::from_counts([1, 1, 3, 0, 7, 3, 1]);

        assert_eq!(table.get(1), 3);
        assert_eq!(table.get(3), 2);
        assert_eq!(table.get(7), 1);
        assert_eq!(table.get(2), 0);
        assert_eq!(table.get(0), 0);
        assert_eq!(table.len(), 3);
        assert_eq!(table.distinct(), 6);
        assert_eq!(table.singletons(), 3);
        assert_eq!(table.max_count(), Some(7));
    }

    #[test]
    fn test_next_populated_above() {
        let table = FrequencyOfFrequency::from_counts([1, 1, 3, 7, 3]);

        // Skips the empty class 2.
        assert_eq!(table.next_populated_above(1), Some((3, 2)));
        assert_eq!(table.next_populated_above(2), Some((3, 2)));
        // Strictly greater: a populated class never maps to itself.
        assert_eq!(table.next_populated_above(3), Some((7, 1)));
        assert_eq!(table.next_populated_above(0), Some((1, 2)));
        assert_eq!(table.next_populated_above(7), None);
    }

    #[test]
    fn test_empty_table() {
        let table = FrequencyOfFrequency::new();
        assert!(table.is_empty());
        assert_eq!(table.max_count(), None);
        assert_eq!(table.next_populated_above(0), None);
        assert_eq!(table.singletons(), 0);
    }
}
