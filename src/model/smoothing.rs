//! Good-Turing count discounting.

use crate::model::frequency::FrequencyOfFrequency;

/// Good-Turing estimator over one n-gram arity.
///
/// A seen count `c` is replaced by `c* = c' * Nc' / Nc`, where `c'` is the
/// next populated frequency class above `c`. The most frequent class has no
/// class above it and keeps its raw count. Unseen n-grams get a fixed
/// smoothed count, normally `N1`.
#[derive(Debug, Clone)]
pub struct GoodTuring {
    classes: FrequencyOfFrequency,
    unseen_count: f64,
}

impl GoodTuring {
    /// Estimator whose unseen count is the held-out mass `N1`.
    pub fn new(classes: FrequencyOfFrequency) -> Self {
        let unseen_count = classes.singletons() as f64;
        GoodTuring {
            classes,
            unseen_count,
        }
    }

    /// Estimator with an explicit smoothed count for unseen n-grams.
    pub fn with_unseen_count(classes: FrequencyOfFrequency, unseen_count: f64) -> Self {
        GoodTuring {
            classes,
            unseen_count: unseen_count.max(0.0),
        }
    }

    /// The underlying frequency-of-frequency table.
    pub fn classes(&self) -> &FrequencyOfFrequency {
        &self.classes
    }

    /// Smoothed count assigned to any unseen n-gram.
    pub fn unseen_count(&self) -> f64 {
        self.unseen_count
    }

    /// Whether `count` is in (or above) the highest populated frequency class.
    pub fn is_max_frequency(&self, count: u32) -> bool {
        self.classes.max_count().is_some_and(|max| count >= max)
    }

    /// `c* = c' * Nc' / Nc` for a seen count below the maximum class.
    ///
    /// Falls back to the raw count when `count` is not a populated class or
    /// has nothing above it.
    pub fn discounted_count(&self, count: u32) -> f64 {
        let n_c = self.classes.get(count);
        if n_c == 0 {
            return f64::from(count);
        }

        match self.classes.next_populated_above(count) {
            Some((next, n_next)) => f64::from(next) * n_next as f64 / n_c as f64,
            None => f64::from(count),
        }
    }

    /// Smoothed count for any raw count.
    pub fn smoothed_count(&self, count: u32) -> f64 {
        if count == 0 {
            self.unseen_count
        } else if self.is_max_frequency(count) {
            f64::from(count)
        } else {
            self.discounted_count(count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> GoodTuring {
        // N1 = 4, N2 = 2, N5 = 1
        GoodTuring::new(FrequencyOfFrequency::from_counts([1, 1, 1, 1, 2, 2, 5]))
    }

    #[test]
    fn test_max_frequency_keeps_raw_count() {
        let gt = estimator();
        assert!(gt.is_max_frequency(5));
        assert!(!gt.is_max_frequency(2));
        assert_eq!(gt.smoothed_count(5), 5.0);
    }

    #[test]
    fn test_discount_uses_next_populated_class() {
        let gt = estimator();
        // c = 1: next class 2 with N2 = 2 -> 2 * 2 / 4
        assert!((gt.smoothed_count(1) - 1.0).abs() < 1e-12);
        // c = 2: class 3 and 4 are empty, next is 5 with N5 = 1 -> 5 * 1 / 2
        assert!((gt.smoothed_count(2) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_count_is_held_out_mass() {
        let gt = estimator();
        assert_eq!(gt.smoothed_count(0), 4.0);

        let gt = GoodTuring::with_unseen_count(FrequencyOfFrequency::from_counts([1, 3]), 0.25);
        assert_eq!(gt.smoothed_count(0), 0.25);
    }

    #[test]
    fn test_unpopulated_count_falls_back_to_raw() {
        let gt = estimator();
        assert_eq!(gt.discounted_count(3), 3.0);
    }

    #[test]
    fn test_empty_classes() {
        let gt = GoodTuring::new(FrequencyOfFrequency::new());
        assert!(!gt.is_max_frequency(1));
        assert_eq!(gt.smoothed_count(0), 0.0);
        assert_eq!(gt.smoothed_count(4), 4.0);
    }
}
