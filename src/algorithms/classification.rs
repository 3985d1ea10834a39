//! Result container for bucket classification.
//!
//! A downstream classifier learns to map SDRs to the encoder buckets they
//! will fall into some number of steps in the future. This module holds only
//! the result side of that contract: per-step probability vectors over
//! buckets, plus the representative actual value per bucket.

use std::collections::HashMap;

use crate::types::{Real, UInt};

/// Classification output: for each predicted step, a vector of probabilities
/// indexed by bucket, alongside the actual values the buckets stand for.
///
/// # Example
///
/// ```rust
/// use perun::prelude::*;
///
/// let mut result: ClassifierResult<f64> = ClassifierResult::new();
/// result.set_actual_values(vec![1.5, 2.5, 3.5]);
/// result.set_stats(1, vec![0.1, 0.7, 0.2]);
///
/// assert_eq!(result.most_probable_bucket(1), Some(1));
/// assert_eq!(result.actual_value(1), Some(&2.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierResult<T> {
    actual_values: Vec<T>,
    probabilities: HashMap<UInt, Vec<Real>>,
}

impl<T> ClassifierResult<T> {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actual_values: Vec::new(),
            probabilities: HashMap::new(),
        }
    }

    /// Sets the representative actual value for each bucket.
    pub fn set_actual_values(&mut self, values: Vec<T>) {
        self.actual_values = values;
    }

    /// Returns the actual value for the given bucket, if known.
    #[must_use]
    pub fn actual_value(&self, bucket: UInt) -> Option<&T> {
        self.actual_values.get(bucket as usize)
    }

    /// Returns all bucket actual values.
    #[must_use]
    pub fn actual_values(&self) -> &[T] {
        &self.actual_values
    }

    /// Number of buckets with a known actual value.
    #[must_use]
    pub fn actual_value_count(&self) -> usize {
        self.actual_values.len()
    }

    /// Sets the probability vector for the given prediction step.
    pub fn set_stats(&mut self, step: UInt, votes: Vec<Real>) {
        self.probabilities.insert(step, votes);
    }

    /// Returns the probability vector for the given step, if present.
    #[must_use]
    pub fn stats(&self, step: UInt) -> Option<&[Real]> {
        self.probabilities.get(&step).map(Vec::as_slice)
    }

    /// Returns the probability of the given bucket at the given step.
    #[must_use]
    pub fn stat(&self, step: UInt, bucket: UInt) -> Option<Real> {
        self.probabilities
            .get(&step)
            .and_then(|votes| votes.get(bucket as usize))
            .copied()
    }

    /// Returns the prediction steps present, in ascending order.
    #[must_use]
    pub fn step_set(&self) -> Vec<UInt> {
        let mut steps: Vec<UInt> = self.probabilities.keys().copied().collect();
        steps.sort_unstable();
        steps
    }

    /// Number of prediction steps present.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.probabilities.len()
    }

    /// Number of bucket probabilities recorded for the given step.
    #[must_use]
    pub fn stat_count(&self, step: UInt) -> usize {
        self.probabilities.get(&step).map_or(0, Vec::len)
    }

    /// Returns the bucket with the highest probability at the given step.
    /// The first bucket wins ties.
    #[must_use]
    pub fn most_probable_bucket(&self, step: UInt) -> Option<UInt> {
        let votes = self.probabilities.get(&step)?;
        let mut best: Option<(UInt, Real)> = None;
        for (bucket, &p) in votes.iter().enumerate() {
            match best {
                Some((_, bp)) if p <= bp => {}
                _ => best = Some((bucket as UInt, p)),
            }
        }
        best.map(|(bucket, _)| bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassifierResult<f64> {
        let mut r = ClassifierResult::new();
        r.set_actual_values(vec![1.5, 2.5, 3.5]);
        r.set_stats(1, vec![0.1, 0.7, 0.2]);
        r.set_stats(3, vec![0.5, 0.3, 0.2]);
        r
    }

    #[test]
    fn test_actual_values() {
        let r = sample();
        assert_eq!(r.actual_value_count(), 3);
        assert_eq!(r.actual_value(0), Some(&1.5));
        assert_eq!(r.actual_value(2), Some(&3.5));
        assert_eq!(r.actual_value(3), None);
        assert_eq!(r.actual_values(), &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_stats() {
        let r = sample();
        assert_eq!(r.step_count(), 2);
        assert_eq!(r.step_set(), vec![1, 3]);
        assert_eq!(r.stat_count(1), 3);
        assert_eq!(r.stat_count(7), 0);
        assert_eq!(r.stats(3).unwrap(), &[0.5, 0.3, 0.2]);
        assert!(r.stats(2).is_none());
        assert_eq!(r.stat(1, 1), Some(0.7));
        assert_eq!(r.stat(1, 9), None);
    }

    #[test]
    fn test_most_probable_bucket() {
        let r = sample();
        assert_eq!(r.most_probable_bucket(1), Some(1));
        assert_eq!(r.most_probable_bucket(3), Some(0));
        assert_eq!(r.most_probable_bucket(2), None);

        // Ties resolve to the first bucket.
        let mut tied: ClassifierResult<i32> = ClassifierResult::new();
        tied.set_stats(1, vec![0.4, 0.4, 0.2]);
        assert_eq!(tied.most_probable_bucket(1), Some(0));
    }

    #[test]
    fn test_non_numeric_actual_values() {
        let mut r: ClassifierResult<String> = ClassifierResult::new();
        r.set_actual_values(vec!["low".to_string(), "high".to_string()]);
        assert_eq!(r.actual_value(1).map(String::as_str), Some("high"));
    }
}
