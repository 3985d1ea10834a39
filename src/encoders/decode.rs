//! Data model for decoder output.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{Real, Sdr, UInt};

/// A closed interval of input values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinMax {
    /// Lower bound (inclusive).
    pub min: Real,
    /// Upper bound (inclusive).
    pub max: Real,
}

impl MinMax {
    /// Creates a new interval.
    #[must_use]
    pub fn new(min: Real, max: Real) -> Self {
        Self { min, max }
    }

    /// Whether the interval is a single point.
    #[must_use]
    pub fn is_point(&self) -> bool {
        (self.max - self.min).abs() < Real::EPSILON
    }
}

impl fmt::Display for MinMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// The decoded ranges for one field, with a human-readable description.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeList {
    /// Decoded intervals, sorted ascending by lower bound, non-overlapping.
    pub ranges: Vec<MinMax>,
    /// Readable rendering of the ranges, e.g. `"1.0, 7.5-8.0"`.
    pub desc: String,
}

impl RangeList {
    /// Creates a range list, generating the description from the ranges.
    #[must_use]
    pub fn new(ranges: Vec<MinMax>) -> Self {
        let desc = ranges
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self { ranges, desc }
    }

    /// Number of decoded intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether no intervals were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Result of decoding an SDR: the consistent input ranges for each field.
///
/// Field names are namespaced by their parent encoder (e.g.
/// `"record.temperature"`) so composite outputs stay unambiguous.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeResult {
    /// Per-field decoded ranges, keyed by namespaced field name.
    pub fields: BTreeMap<String, RangeList>,
}

impl DecodeResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the range list for the named field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&RangeList> {
        self.fields.get(name)
    }

    /// Merges another result into this one.
    pub fn merge(&mut self, other: DecodeResult) {
        self.fields.extend(other.fields);
    }
}

/// One interpretation of an SDR from top-down computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderResult {
    /// The interpreted value (for scalar encoders, equals `scalar`).
    pub value: Real,
    /// The representative scalar for the matched bucket.
    pub scalar: Real,
    /// Index of the matched bucket.
    pub bucket: UInt,
    /// Canonical encoding of the matched bucket.
    pub encoding: Sdr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmax_display() {
        assert_eq!(format!("{}", MinMax::new(1.0, 1.0)), "1");
        assert_eq!(format!("{}", MinMax::new(7.5, 8.0)), "7.5-8");
    }

    #[test]
    fn test_range_list_desc() {
        let rl = RangeList::new(vec![MinMax::new(1.0, 1.0), MinMax::new(7.5, 8.0)]);
        assert_eq!(rl.desc, "1, 7.5-8");
        assert_eq!(rl.len(), 2);
    }

    #[test]
    fn test_decode_result_merge() {
        let mut a = DecodeResult::new();
        a.fields
            .insert("x".to_string(), RangeList::new(vec![MinMax::new(0.0, 1.0)]));
        let mut b = DecodeResult::new();
        b.fields
            .insert("y".to_string(), RangeList::new(vec![MinMax::new(2.0, 3.0)]));

        a.merge(b);
        assert_eq!(a.fields.len(), 2);
        assert!(a.field("x").is_some());
        assert!(a.field("y").is_some());
    }
}
