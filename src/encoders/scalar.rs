//! Scalar encoder: maps a numeric value onto a contiguous block of active
//! bits within a fixed-width output.
//!
//! The encoder divides the value domain `[min_val, max_val]` into overlapping
//! buckets. Each input activates `w` contiguous bits starting at the bucket's
//! first bit, so values in nearby buckets share most of their active bits and
//! distant values share none. Periodic encoders treat the domain as a ring:
//! the active block wraps around the end of the output and out-of-range
//! inputs wrap modulo the domain width.
//!
//! The encoder also supports the inverse direction (see [`Decoder`]):
//! recovering the ranges of input values consistent with an SDR, tolerating
//! missing bits via hole-filling.

use crate::error::{PerunError, Result};
use crate::types::{Real, Sdr, UInt};

use super::base::{Decoder, Encoder};
use super::decode::{DecodeResult, EncoderResult, MinMax, RangeList};

/// Configuration parameters for [`ScalarEncoder`].
///
/// Exactly one of `n`, `radius`, `resolution` must be non-zero; the other two
/// are derived from it. A zero value means "not specified".
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarEncoderParams {
    /// Lower bound of the value domain (inclusive).
    pub min_val: Real,
    /// Upper bound of the value domain (inclusive for non-periodic encoders,
    /// exclusive for periodic ones, where it is identified with `min_val`).
    pub max_val: Real,
    /// Total number of output bits. 0 = derive from `radius` or `resolution`.
    pub n: UInt,
    /// Number of active bits per encoding. Must be odd.
    pub w: UInt,
    /// Two inputs separated by more than the radius have non-overlapping
    /// representations. 0 = derive.
    pub radius: Real,
    /// Two inputs separated by more than the resolution are guaranteed
    /// different representations. 0 = derive.
    pub resolution: Real,
    /// Whether the value domain wraps around.
    pub periodic: bool,
    /// For non-periodic encoders: clip out-of-range inputs to the domain
    /// bounds instead of rejecting them.
    pub clip_input: bool,
    /// Skip the `n > 6w` sanity check, for deliberately tiny encoders.
    pub forced: bool,
    /// Field name; defaults to `"[min:max]"`.
    pub name: Option<String>,
}

impl Default for ScalarEncoderParams {
    fn default() -> Self {
        Self {
            min_val: 0.0,
            max_val: 100.0,
            n: 400,
            w: 21,
            radius: 0.0,
            resolution: 0.0,
            periodic: false,
            clip_input: true,
            forced: false,
            name: None,
        }
    }
}

/// Encodes a scalar value as a contiguous block of `w` active bits.
///
/// # Example
///
/// ```rust
/// use perun::prelude::*;
///
/// let encoder = ScalarEncoder::new(ScalarEncoderParams {
///     min_val: 1.0,
///     max_val: 8.0,
///     n: 14,
///     w: 3,
///     periodic: true,
///     forced: true,
///     ..Default::default()
/// }).unwrap();
///
/// let sdr = encoder.encode_to_sdr(3.0).unwrap();
/// assert_eq!(sdr.get_sparse(), vec![3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarEncoder {
    min_val: Real,
    max_val: Real,
    w: UInt,
    n: UInt,
    periodic: bool,
    clip_input: bool,
    name: String,

    // Derived quantities, fixed at construction.
    half_width: UInt,
    padding: UInt,
    range_internal: Real,
    range: Real,
    resolution: Real,
    radius: Real,
    n_internal: UInt,
    num_buckets: UInt,
    dimensions: Vec<UInt>,
}

impl ScalarEncoder {
    /// Creates a new scalar encoder from the given parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `w` is even or zero, `max_val <= min_val`,
    /// more or fewer than one of `n`/`radius`/`resolution` is specified, or
    /// `n <= 6w` without `forced`.
    pub fn new(params: ScalarEncoderParams) -> Result<Self> {
        if params.w == 0 || params.w % 2 == 0 {
            return Err(PerunError::InvalidParameter {
                name: "w",
                message: format!("w must be an odd positive integer, got {}", params.w),
            });
        }
        if params.max_val <= params.min_val {
            return Err(PerunError::InvalidParameter {
                name: "max_val",
                message: format!(
                    "max_val must be greater than min_val, got [{}, {}]",
                    params.min_val, params.max_val
                ),
            });
        }

        let specified = [
            params.n != 0,
            params.radius != 0.0,
            params.resolution != 0.0,
        ]
        .iter()
        .filter(|&&s| s)
        .count();
        if specified != 1 {
            return Err(PerunError::InvalidParameter {
                name: "n",
                message: format!(
                    "exactly one of n, radius, resolution must be specified, got {specified}"
                ),
            });
        }

        let w = params.w;
        let half_width = (w - 1) / 2;
        let padding = if params.periodic { 0 } else { half_width };
        let range_internal = params.max_val - params.min_val;

        let (n, resolution, radius, range);
        if params.n != 0 {
            // forced only waives the sanity margin below; the output still
            // has to be wide enough to hold w active bits.
            let min_n = if params.periodic { w } else { w + 1 };
            if params.n < min_n {
                return Err(PerunError::InvalidParameter {
                    name: "n",
                    message: format!("n ({}) must be at least {min_n} for w = {w}", params.n),
                });
            }
            if !params.forced && params.n <= 6 * w {
                return Err(PerunError::InvalidParameter {
                    name: "n",
                    message: format!(
                        "n ({}) must be greater than 6*w ({}); set forced to override",
                        params.n,
                        6 * w
                    ),
                });
            }
            n = params.n;
            resolution = if params.periodic {
                range_internal / Real::from(n)
            } else {
                range_internal / Real::from(n - w)
            };
            radius = Real::from(w) * resolution;
            range = if params.periodic {
                range_internal
            } else {
                range_internal + resolution
            };
        } else {
            if params.radius != 0.0 {
                radius = params.radius;
                resolution = radius / Real::from(w);
            } else {
                resolution = params.resolution;
                radius = resolution * Real::from(w);
            }
            range = if params.periodic {
                range_internal
            } else {
                range_internal + resolution
            };
            // (w * range) / radius keeps exactly-representable ratios exact,
            // so the ceil below doesn't pick up a spurious extra bit.
            let n_float = (Real::from(w) * range) / radius + Real::from(2 * padding);
            n = n_float.ceil() as UInt;
        }

        let n_internal = n - 2 * padding;
        let num_buckets = if params.periodic {
            n
        } else {
            n.saturating_sub(w) + 1
        };

        let name = params
            .name
            .unwrap_or_else(|| format!("[{}:{}]", params.min_val, params.max_val));

        Ok(Self {
            min_val: params.min_val,
            max_val: params.max_val,
            w,
            n,
            periodic: params.periodic,
            clip_input: params.clip_input,
            name,
            half_width,
            padding,
            range_internal,
            range,
            resolution,
            radius,
            n_internal,
            num_buckets,
            dimensions: vec![n],
        })
    }

    /// Total number of output bits.
    #[must_use]
    pub fn n(&self) -> UInt {
        self.n
    }

    /// Number of active bits per encoding.
    #[must_use]
    pub fn w(&self) -> UInt {
        self.w
    }

    /// Smallest value difference guaranteed to produce different encodings.
    #[must_use]
    pub fn resolution(&self) -> Real {
        self.resolution
    }

    /// Value difference beyond which encodings share no bits.
    #[must_use]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Whether the value domain wraps around.
    #[must_use]
    pub fn periodic(&self) -> bool {
        self.periodic
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of distinct buckets.
    #[must_use]
    pub fn num_buckets(&self) -> UInt {
        self.num_buckets
    }

    /// Returns the index of the first active bit for the given input, which
    /// may be negative for periodic encoders (the block wraps).
    fn first_on_bit(&self, input: Real) -> Result<i64> {
        if input.is_nan() {
            return Err(PerunError::InputOutOfRange {
                value: input,
                min: self.min_val,
                max: self.max_val,
            });
        }

        let input = if self.periodic {
            let mut offset = (input - self.min_val).rem_euclid(self.range_internal);
            // rem_euclid can land exactly on the modulus for inputs a hair
            // below min_val.
            if offset >= self.range_internal {
                offset = 0.0;
            }
            self.min_val + offset
        } else if input < self.min_val {
            if !self.clip_input {
                return Err(PerunError::InputOutOfRange {
                    value: input,
                    min: self.min_val,
                    max: self.max_val,
                });
            }
            self.min_val
        } else if input > self.max_val {
            if !self.clip_input {
                return Err(PerunError::InputOutOfRange {
                    value: input,
                    min: self.min_val,
                    max: self.max_val,
                });
            }
            self.max_val
        } else {
            input
        };

        let centerbin = if self.periodic {
            ((input - self.min_val) * Real::from(self.n_internal) / self.range) as i64
                + i64::from(self.padding)
        } else {
            (((input - self.min_val) + self.resolution / 2.0) / self.resolution) as i64
                + i64::from(self.padding)
        };

        Ok(centerbin - i64::from(self.half_width))
    }

    /// Representative input value for the given bucket.
    fn bucket_value(&self, bucket: UInt) -> Real {
        if self.periodic {
            self.min_val + self.resolution / 2.0 + Real::from(bucket) * self.resolution
        } else {
            self.min_val + Real::from(bucket) * self.resolution
        }
    }

    fn check_dimensions(&self, sdr: &Sdr) -> Result<()> {
        if sdr.dimensions() != self.dimensions {
            return Err(PerunError::DimensionMismatch {
                expected: self.dimensions.clone(),
                actual: sdr.dimensions().to_vec(),
            });
        }
        Ok(())
    }

    /// Fills `1 0..0 1` gaps of up to `half_width` zeros, in place. This lets
    /// decode tolerate encodings with missing bits.
    fn fill_holes(&self, dense: &mut [u8]) {
        let n = self.n as usize;
        for gap in 1..=self.half_width as usize {
            let limit = if self.periodic {
                n
            } else {
                n.saturating_sub(gap + 1)
            };
            for j in 0..limit {
                if dense[j] == 0 || dense[(j + gap + 1) % n] == 0 {
                    continue;
                }
                if (1..=gap).any(|k| dense[(j + k) % n] != 0) {
                    continue;
                }
                for k in 1..=gap {
                    dense[(j + k) % n] = 1;
                }
            }
        }
    }

    /// Finds maximal runs of active bits. For periodic encoders a run
    /// crossing the wrap point is reported once, starting at its true start
    /// with a length extending past `n`.
    fn find_runs(&self, dense: &[u8]) -> Vec<(usize, usize)> {
        let n = dense.len();
        let mut runs: Vec<(usize, usize)> = Vec::new();

        let mut i = 0;
        while i < n {
            if dense[i] != 0 {
                let start = i;
                while i < n && dense[i] != 0 {
                    i += 1;
                }
                runs.push((start, i - start));
            } else {
                i += 1;
            }
        }

        if self.periodic && runs.len() > 1 {
            let first = runs[0];
            let last = *runs.last().expect("runs is non-empty");
            if first.0 == 0 && last.0 + last.1 == n {
                runs.remove(0);
                let merged = runs.last_mut().expect("runs is non-empty");
                merged.1 += first.1;
            }
        }

        runs
    }
}

impl Encoder<Real> for ScalarEncoder {
    fn dimensions(&self) -> &[UInt] {
        &self.dimensions
    }

    fn size(&self) -> usize {
        self.n as usize
    }

    fn encode(&self, value: Real, output: &mut Sdr) -> Result<()> {
        self.check_dimensions(output)?;

        let minbin = self.first_on_bit(value)?;
        let n = i64::from(self.n);
        let mut dense = vec![0u8; self.n as usize];
        for k in 0..i64::from(self.w) {
            let mut idx = minbin + k;
            if self.periodic {
                idx = idx.rem_euclid(n);
            }
            // Non-periodic minbin is always >= 0 and minbin + w - 1 < n.
            dense[idx as usize] = 1;
        }
        output.set_dense_owned(dense)
    }
}

/// Missing data encodes as all zeros.
impl Encoder<Option<Real>> for ScalarEncoder {
    fn dimensions(&self) -> &[UInt] {
        &self.dimensions
    }

    fn size(&self) -> usize {
        self.n as usize
    }

    fn encode(&self, value: Option<Real>, output: &mut Sdr) -> Result<()> {
        match value {
            Some(v) => self.encode(v, output),
            None => {
                self.check_dimensions(output)?;
                output.zero();
                Ok(())
            }
        }
    }
}

impl Decoder for ScalarEncoder {
    fn decode(&self, sdr: &Sdr, parent_name: &str) -> Result<DecodeResult> {
        self.check_dimensions(sdr)?;

        let mut result = DecodeResult::new();
        if sdr.get_sum() == 0 {
            return Ok(result);
        }

        let mut dense = sdr.get_dense();
        self.fill_holes(&mut dense);
        let runs = self.find_runs(&dense);

        let mut ranges: Vec<MinMax> = Vec::new();
        for (start, run_len) in runs {
            let (left, right) = if run_len <= self.w as usize {
                let center = start + run_len / 2;
                (center, center)
            } else {
                (
                    start + self.half_width as usize,
                    start + run_len - 1 - self.half_width as usize,
                )
            };

            let mut in_min =
                (left as Real - Real::from(self.padding)) * self.resolution + self.min_val;
            let mut in_max =
                (right as Real - Real::from(self.padding)) * self.resolution + self.min_val;

            if self.periodic && in_min >= self.max_val {
                in_min -= self.range;
                in_max -= self.range;
            }
            if in_min < self.min_val {
                in_min = self.min_val;
            }
            if in_max < self.min_val {
                in_max = self.min_val;
            }

            if self.periodic && in_max >= self.max_val {
                // The span crosses the wrap point; report both arcs.
                ranges.push(MinMax::new(in_min, self.max_val));
                ranges.push(MinMax::new(self.min_val, in_max - self.range));
            } else {
                if in_max > self.max_val {
                    in_max = self.max_val;
                }
                if in_min > self.max_val {
                    in_min = self.max_val;
                }
                ranges.push(MinMax::new(in_min, in_max));
            }
        }

        // Canonical order: ascending, with overlapping ranges coalesced.
        ranges.sort_by(|a, b| a.min.total_cmp(&b.min));
        let mut merged: Vec<MinMax> = Vec::with_capacity(ranges.len());
        for r in ranges {
            match merged.last_mut() {
                Some(last) if r.min <= last.max => {
                    if r.max > last.max {
                        last.max = r.max;
                    }
                }
                _ => merged.push(r),
            }
        }

        let field_name = if parent_name.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", parent_name, self.name)
        };
        result.fields.insert(field_name, RangeList::new(merged));
        Ok(result)
    }

    fn top_down_compute(&self, sdr: &Sdr) -> Result<Vec<EncoderResult>> {
        let decoded = self.decode(sdr, "")?;
        let ranges = decoded
            .field(&self.name)
            .map(|rl| rl.ranges.clone())
            .unwrap_or_default();

        if ranges.is_empty() {
            // Nothing to go on; report every bucket as a candidate.
            let all: Vec<UInt> = (0..self.num_buckets).collect();
            return self.get_bucket_info(&all);
        }

        let mut results = Vec::with_capacity(ranges.len());
        for r in &ranges {
            let bucket = self.get_bucket_indices(r.min)?[0];
            results.extend(self.get_bucket_info(&[bucket])?);
        }
        Ok(results)
    }

    fn get_bucket_indices(&self, value: Real) -> Result<Vec<UInt>> {
        let minbin = self.first_on_bit(value)?;
        let bucket = if self.periodic {
            let mut b = minbin + i64::from(self.half_width);
            if b < 0 {
                b += i64::from(self.n);
            }
            b
        } else {
            minbin
        };
        Ok(vec![UInt::try_from(bucket).map_err(|_| {
            PerunError::IndexOutOfBounds {
                index: 0,
                size: self.num_buckets as usize,
            }
        })?])
    }

    fn get_bucket_info(&self, buckets: &[UInt]) -> Result<Vec<EncoderResult>> {
        let mut results = Vec::with_capacity(buckets.len());
        for &bucket in buckets {
            if bucket >= self.num_buckets {
                return Err(PerunError::IndexOutOfBounds {
                    index: bucket as usize,
                    size: self.num_buckets as usize,
                });
            }
            let value = self.bucket_value(bucket);
            results.push(EncoderResult {
                value,
                scalar: value,
                bucket,
                encoding: self.encode_to_sdr(value)?,
            });
        }
        Ok(results)
    }

    fn get_bucket_values(&self) -> Vec<Real> {
        (0..self.num_buckets).map(|b| self.bucket_value(b)).collect()
    }

    fn closeness_scores(&self, expected: &[Real], actual: &[Real], fractional: bool) -> Vec<Real> {
        expected
            .iter()
            .zip(actual)
            .map(|(&e, &a)| {
                let err = if self.periodic {
                    let e = (e - self.min_val).rem_euclid(self.range_internal);
                    let a = (a - self.min_val).rem_euclid(self.range_internal);
                    let d = (e - a).abs();
                    d.min(self.range_internal - d)
                } else {
                    (e - a).abs()
                };

                if fractional {
                    let denom = if self.periodic {
                        self.range_internal / 2.0
                    } else {
                        self.range_internal
                    };
                    let pct = (err / denom).min(1.0);
                    1.0 - pct
                } else {
                    err
                }
            })
            .collect()
    }
}
