//! Coordinate encoder: maps integer coordinates from an unbounded
//! n-dimensional space into a fixed-width SDR.
//!
//! Every coordinate in the space is deterministically assigned a pseudo-random
//! "order" (a real in `[0, 1)`) and a pseudo-random output bit, both derived
//! by hashing the coordinate. To encode a (coordinate, radius) pair, the
//! encoder gathers all neighbors within the given Chebyshev radius, keeps the
//! `w` with the highest order, and activates each winner's bit. Nearby
//! coordinates share most of their neighborhoods, hence most of their winners,
//! hence most of their active bits.
//!
//! There is no decoder for this representation.

use crate::error::{PerunError, Result};
use crate::types::{Int64, Real64, Sdr, UInt};
use crate::utils::Random;

use super::base::Encoder;

/// Assigns each coordinate a deterministic pseudo-random order in `[0, 1)`.
///
/// The encoder provides the production implementation; tests can inject a
/// fixed ordering to make winner selection predictable.
pub trait CoordinateOrder {
    /// Returns the order of the given coordinate.
    fn order_for_coordinate(&self, coordinate: &[Int64]) -> Real64;
}

/// Configuration parameters for [`CoordinateEncoder`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateEncoderParams {
    /// Total number of output bits.
    pub n: UInt,
    /// Number of winning coordinates per encoding. Must be odd.
    pub w: UInt,
    /// Number of components per coordinate. Every encoded coordinate must
    /// have exactly this arity.
    pub dimensions: UInt,
    /// Skip the `n > 6w` sanity check.
    pub forced: bool,
}

impl Default for CoordinateEncoderParams {
    fn default() -> Self {
        Self {
            n: 1000,
            w: 21,
            dimensions: 2,
            forced: false,
        }
    }
}

/// Encodes `(coordinate, radius)` pairs into SDRs.
///
/// # Example
///
/// ```rust
/// use perun::prelude::*;
///
/// let encoder = CoordinateEncoder::new(CoordinateEncoderParams::default()).unwrap();
/// let sdr = encoder.encode_to_sdr((&[100, 200][..], 5.0)).unwrap();
/// assert!(sdr.get_sum() > 0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateEncoder {
    n: UInt,
    w: UInt,
    coordinate_dims: UInt,
    dimensions: Vec<UInt>,
}

impl CoordinateEncoder {
    /// Creates a new coordinate encoder from the given parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `w` is even or zero, `dimensions` is
    /// zero, or `n <= 6w` without `forced`.
    pub fn new(params: CoordinateEncoderParams) -> Result<Self> {
        if params.w == 0 || params.w % 2 == 0 {
            return Err(PerunError::InvalidParameter {
                name: "w",
                message: format!("w must be an odd positive integer, got {}", params.w),
            });
        }
        if params.dimensions == 0 {
            return Err(PerunError::InvalidParameter {
                name: "dimensions",
                message: "coordinates must have at least one component".to_string(),
            });
        }
        if !params.forced && params.n <= 6 * params.w {
            return Err(PerunError::InvalidParameter {
                name: "n",
                message: format!(
                    "n ({}) must be greater than 6*w ({}); set forced to override",
                    params.n,
                    6 * params.w
                ),
            });
        }

        Ok(Self {
            n: params.n,
            w: params.w,
            coordinate_dims: params.dimensions,
            dimensions: vec![params.n],
        })
    }

    /// Total number of output bits.
    #[must_use]
    pub fn n(&self) -> UInt {
        self.n
    }

    /// Number of winning coordinates per encoding.
    #[must_use]
    pub fn w(&self) -> UInt {
        self.w
    }

    /// Expected number of components per encoded coordinate.
    #[must_use]
    pub fn coordinate_dims(&self) -> UInt {
        self.coordinate_dims
    }

    /// FNV-1a over the coordinate's component bytes. The resulting seed makes
    /// order and bit assignment pure functions of the coordinate.
    fn hash_coordinate(coordinate: &[Int64]) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        for &component in coordinate {
            for byte in component.to_le_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        }
        hash
    }

    /// Returns the output bit assigned to the given coordinate, in `[0, n)`.
    #[must_use]
    pub fn bit_for_coordinate(&self, coordinate: &[Int64]) -> UInt {
        let mut rng = Random::new(Self::hash_coordinate(coordinate));
        rng.get_uint32_range(0, self.n)
    }

    /// Returns all coordinates within the given Chebyshev radius, inclusive,
    /// including the center itself. The result has `(2*floor(radius) + 1)^d`
    /// entries.
    #[must_use]
    pub fn neighbors(coordinate: &[Int64], radius: Real64) -> Vec<Vec<Int64>> {
        let r = radius.floor().max(0.0) as Int64;
        let mut result: Vec<Vec<Int64>> = vec![Vec::new()];
        for &component in coordinate {
            let mut extended = Vec::with_capacity(result.len() * (2 * r as usize + 1));
            for prefix in &result {
                for offset in -r..=r {
                    let mut point = prefix.clone();
                    point.push(component + offset);
                    extended.push(point);
                }
            }
            result = extended;
        }
        result
    }

    /// Returns the `w` coordinates with the highest order. Ties break toward
    /// the later candidate. When fewer than `w` candidates exist, all of them
    /// win.
    #[must_use]
    pub fn top_w_coordinates(
        order: &dyn CoordinateOrder,
        coordinates: &[Vec<Int64>],
        w: UInt,
    ) -> Vec<Vec<Int64>> {
        let mut indexed: Vec<(Real64, usize)> = coordinates
            .iter()
            .enumerate()
            .map(|(i, c)| (order.order_for_coordinate(c), i))
            .collect();
        indexed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let take = (w as usize).min(indexed.len());
        indexed[indexed.len() - take..]
            .iter()
            .map(|&(_, i)| coordinates[i].clone())
            .collect()
    }
}

impl CoordinateOrder for CoordinateEncoder {
    fn order_for_coordinate(&self, coordinate: &[Int64]) -> Real64 {
        let mut rng = Random::new(Self::hash_coordinate(coordinate));
        rng.get_real64()
    }
}

impl Encoder<(&[Int64], Real64)> for CoordinateEncoder {
    fn dimensions(&self) -> &[UInt] {
        &self.dimensions
    }

    fn size(&self) -> usize {
        self.n as usize
    }

    fn encode(&self, (coordinate, radius): (&[Int64], Real64), output: &mut Sdr) -> Result<()> {
        if output.dimensions() != self.dimensions {
            return Err(PerunError::DimensionMismatch {
                expected: self.dimensions.clone(),
                actual: output.dimensions().to_vec(),
            });
        }
        if coordinate.is_empty() {
            return Err(PerunError::InvalidParameter {
                name: "coordinate",
                message: "coordinate must have at least one component".to_string(),
            });
        }
        if coordinate.len() != self.coordinate_dims as usize {
            return Err(PerunError::DimensionMismatch {
                expected: vec![self.coordinate_dims],
                actual: vec![coordinate.len() as UInt],
            });
        }
        if radius < 0.0 || radius.is_nan() {
            return Err(PerunError::InvalidParameter {
                name: "radius",
                message: format!("radius must be non-negative, got {radius}"),
            });
        }

        let neighborhood = Self::neighbors(coordinate, radius);
        let winners = Self::top_w_coordinates(self, &neighborhood, self.w);

        let mut indices: Vec<UInt> = winners
            .iter()
            .map(|c| self.bit_for_coordinate(c))
            .collect();
        indices.sort_unstable();
        // Distinct winners may collide on the same bit.
        indices.dedup();

        output.set_sparse_owned(indices)
    }
}

impl Encoder<(Vec<Int64>, Real64)> for CoordinateEncoder {
    fn dimensions(&self) -> &[UInt] {
        &self.dimensions
    }

    fn size(&self) -> usize {
        self.n as usize
    }

    fn encode(&self, (coordinate, radius): (Vec<Int64>, Real64), output: &mut Sdr) -> Result<()> {
        self.encode((coordinate.as_slice(), radius), output)
    }
}
