//! Sparse Distributed Representation (SDR) implementation.
//!
//! An SDR is a fixed-width group of boolean values (bits). It can be viewed in
//! two formats:
//! - **Dense**: a contiguous array of all bits
//! - **Sparse**: a sorted list of indices of active (true) bits
//!
//! The SDR converts between formats lazily and caches the results.

use crate::error::{PerunError, Result};
use crate::types::{ElemDense, ElemSparse, Real, UInt};

use std::cell::RefCell;
use std::fmt;

/// Type alias for dense SDR data (array of bytes, 0 or 1).
pub type SdrDense = Vec<ElemDense>;

/// Type alias for sparse SDR data (sorted indices of active bits).
pub type SdrSparse = Vec<ElemSparse>;

/// Internal cache state for lazy evaluation.
#[derive(Default)]
struct SdrCache {
    dense: Option<SdrDense>,
    sparse: Option<SdrSparse>,
}

/// Sparse Distributed Representation.
///
/// A binary vector where typically only a small percentage of bits are active.
/// Encoders write into an `Sdr` sized to their output width; decoders read the
/// active bits back out.
///
/// # Example
///
/// ```rust
/// use perun::types::Sdr;
///
/// let mut sdr = Sdr::new(&[100]);
/// sdr.set_sparse(&[1, 4, 8, 15, 42]).unwrap();
///
/// assert_eq!(sdr.get_sum(), 5);
/// assert_eq!(sdr.get_dense()[4], 1);
/// ```
pub struct Sdr {
    /// Dimensions of the SDR.
    dimensions: Vec<UInt>,

    /// Total size (product of dimensions).
    size: usize,

    /// Cached representations (interior mutability for lazy evaluation).
    cache: RefCell<SdrCache>,
}

// Custom serialization for Sdr - we serialize dimensions and sparse indices.
#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct SdrState {
        dimensions: Vec<UInt>,
        sparse: Vec<ElemSparse>,
    }

    impl Serialize for Sdr {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let state = SdrState {
                dimensions: self.dimensions.clone(),
                sparse: self.get_sparse(),
            };
            state.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Sdr {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let state = SdrState::deserialize(deserializer)?;
            let mut sdr = Sdr::new(&state.dimensions);
            sdr.set_sparse_unchecked(state.sparse);
            Ok(sdr)
        }
    }
}

impl Sdr {
    /// Creates a new SDR with the given dimensions, initialized to all zeros.
    ///
    /// # Panics
    ///
    /// Panics if dimensions is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use perun::types::Sdr;
    ///
    /// let sdr = Sdr::new(&[100]);        // 1D SDR with 100 bits
    /// let sdr2 = Sdr::new(&[10, 10]);    // 2D SDR with 100 bits
    /// ```
    #[must_use]
    pub fn new(dimensions: &[UInt]) -> Self {
        assert!(!dimensions.is_empty(), "Dimensions cannot be empty");

        let size: usize = dimensions.iter().map(|&d| d as usize).product();

        Self {
            dimensions: dimensions.to_vec(),
            size,
            cache: RefCell::new(SdrCache::default()),
        }
    }

    /// Returns the dimensions of this SDR.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &[UInt] {
        &self.dimensions
    }

    /// Returns the total number of bits in the SDR.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sets all bits to zero.
    pub fn zero(&mut self) {
        let mut cache = self.cache.borrow_mut();
        cache.dense = Some(vec![0; self.size]);
        cache.sparse = Some(Vec::new());
    }

    // ========================================================================
    // Dense format operations
    // ========================================================================

    /// Sets the SDR value from a dense array. Non-zero means active.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length doesn't match the SDR size.
    pub fn set_dense(&mut self, data: &[ElemDense]) -> Result<()> {
        if data.len() != self.size {
            return Err(PerunError::DimensionMismatch {
                expected: vec![self.size as u32],
                actual: vec![data.len() as u32],
            });
        }

        let mut cache = self.cache.borrow_mut();
        cache.dense = Some(data.to_vec());
        cache.sparse = None;
        Ok(())
    }

    /// Sets the SDR value from a dense array, consuming it to avoid copying.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length doesn't match the SDR size.
    pub fn set_dense_owned(&mut self, data: SdrDense) -> Result<()> {
        if data.len() != self.size {
            return Err(PerunError::DimensionMismatch {
                expected: vec![self.size as u32],
                actual: vec![data.len() as u32],
            });
        }

        let mut cache = self.cache.borrow_mut();
        cache.dense = Some(data);
        cache.sparse = None;
        Ok(())
    }

    /// Gets the dense representation of the SDR, computing it from the sparse
    /// form if needed.
    #[must_use]
    pub fn get_dense(&self) -> SdrDense {
        {
            let cache = self.cache.borrow();
            if let Some(ref dense) = cache.dense {
                return dense.clone();
            }
        }

        let sparse = self.get_sparse();
        let mut dense = vec![0u8; self.size];
        for &idx in &sparse {
            dense[idx as usize] = 1;
        }

        let mut cache = self.cache.borrow_mut();
        cache.dense = Some(dense.clone());
        dense
    }

    // ========================================================================
    // Sparse format operations
    // ========================================================================

    /// Sets the SDR value from sorted sparse indices.
    ///
    /// # Errors
    ///
    /// Returns an error if indices are not sorted, contain duplicates, or are
    /// out of bounds.
    pub fn set_sparse(&mut self, indices: &[ElemSparse]) -> Result<()> {
        self.validate_sparse(indices)?;

        let mut cache = self.cache.borrow_mut();
        cache.sparse = Some(indices.to_vec());
        cache.dense = None;
        Ok(())
    }

    /// Sets the SDR value from sparse indices, consuming to avoid copying.
    ///
    /// # Errors
    ///
    /// Returns an error if indices are not sorted, contain duplicates, or are
    /// out of bounds.
    pub fn set_sparse_owned(&mut self, indices: SdrSparse) -> Result<()> {
        self.validate_sparse(&indices)?;

        let mut cache = self.cache.borrow_mut();
        cache.sparse = Some(indices);
        cache.dense = None;
        Ok(())
    }

    /// Sets sparse indices without validation (for internal use).
    pub(crate) fn set_sparse_unchecked(&mut self, indices: SdrSparse) {
        let mut cache = self.cache.borrow_mut();
        cache.sparse = Some(indices);
        cache.dense = None;
    }

    /// Validates sparse indices.
    fn validate_sparse(&self, indices: &[ElemSparse]) -> Result<()> {
        if indices.is_empty() {
            return Ok(());
        }

        let mut prev = indices[0];
        if prev as usize >= self.size {
            return Err(PerunError::IndexOutOfBounds {
                index: prev as usize,
                size: self.size,
            });
        }

        for &idx in &indices[1..] {
            if idx <= prev {
                return Err(PerunError::InvalidSdrData(
                    "Sparse indices must be sorted and unique".to_string(),
                ));
            }
            if idx as usize >= self.size {
                return Err(PerunError::IndexOutOfBounds {
                    index: idx as usize,
                    size: self.size,
                });
            }
            prev = idx;
        }

        Ok(())
    }

    /// Gets the sparse representation of the SDR.
    #[must_use]
    pub fn get_sparse(&self) -> SdrSparse {
        {
            let cache = self.cache.borrow();
            if let Some(ref sparse) = cache.sparse {
                return sparse.clone();
            }
        }

        let sparse: SdrSparse = {
            let cache = self.cache.borrow();
            if let Some(ref dense) = cache.dense {
                dense
                    .iter()
                    .enumerate()
                    .filter(|(_, &v)| v != 0)
                    .map(|(i, _)| i as ElemSparse)
                    .collect()
            } else {
                // No data set yet.
                Vec::new()
            }
        };

        let mut cache = self.cache.borrow_mut();
        cache.sparse = Some(sparse.clone());
        sparse
    }

    /// Gets a reference to the sparse representation.
    pub fn with_sparse<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SdrSparse) -> R,
    {
        {
            let cache = self.cache.borrow();
            if cache.sparse.is_some() {
                return f(cache.sparse.as_ref().unwrap());
            }
        }

        let _ = self.get_sparse();
        let cache = self.cache.borrow();
        f(cache.sparse.as_ref().unwrap())
    }

    // ========================================================================
    // Value queries
    // ========================================================================

    /// Returns the number of active (true) bits.
    #[must_use]
    pub fn get_sum(&self) -> usize {
        self.with_sparse(Vec::len)
    }

    /// Returns the sparsity (fraction of active bits).
    #[must_use]
    pub fn get_sparsity(&self) -> Real {
        if self.size == 0 {
            return 0.0;
        }
        self.get_sum() as Real / self.size as Real
    }

    /// Returns the number of bits that are active in both SDRs.
    #[must_use]
    pub fn get_overlap(&self, other: &Sdr) -> usize {
        let a = self.get_sparse();
        let b = other.get_sparse();

        // Set intersection of sorted vectors
        let mut count = 0;
        let mut i = 0;
        let mut j = 0;

        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }

        count
    }
}

impl Clone for Sdr {
    fn clone(&self) -> Self {
        let new_sdr = Self::new(&self.dimensions);

        // Copy the most efficient representation available
        let cache = self.cache.borrow();
        if let Some(ref sparse) = cache.sparse {
            new_sdr.cache.borrow_mut().sparse = Some(sparse.clone());
        } else if let Some(ref dense) = cache.dense {
            new_sdr.cache.borrow_mut().dense = Some(dense.clone());
        }

        new_sdr
    }
}

impl PartialEq for Sdr {
    fn eq(&self, other: &Self) -> bool {
        if self.dimensions != other.dimensions {
            return false;
        }
        self.get_sparse() == other.get_sparse()
    }
}

impl Eq for Sdr {}

impl fmt::Debug for Sdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sparse = self.get_sparse();
        write!(f, "SDR({:?}) {:?}", self.dimensions, sparse)
    }
}

impl fmt::Display for Sdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SDR( ")?;
        for (i, dim) in self.dimensions.iter().enumerate() {
            write!(f, "{}", dim)?;
            if i + 1 != self.dimensions.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, " ) ")?;

        let sparse = self.get_sparse();
        for (i, &idx) in sparse.iter().enumerate() {
            write!(f, "{}", idx)?;
            if i + 1 != sparse.len() {
                write!(f, ", ")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor() {
        let sdr = Sdr::new(&[3]);
        assert_eq!(sdr.size(), 3);
        assert_eq!(sdr.dimensions(), &[3]);

        let sdr2 = Sdr::new(&[3, 4, 5]);
        assert_eq!(sdr2.size(), 60);
    }

    #[test]
    fn test_zero() {
        let mut sdr = Sdr::new(&[4, 4]);
        sdr.set_dense(&vec![1; 16]).unwrap();
        sdr.zero();
        assert_eq!(sdr.get_sum(), 0);
    }

    #[test]
    fn test_dense_sparse_conversion() {
        let mut sdr = Sdr::new(&[9]);
        sdr.set_dense(&[0, 1, 0, 0, 1, 0, 0, 0, 1]).unwrap();
        assert_eq!(sdr.get_sparse(), vec![1, 4, 8]);

        sdr.set_sparse(&[1, 4, 8]).unwrap();
        assert_eq!(sdr.get_dense(), vec![0, 1, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_sum_sparsity() {
        let mut sdr = Sdr::new(&[100]);
        sdr.set_sparse(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(sdr.get_sum(), 5);
        assert!((sdr.get_sparsity() - 0.05).abs() < 0.001);
    }

    #[test]
    fn test_overlap() {
        let mut a = Sdr::new(&[9]);
        let mut b = Sdr::new(&[9]);
        a.set_sparse(&[1, 2, 3, 4]).unwrap();
        b.set_sparse(&[2, 3, 4, 5]).unwrap();
        assert_eq!(a.get_overlap(&b), 3);
    }

    #[test]
    fn test_invalid_sparse() {
        let mut sdr = Sdr::new(&[10]);
        assert!(sdr.set_sparse(&[3, 2, 1]).is_err());
        assert!(sdr.set_sparse(&[1, 1, 2]).is_err());
        assert!(sdr.set_sparse(&[1, 2, 10]).is_err());
    }

    #[test]
    fn test_dense_size_mismatch() {
        let mut sdr = Sdr::new(&[10]);
        assert!(sdr.set_dense(&[0, 1, 0]).is_err());
    }

    #[test]
    fn test_equality() {
        let mut a = Sdr::new(&[10]);
        let mut b = Sdr::new(&[10]);

        a.set_sparse(&[1, 2, 3]).unwrap();
        b.set_sparse(&[1, 2, 3]).unwrap();
        assert_eq!(a, b);

        b.set_sparse(&[1, 2, 4]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let mut sdr = Sdr::new(&[3, 3]);
        sdr.set_sparse(&[1, 4, 8]).unwrap();
        let s = format!("{}", sdr);
        assert!(s.contains("SDR( 3, 3 )"));
        assert!(s.contains("1, 4, 8"));
    }

    #[test]
    fn test_clone() {
        let mut sdr = Sdr::new(&[10]);
        sdr.set_sparse(&[1, 2, 3]).unwrap();

        let cloned = sdr.clone();
        assert_eq!(sdr, cloned);

        sdr.set_sparse(&[4, 5, 6]).unwrap();
        assert_ne!(sdr, cloned);
    }
}
