//! # Perun - Sparse Distributed Representation Encoders
//!
//! Perun converts scalar values and multi-dimensional coordinates into Sparse
//! Distributed Representations (SDRs) - fixed-width binary vectors with a small,
//! fixed number of active bits - and reconstructs approximate source values back
//! from those vectors. It is a Rust port of the encoder subsystem of the NuPIC
//! platform.
//!
//! ## Overview
//!
//! SDRs are the common input/output currency of cortical learning algorithms.
//! An encoder's job is to preserve semantic similarity as bit overlap: nearby
//! values share active bits, distant values do not. The main components are:
//!
//! - **SDR**: the fixed-width binary vector type shared by every operation
//! - **Scalar Encoder/Decoder**: range-to-bitmask encoding with periodic
//!   wraparound, plus the inverse decode with hole-filling and range merging
//! - **Coordinate Encoder**: deterministic hash-based bit selection over an
//!   unbounded integer coordinate space
//! - **Multi Encoder**: routes named sub-encoder outputs into one concatenated
//!   SDR buffer
//! - **Classifier Result**: per-step probability vectors over result buckets,
//!   for downstream classification consumers
//!
//! ## Quick Start
//!
//! ```rust
//! use perun::prelude::*;
//!
//! // Encode a temperature reading into 400 bits, 21 of them active.
//! let encoder = ScalarEncoder::new(ScalarEncoderParams {
//!     min_val: 0.0,
//!     max_val: 100.0,
//!     n: 400,
//!     w: 21,
//!     ..Default::default()
//! }).unwrap();
//!
//! let sdr = encoder.encode_to_sdr(72.5).unwrap();
//! assert_eq!(sdr.get_sum(), 21);
//!
//! // Reconstruct a representative value from the encoding.
//! let top_down = encoder.top_down_compute(&sdr).unwrap();
//! assert!((top_down[0].scalar - 72.5).abs() <= encoder.resolution() / 2.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support for encoder
//!   configurations and SDRs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod types;
pub mod algorithms;
pub mod encoders;
pub mod utils;

/// Re-export of commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::types::{
        Sdr, SdrDense, SdrSparse,
        Int64, Real, Real64, UInt, UInt32,
    };
    pub use crate::algorithms::ClassifierResult;
    pub use crate::encoders::{
        CoordinateEncoder, CoordinateEncoderParams, CoordinateOrder,
        DecodeResult, Decoder, Encoder, EncoderResult, EncoderSpec, FieldDescription,
        FieldValue, MinMax, MultiEncoder, RangeList,
        ScalarEncoder, ScalarEncoderParams,
    };
    pub use crate::utils::Random;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for the library.
pub mod error {
    use thiserror::Error;

    /// Main error type for perun operations.
    #[derive(Error, Debug)]
    pub enum PerunError {
        /// Invalid parameter value at construction.
        #[error("Invalid parameter '{name}': {message}")]
        InvalidParameter {
            /// Name of the invalid parameter.
            name: &'static str,
            /// Description of the error.
            message: String,
        },

        /// Input value outside the configured, non-wrapping value domain.
        #[error("Input {value} outside of range [{min}, {max}]")]
        InputOutOfRange {
            /// The rejected input value.
            value: f64,
            /// Lower bound of the domain.
            min: f64,
            /// Upper bound of the domain.
            max: f64,
        },

        /// Dimension mismatch between SDRs or between an encoder and its
        /// output buffer.
        #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
        DimensionMismatch {
            /// Expected dimensions.
            expected: Vec<u32>,
            /// Actual dimensions.
            actual: Vec<u32>,
        },

        /// Index out of bounds.
        #[error("Index {index} out of bounds (size: {size})")]
        IndexOutOfBounds {
            /// The invalid index.
            index: usize,
            /// The valid size.
            size: usize,
        },

        /// SDR data is invalid (e.g., unsorted sparse indices).
        #[error("Invalid SDR data: {0}")]
        InvalidSdrData(String),
    }

    /// Result type alias using PerunError.
    pub type Result<T> = std::result::Result<T, PerunError>;
}

pub use error::{PerunError, Result};
