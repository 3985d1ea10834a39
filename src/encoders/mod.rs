//! Encoders convert real-world values into SDRs and, where supported, back.
//!
//! - [`ScalarEncoder`]: numeric values in a bounded (optionally periodic)
//!   domain, with full decode support
//! - [`CoordinateEncoder`]: integer coordinates in an unbounded space,
//!   encode-only
//! - [`MultiEncoder`]: named fields concatenated into one output

mod base;
mod coordinate;
mod decode;
mod multi;
mod scalar;

pub use base::{Decoder, Encoder, FieldDescription};
pub use coordinate::{CoordinateEncoder, CoordinateEncoderParams, CoordinateOrder};
pub use decode::{DecodeResult, EncoderResult, MinMax, RangeList};
pub use multi::{EncoderSpec, FieldValue, MultiEncoder};
pub use scalar::{ScalarEncoder, ScalarEncoderParams};
