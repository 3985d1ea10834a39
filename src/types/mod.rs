//! Core data types for SDR encoding.

mod primitives;
mod sdr;

pub use primitives::{
    ElemDense, ElemSparse, Int32, Int64, Real, Real32, Real64, UInt, UInt32, UInt64,
};
pub use sdr::{Sdr, SdrDense, SdrSparse};
