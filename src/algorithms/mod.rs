//! Algorithm support types.

mod classification;

pub use classification::ClassifierResult;
