//! Utility types and functions.

mod random;

pub use random::Random;
