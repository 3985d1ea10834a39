//! Primitive type definitions for the encoder subsystem.
//!
//! This module provides type aliases that match the semantics of the original
//! Java implementation (which computes in `double` throughout) while leveraging
//! Rust's type system for safety.

/// 32-bit signed integer.
pub type Int32 = i32;

/// 32-bit unsigned integer.
pub type UInt32 = u32;

/// 64-bit signed integer. Coordinate components use this type.
pub type Int64 = i64;

/// 64-bit unsigned integer.
pub type UInt64 = u64;

/// 32-bit floating point number.
pub type Real32 = f32;

/// 64-bit floating point number.
pub type Real64 = f64;

/// Default unsigned integer type for bit counts and indices.
pub type UInt = UInt32;

/// Default floating point type. The port keeps the original's double
/// precision; decode ranges and bucket boundaries are sensitive to it.
pub type Real = Real64;

/// Element type for dense SDR representation.
pub type ElemDense = u8;

/// Element type for sparse SDR representation (indices).
pub type ElemSparse = UInt32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_sizes() {
        assert_eq!(core::mem::size_of::<ElemDense>(), 1);
        assert_eq!(core::mem::size_of::<ElemSparse>(), 4);
        assert_eq!(core::mem::size_of::<Real>(), 8);
    }
}
