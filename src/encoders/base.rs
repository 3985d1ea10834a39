//! Base traits shared by all encoders.

use crate::error::Result;
use crate::types::{Real, Sdr, UInt};

use super::decode::{DecodeResult, EncoderResult};

/// Trait for encoding values into SDRs.
///
/// Encoders convert real-world values (scalars, coordinates, composite
/// records) into Sparse Distributed Representations. The conversion preserves
/// semantic similarity: similar inputs produce SDRs with high overlap.
pub trait Encoder<T> {
    /// Returns the output dimensions of this encoder.
    fn dimensions(&self) -> &[UInt];

    /// Returns the total output size (number of bits).
    fn size(&self) -> usize;

    /// Encodes the given value into the provided SDR.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDR dimensions don't match the encoder output,
    /// or if the value cannot be encoded.
    fn encode(&self, value: T, output: &mut Sdr) -> Result<()>;

    /// Convenience method that creates a new SDR and encodes into it.
    fn encode_to_sdr(&self, value: T) -> Result<Sdr> {
        let mut output = Sdr::new(self.dimensions());
        self.encode(value, &mut output)?;
        Ok(output)
    }
}

/// Description of one field inside a concatenated encoder output.
///
/// The multi encoder reports one of these per registered sub-encoder so
/// consumers can locate each field's slice of the combined bit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDescription {
    /// Field name, unique within the parent encoder.
    pub name: String,
    /// Offset of the field's first bit in the combined output.
    pub offset: UInt,
    /// Number of bits the field occupies.
    pub width: UInt,
}

/// Trait for encoders that also support the inverse direction: recovering
/// approximate input values from an SDR.
///
/// Decoding is tolerant of noisy input. Bits may be missing or spurious; the
/// decoder reports ranges of input values consistent with what it sees rather
/// than a single value.
pub trait Decoder {
    /// Decodes an SDR into per-field ranges of consistent input values.
    ///
    /// `parent_name` prefixes the field name in the result, so composite
    /// encoders can namespace their children.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDR dimensions don't match the encoder output.
    fn decode(&self, sdr: &Sdr, parent_name: &str) -> Result<DecodeResult>;

    /// Computes the best-matching interpretation(s) of an SDR: one
    /// `EncoderResult` per decoded range, each carrying the representative
    /// value, its bucket index, and the canonical encoding of that bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDR dimensions don't match the encoder output.
    fn top_down_compute(&self, sdr: &Sdr) -> Result<Vec<EncoderResult>>;

    /// Returns the bucket indices the given value falls into.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside the encoder's domain and
    /// clipping is disabled.
    fn get_bucket_indices(&self, value: Real) -> Result<Vec<UInt>>;

    /// Returns the canonical interpretation of each listed bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if any bucket index is out of range.
    fn get_bucket_info(&self, buckets: &[UInt]) -> Result<Vec<EncoderResult>>;

    /// Returns the representative value of every bucket, in ascending order.
    fn get_bucket_values(&self) -> Vec<Real>;

    /// Scores how close `actual` values are to `expected` values,
    /// element-wise. With `fractional` set, scores are normalized to `[0, 1]`
    /// where 1 means identical; otherwise raw distances are returned. Note
    /// the two modes run in opposite directions: fractional scores are
    /// similarities (higher is closer), raw scores are distances (lower is
    /// closer).
    fn closeness_scores(&self, expected: &[Real], actual: &[Real], fractional: bool) -> Vec<Real>;
}
