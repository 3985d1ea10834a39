//! Multi encoder: combines named sub-encoders into one concatenated output.
//!
//! Each registered field owns a contiguous slice of the combined bit buffer,
//! in registration order. Encoding takes one tagged value per field; decoding
//! routes each field's slice back to its sub-encoder (fields without a
//! decoder, like coordinates, are skipped).

use crate::error::{PerunError, Result};
use crate::types::{Int64, Real, Real64, Sdr, UInt};

use super::base::{Decoder, Encoder, FieldDescription};
use super::coordinate::{CoordinateEncoder, CoordinateEncoderParams};
use super::decode::DecodeResult;
use super::scalar::{ScalarEncoder, ScalarEncoderParams};

/// One input value for a multi-encoder field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// A numeric value for a scalar field.
    Scalar(Real),
    /// Missing data; the field's slice encodes as all zeros.
    Missing,
    /// A coordinate and radius for a coordinate field.
    Coordinate {
        /// The coordinate's integer components.
        point: Vec<Int64>,
        /// Neighborhood radius.
        radius: Real64,
    },
}

/// Declarative description of one sub-encoder, for [`MultiEncoder::from_specs`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncoderSpec {
    /// A scalar field.
    Scalar(ScalarEncoderParams),
    /// A coordinate field.
    Coordinate(CoordinateEncoderParams),
}

#[derive(Debug, Clone)]
enum FieldEncoder {
    Scalar(ScalarEncoder),
    Coordinate(CoordinateEncoder),
}

impl FieldEncoder {
    fn width(&self) -> UInt {
        match self {
            FieldEncoder::Scalar(e) => e.n(),
            FieldEncoder::Coordinate(e) => e.n(),
        }
    }
}

/// Combines several named encoders into a single concatenated encoding.
///
/// # Example
///
/// ```rust
/// use perun::prelude::*;
///
/// let mut encoder = MultiEncoder::new();
/// encoder.add_scalar("temperature", ScalarEncoderParams {
///     min_val: -40.0,
///     max_val: 60.0,
///     ..Default::default()
/// }).unwrap();
/// encoder.add_coordinate("position", CoordinateEncoderParams::default()).unwrap();
///
/// let sdr = encoder.encode_to_sdr(&[
///     FieldValue::Scalar(21.5),
///     FieldValue::Coordinate { point: vec![10, 20], radius: 3.0 },
/// ][..]).unwrap();
/// assert_eq!(sdr.size(), encoder.size());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MultiEncoder {
    fields: Vec<(FieldDescription, FieldEncoder)>,
    width: UInt,
}

impl MultiEncoder {
    /// Creates an empty multi encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a multi encoder from a list of named sub-encoder specs, in
    /// field order.
    ///
    /// # Errors
    ///
    /// Returns an error if any name repeats or any sub-encoder's parameters
    /// are invalid.
    pub fn from_specs(specs: Vec<(String, EncoderSpec)>) -> Result<Self> {
        let mut encoder = Self::new();
        for (name, spec) in specs {
            match spec {
                EncoderSpec::Scalar(params) => encoder.add_scalar(&name, params)?,
                EncoderSpec::Coordinate(params) => encoder.add_coordinate(&name, params)?,
            }
        }
        Ok(encoder)
    }

    /// Appends a scalar field. Its slice starts where the previous field
    /// ended. The sub-encoder takes the field name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already registered or the parameters
    /// are invalid.
    pub fn add_scalar(&mut self, name: &str, mut params: ScalarEncoderParams) -> Result<()> {
        self.check_name(name)?;
        params.name = Some(name.to_string());
        let encoder = ScalarEncoder::new(params)?;
        self.push_field(name, FieldEncoder::Scalar(encoder));
        Ok(())
    }

    /// Appends a coordinate field.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already registered or the parameters
    /// are invalid.
    pub fn add_coordinate(&mut self, name: &str, params: CoordinateEncoderParams) -> Result<()> {
        self.check_name(name)?;
        let encoder = CoordinateEncoder::new(params)?;
        self.push_field(name, FieldEncoder::Coordinate(encoder));
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if self.fields.iter().any(|(d, _)| d.name == name) {
            return Err(PerunError::InvalidParameter {
                name: "name",
                message: format!("field '{name}' is already registered"),
            });
        }
        Ok(())
    }

    fn push_field(&mut self, name: &str, encoder: FieldEncoder) {
        let width = encoder.width();
        self.fields.push((
            FieldDescription {
                name: name.to_string(),
                offset: self.width,
                width,
            },
            encoder,
        ));
        self.width += width;
    }

    /// Returns the field descriptors, in field order.
    #[must_use]
    pub fn description(&self) -> Vec<FieldDescription> {
        self.fields.iter().map(|(d, _)| d.clone()).collect()
    }

    /// Returns the descriptor of the named field, if registered.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescription> {
        self.fields
            .iter()
            .map(|(d, _)| d)
            .find(|d| d.name == name)
    }

    /// Number of registered fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Encodes a single field's value into its own standalone SDR (sized to
    /// the field's width, not the combined output).
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown or the value's variant does
    /// not match the field's encoder.
    pub fn encode_field(&self, name: &str, value: &FieldValue) -> Result<Sdr> {
        let (_, encoder) = self
            .fields
            .iter()
            .find(|(d, _)| d.name == name)
            .ok_or_else(|| PerunError::InvalidParameter {
                name: "name",
                message: format!("unknown field '{name}'"),
            })?;
        Self::encode_with(encoder, value)
    }

    fn encode_with(encoder: &FieldEncoder, value: &FieldValue) -> Result<Sdr> {
        match (encoder, value) {
            (FieldEncoder::Scalar(e), FieldValue::Scalar(v)) => e.encode_to_sdr(*v),
            (FieldEncoder::Scalar(e), FieldValue::Missing) => e.encode_to_sdr(None),
            (FieldEncoder::Coordinate(e), FieldValue::Coordinate { point, radius }) => {
                e.encode_to_sdr((point.as_slice(), *radius))
            }
            (FieldEncoder::Coordinate(e), FieldValue::Missing) => Ok(Sdr::new(&[e.n()])),
            _ => Err(PerunError::InvalidParameter {
                name: "value",
                message: "field value variant does not match the field's encoder".to_string(),
            }),
        }
    }

    /// Decodes each scalar field's slice of the SDR. Field names in the
    /// result are prefixed with `parent_name` when it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDR dimensions don't match the combined output.
    pub fn decode(&self, sdr: &Sdr, parent_name: &str) -> Result<DecodeResult> {
        if sdr.dimensions() != [self.width] {
            return Err(PerunError::DimensionMismatch {
                expected: vec![self.width],
                actual: sdr.dimensions().to_vec(),
            });
        }

        let dense = sdr.get_dense();
        let mut result = DecodeResult::new();
        for (desc, encoder) in &self.fields {
            if let FieldEncoder::Scalar(scalar) = encoder {
                let start = desc.offset as usize;
                let end = start + desc.width as usize;
                let mut slice = Sdr::new(&[desc.width]);
                slice.set_dense(&dense[start..end])?;
                result.merge(scalar.decode(&slice, parent_name)?);
            }
        }
        Ok(result)
    }
}

impl Encoder<&[FieldValue]> for MultiEncoder {
    fn dimensions(&self) -> &[UInt] {
        std::slice::from_ref(&self.width)
    }

    fn size(&self) -> usize {
        self.width as usize
    }

    fn encode(&self, values: &[FieldValue], output: &mut Sdr) -> Result<()> {
        if output.dimensions() != [self.width] {
            return Err(PerunError::DimensionMismatch {
                expected: vec![self.width],
                actual: output.dimensions().to_vec(),
            });
        }
        if values.len() != self.fields.len() {
            return Err(PerunError::InvalidParameter {
                name: "values",
                message: format!(
                    "expected {} field values, got {}",
                    self.fields.len(),
                    values.len()
                ),
            });
        }

        let mut dense = vec![0u8; self.width as usize];
        for ((desc, encoder), value) in self.fields.iter().zip(values) {
            let field_sdr = Self::encode_with(encoder, value)?;
            let start = desc.offset as usize;
            for idx in field_sdr.get_sparse() {
                dense[start + idx as usize] = 1;
            }
        }
        output.set_dense_owned(dense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scalar(min_val: Real, max_val: Real) -> ScalarEncoderParams {
        ScalarEncoderParams {
            min_val,
            max_val,
            n: 14,
            w: 3,
            forced: true,
            ..Default::default()
        }
    }

    fn two_field_encoder() -> MultiEncoder {
        let mut encoder = MultiEncoder::new();
        encoder.add_scalar("a", small_scalar(1.0, 10.0)).unwrap();
        encoder.add_scalar("b", small_scalar(0.0, 100.0)).unwrap();
        encoder
    }

    #[test]
    fn test_description_offsets() {
        let mut encoder = two_field_encoder();
        encoder
            .add_coordinate(
                "c",
                CoordinateEncoderParams {
                    n: 200,
                    w: 5,
                    forced: true,
                    ..Default::default()
                },
            )
            .unwrap();

        let desc = encoder.description();
        assert_eq!(desc.len(), 3);
        assert_eq!((desc[0].offset, desc[0].width), (0, 14));
        assert_eq!((desc[1].offset, desc[1].width), (14, 14));
        assert_eq!((desc[2].offset, desc[2].width), (28, 200));
        assert_eq!(encoder.size(), 228);

        assert_eq!(encoder.field("b").unwrap().offset, 14);
        assert!(encoder.field("missing").is_none());
    }

    #[test]
    fn test_duplicate_name() {
        let mut encoder = two_field_encoder();
        assert!(encoder.add_scalar("a", small_scalar(0.0, 1.0)).is_err());
    }

    #[test]
    fn test_encode_places_fields_at_offsets() {
        let encoder = two_field_encoder();
        let sdr = encoder
            .encode_to_sdr(&[FieldValue::Scalar(1.0), FieldValue::Scalar(0.0)][..])
            .unwrap();

        let standalone_a = encoder
            .encode_field("a", &FieldValue::Scalar(1.0))
            .unwrap();
        let standalone_b = encoder
            .encode_field("b", &FieldValue::Scalar(0.0))
            .unwrap();

        let combined = sdr.get_sparse();
        let mut expected: Vec<u32> = standalone_a.get_sparse();
        expected.extend(standalone_b.get_sparse().iter().map(|i| i + 14));
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_encode_missing_field() {
        let encoder = two_field_encoder();
        let sdr = encoder
            .encode_to_sdr(&[FieldValue::Missing, FieldValue::Scalar(50.0)][..])
            .unwrap();
        // Field a's slice stays empty.
        assert!(sdr.get_sparse().iter().all(|&i| i >= 14));
        assert_eq!(sdr.get_sum(), 3);
    }

    #[test]
    fn test_encode_wrong_arity() {
        let encoder = two_field_encoder();
        assert!(encoder
            .encode_to_sdr(&[FieldValue::Scalar(1.0)][..])
            .is_err());
    }

    #[test]
    fn test_encode_variant_mismatch() {
        let encoder = two_field_encoder();
        let values = [
            FieldValue::Coordinate {
                point: vec![1],
                radius: 1.0,
            },
            FieldValue::Scalar(1.0),
        ];
        assert!(encoder.encode_to_sdr(&values[..]).is_err());
    }

    #[test]
    fn test_encode_field_unknown() {
        let encoder = two_field_encoder();
        assert!(encoder
            .encode_field("nope", &FieldValue::Scalar(1.0))
            .is_err());
    }

    #[test]
    fn test_decode_routes_to_fields() {
        let encoder = two_field_encoder();
        let sdr = encoder
            .encode_to_sdr(&[FieldValue::Scalar(5.0), FieldValue::Scalar(50.0)][..])
            .unwrap();

        let result = encoder.decode(&sdr, "").unwrap();
        assert_eq!(result.fields.len(), 2);

        let a = result.field("a").unwrap();
        assert_eq!(a.ranges.len(), 1);
        assert!((a.ranges[0].min - 5.0).abs() <= 1.0);

        let b = result.field("b").unwrap();
        assert_eq!(b.ranges.len(), 1);
        assert!((b.ranges[0].min - 50.0).abs() <= 10.0);
    }

    #[test]
    fn test_decode_namespaces_parent() {
        let encoder = two_field_encoder();
        let sdr = encoder
            .encode_to_sdr(&[FieldValue::Scalar(5.0), FieldValue::Scalar(50.0)][..])
            .unwrap();
        let result = encoder.decode(&sdr, "record").unwrap();
        assert!(result.field("record.a").is_some());
        assert!(result.field("record.b").is_some());
    }

    #[test]
    fn test_decode_skips_coordinate_fields() {
        let mut encoder = MultiEncoder::new();
        encoder.add_scalar("s", small_scalar(1.0, 10.0)).unwrap();
        encoder
            .add_coordinate("c", CoordinateEncoderParams::default())
            .unwrap();

        let sdr = encoder
            .encode_to_sdr(&[
                FieldValue::Scalar(3.0),
                FieldValue::Coordinate {
                    point: vec![5, 5],
                    radius: 2.0,
                },
            ][..])
            .unwrap();

        let result = encoder.decode(&sdr, "").unwrap();
        assert_eq!(result.fields.len(), 1);
        assert!(result.field("s").is_some());
    }

    #[test]
    fn test_from_specs() {
        let encoder = MultiEncoder::from_specs(vec![
            ("a".to_string(), EncoderSpec::Scalar(small_scalar(1.0, 10.0))),
            (
                "c".to_string(),
                EncoderSpec::Coordinate(CoordinateEncoderParams::default()),
            ),
        ])
        .unwrap();
        assert_eq!(encoder.field_count(), 2);
        assert_eq!(encoder.size(), 14 + 1000);
    }
}
