//! End-to-end test of the encoding pipeline: a composite record encoded into
//! one SDR, decoded back into per-field ranges, and fed through the
//! classification result container.

use perun::prelude::*;

fn build_record_encoder() -> MultiEncoder {
    MultiEncoder::from_specs(vec![
        (
            "temperature".to_string(),
            EncoderSpec::Scalar(ScalarEncoderParams {
                min_val: -40.0,
                max_val: 60.0,
                n: 200,
                w: 21,
                ..Default::default()
            }),
        ),
        (
            "wind_direction".to_string(),
            EncoderSpec::Scalar(ScalarEncoderParams {
                min_val: 0.0,
                max_val: 360.0,
                n: 180,
                w: 21,
                periodic: true,
                ..Default::default()
            }),
        ),
        (
            "position".to_string(),
            EncoderSpec::Coordinate(CoordinateEncoderParams {
                n: 500,
                w: 11,
                dimensions: 2,
                forced: false,
            }),
        ),
    ])
    .unwrap()
}

fn sample_record() -> Vec<FieldValue> {
    vec![
        FieldValue::Scalar(21.5),
        FieldValue::Scalar(350.0),
        FieldValue::Coordinate {
            point: vec![31, 117],
            radius: 4.0,
        },
    ]
}

#[test]
fn encode_decode_round_trip() {
    let encoder = build_record_encoder();
    let sdr = encoder.encode_to_sdr(&sample_record()[..]).unwrap();

    assert_eq!(sdr.size(), 200 + 180 + 500);
    // Two scalar fields at 21 bits each, plus up to 11 coordinate bits.
    assert!(sdr.get_sum() > 42);
    assert!(sdr.get_sum() <= 42 + 11);

    let decoded = encoder.decode(&sdr, "").unwrap();
    assert_eq!(decoded.fields.len(), 2);

    let temperature = decoded.field("temperature").unwrap();
    assert_eq!(temperature.ranges.len(), 1);
    assert!((temperature.ranges[0].min - 21.5).abs() < 1.0);

    let wind = decoded.field("wind_direction").unwrap();
    assert!(!wind.ranges.is_empty());
    let recovered = wind.ranges[0].min;
    let error = (recovered - 350.0).abs();
    assert!(error.min(360.0 - error) < 4.0);
}

#[test]
fn field_descriptors_partition_the_output() {
    let encoder = build_record_encoder();
    let descriptors = encoder.description();

    let mut expected_offset = 0;
    for descriptor in &descriptors {
        assert_eq!(descriptor.offset, expected_offset);
        expected_offset += descriptor.width;
    }
    assert_eq!(expected_offset as usize, encoder.size());
}

#[test]
fn field_slices_match_standalone_encodings() {
    let encoder = build_record_encoder();
    let record = sample_record();
    let sdr = encoder.encode_to_sdr(&record[..]).unwrap();
    let dense = sdr.get_dense();

    for (descriptor, value) in encoder.description().iter().zip(&record) {
        let standalone = encoder.encode_field(&descriptor.name, value).unwrap();
        let start = descriptor.offset as usize;
        let end = start + descriptor.width as usize;
        assert_eq!(
            dense[start..end],
            standalone.get_dense()[..],
            "slice mismatch for field {}",
            descriptor.name
        );
    }
}

#[test]
fn missing_fields_decode_to_nothing() {
    let encoder = build_record_encoder();
    let record = vec![
        FieldValue::Missing,
        FieldValue::Scalar(90.0),
        FieldValue::Missing,
    ];
    let sdr = encoder.encode_to_sdr(&record[..]).unwrap();
    assert_eq!(sdr.get_sum(), 21);

    let decoded = encoder.decode(&sdr, "").unwrap();
    // The missing temperature contributes no ranges at all.
    assert!(decoded.field("temperature").is_none());
    assert!(decoded.field("wind_direction").is_some());
}

#[test]
fn top_down_on_a_field_slice() {
    let scalar = ScalarEncoder::new(ScalarEncoderParams {
        min_val: -40.0,
        max_val: 60.0,
        n: 200,
        w: 21,
        ..Default::default()
    })
    .unwrap();

    let sdr = scalar.encode_to_sdr(21.5).unwrap();
    let results = scalar.top_down_compute(&sdr).unwrap();
    assert_eq!(results.len(), 1);
    assert!((results[0].scalar - 21.5).abs() <= scalar.resolution() / 2.0 + 1e-9);
    assert_eq!(results[0].encoding.get_sum(), 21);
}

#[test]
fn classification_over_encoder_buckets() {
    let scalar = ScalarEncoder::new(ScalarEncoderParams {
        min_val: 0.0,
        max_val: 10.0,
        n: 100,
        w: 11,
        forced: true,
        ..Default::default()
    })
    .unwrap();

    // A classifier would learn these; here we just wire the containers up.
    let bucket_values = scalar.get_bucket_values();
    let mut votes = vec![0.0; bucket_values.len()];
    let target_bucket = scalar.get_bucket_indices(7.0).unwrap()[0] as usize;
    votes[target_bucket] = 0.9;

    let mut result: ClassifierResult<f64> = ClassifierResult::new();
    result.set_actual_values(bucket_values.clone());
    result.set_stats(1, votes);

    let predicted_bucket = result.most_probable_bucket(1).unwrap();
    let predicted_value = *result.actual_value(predicted_bucket).unwrap();
    assert!((predicted_value - 7.0).abs() <= scalar.resolution() / 2.0 + 1e-9);
}

#[cfg(feature = "serde")]
#[test]
fn sdr_serde_round_trip() {
    let encoder = build_record_encoder();
    let sdr = encoder.encode_to_sdr(&sample_record()[..]).unwrap();

    let json = serde_json::to_string(&sdr).unwrap();
    let restored: Sdr = serde_json::from_str(&json).unwrap();
    assert_eq!(sdr, restored);
}
