use qmatmul::{
    check_inputs, quantized_matmul, MatmulDims, QDType, QMatmulError, QScheme,
    QuantizationDescriptor, QuantizedMatrix,
};

fn qp(scheme: QScheme) -> QuantizationDescriptor {
    QuantizationDescriptor::new(0.1, 0, scheme).unwrap()
}

fn i8_matrix(shape: &[usize], scheme: QScheme) -> QuantizedMatrix {
    let len = shape.iter().product();
    QuantizedMatrix::new(vec![1i8; len], shape, qp(scheme)).unwrap()
}

fn u8_matrix(shape: &[usize], scheme: QScheme) -> QuantizedMatrix {
    let len = shape.iter().product();
    QuantizedMatrix::new(vec![1u8; len], shape, qp(scheme)).unwrap()
}

const AFFINE: QScheme = QScheme::PerTensorAffine;

#[test]
fn test_valid_operands_return_dims() {
    let a = i8_matrix(&[2, 3], AFFINE);
    let b = i8_matrix(&[3, 5], AFFINE);
    assert_eq!(check_inputs(&a, &b).unwrap(), MatmulDims { m: 2, k: 3, n: 5 });

    let a = u8_matrix(&[4, 1], QScheme::PerTensorSymmetric);
    let b = u8_matrix(&[1, 4], QScheme::PerTensorSymmetric);
    assert_eq!(check_inputs(&a, &b).unwrap(), MatmulDims { m: 4, k: 1, n: 4 });
}

#[test]
fn test_mixed_signedness_is_invalid_data_type() {
    let a = u8_matrix(&[2, 3], AFFINE);
    let b = i8_matrix(&[3, 2], AFFINE);
    let err = check_inputs(&a, &b).unwrap_err();
    assert_eq!(
        err,
        QMatmulError::InvalidDataType {
            a: QDType::QUInt8,
            b: QDType::QInt8,
            reason: "operands must have the same data type",
        }
    );

    // the operator itself fails the same way
    assert!(matches!(
        quantized_matmul(&a, &b, 1.0, 0),
        Err(QMatmulError::InvalidDataType { .. })
    ));
}

#[test]
fn test_wide_type_is_invalid_data_type() {
    let a = QuantizedMatrix::new(vec![1i32; 6], &[2, 3], qp(AFFINE)).unwrap();
    let b = QuantizedMatrix::new(vec![1i32; 6], &[3, 2], qp(AFFINE)).unwrap();
    assert!(matches!(
        check_inputs(&a, &b),
        Err(QMatmulError::InvalidDataType { a: QDType::QInt32, .. })
    ));
}

#[test]
fn test_per_channel_is_unsupported() {
    let a = i8_matrix(&[2, 3], QScheme::PerChannelAffine);
    let b = i8_matrix(&[3, 2], QScheme::PerChannelAffine);
    assert_eq!(
        check_inputs(&a, &b).unwrap_err(),
        QMatmulError::UnsupportedScheme(QScheme::PerChannelAffine)
    );
}

#[test]
fn test_different_schemes_mismatch() {
    let a = i8_matrix(&[2, 3], AFFINE);
    let b = i8_matrix(&[3, 2], QScheme::PerTensorSymmetric);
    assert_eq!(
        check_inputs(&a, &b).unwrap_err(),
        QMatmulError::SchemeMismatch {
            a: AFFINE,
            b: QScheme::PerTensorSymmetric,
        }
    );
}

#[test]
fn test_rank_must_be_two() {
    let a = i8_matrix(&[2, 3, 4], AFFINE);
    let b = i8_matrix(&[2, 4, 3], AFFINE);
    assert_eq!(
        check_inputs(&a, &b).unwrap_err(),
        QMatmulError::DimensionMismatch { a: 3, b: 3 }
    );

    let a = i8_matrix(&[6], AFFINE);
    let b = i8_matrix(&[6, 1], AFFINE);
    assert_eq!(
        check_inputs(&a, &b).unwrap_err(),
        QMatmulError::DimensionMismatch { a: 1, b: 2 }
    );
}

#[test]
fn test_inner_dimension_mismatch() {
    let a = i8_matrix(&[2, 3], AFFINE);
    let b = i8_matrix(&[4, 2], AFFINE);
    let err = check_inputs(&a, &b).unwrap_err();
    assert_eq!(err, QMatmulError::ShapeMismatch { a_cols: 3, b_rows: 4 });
    assert!(err.to_string().contains("(3)") && err.to_string().contains("(4)"));
}

#[test]
fn test_dtype_checked_before_shape() {
    let a = u8_matrix(&[2, 3], AFFINE);
    let b = i8_matrix(&[4, 2], AFFINE);
    assert!(matches!(
        check_inputs(&a, &b),
        Err(QMatmulError::InvalidDataType { .. })
    ));
}

// ============================================================
// Descriptor and output checks
// ============================================================

#[test]
fn test_bad_scales_rejected() {
    for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            QuantizationDescriptor::affine(scale, 0),
            Err(QMatmulError::InvalidScale(_))
        ));
    }
}

#[test]
fn test_zero_point_must_fit_dtype() {
    let qp = QuantizationDescriptor::affine(0.1, 200).unwrap();
    assert!(QuantizedMatrix::new(vec![0u8; 4], &[2, 2], qp).is_ok());
    assert_eq!(
        QuantizedMatrix::new(vec![0i8; 4], &[2, 2], qp).unwrap_err(),
        QMatmulError::ZeroPointOutOfRange {
            zero_point: 200,
            dtype: QDType::QInt8,
            min: -128,
            max: 127,
        }
    );
}

#[test]
fn test_buffer_length_must_match_shape() {
    assert_eq!(
        QuantizedMatrix::new(vec![0i8; 5], &[2, 3], qp(AFFINE)).unwrap_err(),
        QMatmulError::BufferLength {
            shape: vec![2, 3],
            expected: 6,
            actual: 5,
        }
    );
}

#[test]
fn test_output_descriptor_checked() {
    let a = i8_matrix(&[2, 3], AFFINE);
    let b = i8_matrix(&[3, 2], AFFINE);
    assert!(matches!(
        quantized_matmul(&a, &b, 0.0, 0),
        Err(QMatmulError::InvalidScale(_))
    ));
    assert!(matches!(
        quantized_matmul(&a, &b, 1.0, 128),
        Err(QMatmulError::ZeroPointOutOfRange { .. })
    ));
}

#[test]
fn test_quantize_dequantize() {
    let qp = QuantizationDescriptor::affine(0.5, 10).unwrap();
    let m = QuantizedMatrix::quantize_per_tensor(
        &[0.0, 0.25, -0.25, 1.0, 100.0, -100.0],
        &[2, 3],
        qp,
        QDType::QUInt8,
    )
    .unwrap();
    assert_eq!(m.as_u8(), Some(&[10u8, 11, 9, 12, 210, 0][..]));
    assert_eq!(m.dequantize(), vec![0.0, 0.5, -0.5, 1.0, 100.0, -5.0]);

    let wide = QuantizedMatrix::quantize_per_tensor(&[1e6], &[1], qp, QDType::QInt32).unwrap();
    assert_eq!(wide.buffer().to_i64_vec(), vec![2_000_010]);
}
