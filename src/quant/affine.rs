//! Scalar affine mapping between codes and real values.
//!
//! Rounding is half away from zero (`f64::round`), the same convention the
//! fixed-point rescale in [`crate::requant`] uses.

/// `(code - zero_point) * scale`
#[inline]
pub fn dequantize_value(code: i64, scale: f64, zero_point: i64) -> f64 {
    (code - zero_point) as f64 * scale
}

/// `round(value / scale) + zero_point`, saturated to `[min, max]`.
#[inline]
pub fn quantize_value(value: f64, scale: f64, zero_point: i64, min: i64, max: i64) -> i64 {
    let scaled = (value / scale).round();
    // `as` saturates on overflow and maps NaN to 0
    let code = (scaled as i64).saturating_add(zero_point);
    code.clamp(min, max)
}
