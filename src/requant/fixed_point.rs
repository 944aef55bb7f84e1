//! Integer-only rescale primitives.
//!
//! `x * mantissa` is formed exactly in 64 bits and then shifted right by
//! `31 - exponent` with a single rounding step, half away from zero. The
//! result matches `round(x * s)` for the real factor `s` the multiplier
//! encodes, so it agrees with the floating-point requantize path.

/// `round(x / 2^exponent)`, ties away from zero.
#[inline]
pub fn rounding_divide_by_pot(x: i64, exponent: u32) -> i64 {
    // i128 keeps the mask and the shift exact for every i64 input
    let exponent = exponent.min(100);
    let x = x as i128;
    let mask = (1i128 << exponent) - 1;
    let remainder = x & mask;
    let threshold = (mask >> 1) + i128::from(x < 0);
    ((x >> exponent) + i128::from(remainder > threshold)) as i64
}

/// Scale `x` by `mantissa / 2^31 * 2^exponent`, saturated to the i32 range.
#[inline]
pub fn multiply_by_quantized_multiplier(x: i32, mantissa: i32, exponent: i32) -> i32 {
    let product = x as i64 * mantissa as i64;
    let shift = 31i64 - exponent as i64;
    let scaled: i128 = if shift >= 0 {
        rounding_divide_by_pot(product, shift.min(u32::MAX as i64) as u32) as i128
    } else {
        // |product| < 2^62, so 64 extra bits cannot overflow an i128
        (product as i128) << (-shift).min(64)
    };
    scaled.clamp(i32::MIN as i128, i32::MAX as i128) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_by_pot_rounds_half_away_from_zero() {
        assert_eq!(rounding_divide_by_pot(2, 2), 1); // 0.5
        assert_eq!(rounding_divide_by_pot(-2, 2), -1); // -0.5
        assert_eq!(rounding_divide_by_pot(5, 2), 1); // 1.25
        assert_eq!(rounding_divide_by_pot(-5, 2), -1); // -1.25
        assert_eq!(rounding_divide_by_pot(6, 2), 2); // 1.5
        assert_eq!(rounding_divide_by_pot(7, 0), 7);
        assert_eq!(rounding_divide_by_pot(i32::MAX as i64, 40), 0);
    }

    #[test]
    fn eighths_round_once() {
        // 0.125 = 2^30 / 2^31 * 2^-2
        assert_eq!(multiply_by_quantized_multiplier(4, 1 << 30, -2), 1); // 0.5
        assert_eq!(multiply_by_quantized_multiplier(11, 1 << 30, -2), 1); // 1.375
        assert_eq!(multiply_by_quantized_multiplier(12, 1 << 30, -2), 2); // 1.5
        assert_eq!(multiply_by_quantized_multiplier(-12, 1 << 30, -2), -2); // -1.5
    }

    #[test]
    fn large_exponent_saturates() {
        assert_eq!(multiply_by_quantized_multiplier(1 << 20, 1 << 30, 20), i32::MAX);
        assert_eq!(multiply_by_quantized_multiplier(-5, 1 << 30, 40), i32::MIN);
        assert_eq!(multiply_by_quantized_multiplier(0, 1 << 30, 200), 0);
    }

    #[test]
    fn tiny_exponent_rounds_to_zero() {
        assert_eq!(multiply_by_quantized_multiplier(i32::MAX, i32::MAX, -200), 0);
        assert_eq!(multiply_by_quantized_multiplier(i32::MIN, 1 << 30, -200), 0);
    }
}
