//! Real rescale factor → `(mantissa, exponent)` fixed-point pair.

use log::trace;

use super::fixed_point::multiply_by_quantized_multiplier;
use crate::error::{QMatmulError, Result};

const TWO_POW_31: i64 = 1 << 31;

/// Fixed-point encoding of a positive real factor:
/// `s ≈ mantissa / 2^31 * 2^exponent` with `mantissa` in `[2^30, 2^31)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointMultiplier {
    mantissa: i32,
    exponent: i32,
}

impl FixedPointMultiplier {
    /// Derive the multiplier for `s`.
    ///
    /// Fails with `DomainError` unless `s` is positive and finite, and with
    /// `OverflowError` if the rounded mantissa does not fit in an i32.
    pub fn derive(s: f64) -> Result<Self> {
        if !(s > 0.0 && s.is_finite()) {
            return Err(QMatmulError::DomainError(s));
        }
        let (q, mut exponent) = frexp(s);
        // q * 2^31 is exact in f64, only the rounding is lossy
        let mut q_fixed = (q * TWO_POW_31 as f64).round() as i64;
        if q_fixed == TWO_POW_31 {
            q_fixed /= 2;
            exponent += 1;
        }
        // q < 1 and the renormalization above keep q_fixed <= 2^31 - 1; guard only
        let mantissa =
            i32::try_from(q_fixed).map_err(|_| QMatmulError::OverflowError { mantissa: q_fixed })?;
        trace!("fixed-point multiplier for {s}: mantissa={mantissa} exponent={exponent}");
        Ok(Self { mantissa, exponent })
    }

    pub fn mantissa(&self) -> i32 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// The real factor this multiplier encodes.
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / TWO_POW_31 as f64 * 2f64.powi(self.exponent)
    }

    /// `round(acc * s)` using integer arithmetic only.
    #[inline]
    pub fn apply(&self, acc: i32) -> i32 {
        multiply_by_quantized_multiplier(acc, self.mantissa, self.exponent)
    }
}

/// Free-function form of [`FixedPointMultiplier::derive`].
///
/// ```
/// use qmatmul::derive_multiplier;
///
/// let m = derive_multiplier(0.125).unwrap();
/// assert_eq!((m.mantissa(), m.exponent()), (1 << 30, -2));
/// assert_eq!(m.apply(40), 5);
/// ```
pub fn derive_multiplier(s: f64) -> Result<FixedPointMultiplier> {
    FixedPointMultiplier::derive(s)
}

/// Split a positive finite `x` into `(q, e)` with `x = q * 2^e` and
/// `q` in `[0.5, 1)`.
pub(crate) fn frexp(x: f64) -> (f64, i32) {
    const EXP_MASK: u64 = 0x7ff << 52;
    let bits = x.to_bits();
    let biased = ((bits & EXP_MASK) >> 52) as i32;
    if biased == 0 {
        // subnormal: scale into the normal range first
        let (q, e) = frexp(x * 2f64.powi(64));
        return (q, e - 64);
    }
    // force the biased exponent to 1022, i.e. a value in [0.5, 1)
    let q = f64::from_bits((bits & !EXP_MASK) | (1022u64 << 52));
    (q, biased - 1022)
}
