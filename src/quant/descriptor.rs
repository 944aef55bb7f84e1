//! Element types, quantization schemes and the per-tensor descriptor.

use std::fmt;

use crate::error::{QMatmulError, Result};

/// Storage type of a quantized buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QDType {
    /// Signed 8-bit codes
    QInt8,
    /// Unsigned 8-bit codes
    QUInt8,
    /// Signed 32-bit codes. Storable and convertible, but not a matmul operand.
    QInt32,
}

impl QDType {
    /// Smallest code the type can hold.
    pub fn min_value(self) -> i64 {
        match self {
            QDType::QInt8 => i8::MIN as i64,
            QDType::QUInt8 => u8::MIN as i64,
            QDType::QInt32 => i32::MIN as i64,
        }
    }

    /// Largest code the type can hold.
    pub fn max_value(self) -> i64 {
        match self {
            QDType::QInt8 => i8::MAX as i64,
            QDType::QUInt8 => u8::MAX as i64,
            QDType::QInt32 => i32::MAX as i64,
        }
    }

    /// True for the two types the matmul operator accepts.
    pub fn is_byte(self) -> bool {
        matches!(self, QDType::QInt8 | QDType::QUInt8)
    }
}

impl fmt::Display for QDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QDType::QInt8 => "QInt8",
            QDType::QUInt8 => "QUInt8",
            QDType::QInt32 => "QInt32",
        };
        f.write_str(name)
    }
}

/// How codes map to real values.
///
/// The per-channel tags only exist so operands quantized that way can be
/// described and rejected; this crate never computes with per-channel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QScheme {
    PerTensorAffine,
    PerTensorSymmetric,
    PerChannelAffine,
    PerChannelSymmetric,
}

impl QScheme {
    pub fn is_per_tensor(self) -> bool {
        matches!(self, QScheme::PerTensorAffine | QScheme::PerTensorSymmetric)
    }
}

impl fmt::Display for QScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QScheme::PerTensorAffine => "per_tensor_affine",
            QScheme::PerTensorSymmetric => "per_tensor_symmetric",
            QScheme::PerChannelAffine => "per_channel_affine",
            QScheme::PerChannelSymmetric => "per_channel_symmetric",
        };
        f.write_str(name)
    }
}

/// Scale, zero point and scheme attached to a quantized matrix.
///
/// `real = (code - zero_point) * scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationDescriptor {
    scale: f64,
    zero_point: i64,
    scheme: QScheme,
}

impl QuantizationDescriptor {
    /// Build a descriptor, rejecting scales that are not positive and finite.
    ///
    /// The zero point is range-checked later, once the element type is known
    /// (see [`QuantizationDescriptor::check_zero_point`]).
    pub fn new(scale: f64, zero_point: i64, scheme: QScheme) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(QMatmulError::InvalidScale(scale));
        }
        Ok(Self {
            scale,
            zero_point,
            scheme,
        })
    }

    /// Per-tensor affine descriptor.
    pub fn affine(scale: f64, zero_point: i64) -> Result<Self> {
        Self::new(scale, zero_point, QScheme::PerTensorAffine)
    }

    /// Per-tensor symmetric descriptor (zero point 0).
    pub fn symmetric(scale: f64) -> Result<Self> {
        Self::new(scale, 0, QScheme::PerTensorSymmetric)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn zero_point(&self) -> i64 {
        self.zero_point
    }

    pub fn scheme(&self) -> QScheme {
        self.scheme
    }

    /// Fails unless the zero point fits in `dtype`.
    pub fn check_zero_point(&self, dtype: QDType) -> Result<()> {
        let (min, max) = (dtype.min_value(), dtype.max_value());
        if self.zero_point < min || self.zero_point > max {
            return Err(QMatmulError::ZeroPointOutOfRange {
                zero_point: self.zero_point,
                dtype,
                min,
                max,
            });
        }
        Ok(())
    }
}
