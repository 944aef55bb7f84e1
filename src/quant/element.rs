//! 8-bit element types the kernels are generic over.

use super::descriptor::QDType;
use super::matrix::QuantizedBuffer;

/// An 8-bit quantized code: `i8` or `u8`.
///
/// Kernels are monomorphized per element type, so mixing signed and unsigned
/// operands inside one call cannot be expressed.
pub trait QuantElement: Copy + Send + Sync + 'static {
    const DTYPE: QDType;
    const MIN: i32;
    const MAX: i32;

    fn widen(self) -> i32;

    /// Clamp `v` into the representable range, then narrow.
    fn saturate(v: i64) -> Self;

    /// Borrow the typed contents of a buffer, if it stores this type.
    fn view(buffer: &QuantizedBuffer) -> Option<&[Self]>;

    fn into_buffer(data: Vec<Self>) -> QuantizedBuffer;
}

impl QuantElement for i8 {
    const DTYPE: QDType = QDType::QInt8;
    const MIN: i32 = i8::MIN as i32;
    const MAX: i32 = i8::MAX as i32;

    #[inline]
    fn widen(self) -> i32 {
        self as i32
    }

    #[inline]
    fn saturate(v: i64) -> Self {
        v.clamp(Self::MIN as i64, Self::MAX as i64) as i8
    }

    fn view(buffer: &QuantizedBuffer) -> Option<&[Self]> {
        match buffer {
            QuantizedBuffer::I8(data) => Some(data),
            _ => None,
        }
    }

    fn into_buffer(data: Vec<Self>) -> QuantizedBuffer {
        QuantizedBuffer::I8(data)
    }
}

impl QuantElement for u8 {
    const DTYPE: QDType = QDType::QUInt8;
    const MIN: i32 = u8::MIN as i32;
    const MAX: i32 = u8::MAX as i32;

    #[inline]
    fn widen(self) -> i32 {
        self as i32
    }

    #[inline]
    fn saturate(v: i64) -> Self {
        v.clamp(Self::MIN as i64, Self::MAX as i64) as u8
    }

    fn view(buffer: &QuantizedBuffer) -> Option<&[Self]> {
        match buffer {
            QuantizedBuffer::U8(data) => Some(data),
            _ => None,
        }
    }

    fn into_buffer(data: Vec<Self>) -> QuantizedBuffer {
        QuantizedBuffer::U8(data)
    }
}
