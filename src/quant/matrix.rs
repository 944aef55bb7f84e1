//! Quantized matrix: typed code buffer + shape + descriptor.

use super::affine::{dequantize_value, quantize_value};
use super::descriptor::{QDType, QScheme, QuantizationDescriptor};
use crate::error::{QMatmulError, Result};

/// Row-major code storage. The variant fixes the element type.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizedBuffer {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I32(Vec<i32>),
}

impl QuantizedBuffer {
    pub fn dtype(&self) -> QDType {
        match self {
            QuantizedBuffer::I8(_) => QDType::QInt8,
            QuantizedBuffer::U8(_) => QDType::QUInt8,
            QuantizedBuffer::I32(_) => QDType::QInt32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            QuantizedBuffer::I8(v) => v.len(),
            QuantizedBuffer::U8(v) => v.len(),
            QuantizedBuffer::I32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every code widened to i64, in storage order.
    pub fn to_i64_vec(&self) -> Vec<i64> {
        match self {
            QuantizedBuffer::I8(v) => v.iter().map(|&q| q as i64).collect(),
            QuantizedBuffer::U8(v) => v.iter().map(|&q| q as i64).collect(),
            QuantizedBuffer::I32(v) => v.iter().map(|&q| q as i64).collect(),
        }
    }

    fn from_codes(codes: Vec<i64>, dtype: QDType) -> Self {
        // codes are already clamped to the dtype range
        match dtype {
            QDType::QInt8 => QuantizedBuffer::I8(codes.into_iter().map(|q| q as i8).collect()),
            QDType::QUInt8 => QuantizedBuffer::U8(codes.into_iter().map(|q| q as u8).collect()),
            QDType::QInt32 => QuantizedBuffer::I32(codes.into_iter().map(|q| q as i32).collect()),
        }
    }
}

impl From<Vec<i8>> for QuantizedBuffer {
    fn from(v: Vec<i8>) -> Self {
        QuantizedBuffer::I8(v)
    }
}

impl From<Vec<u8>> for QuantizedBuffer {
    fn from(v: Vec<u8>) -> Self {
        QuantizedBuffer::U8(v)
    }
}

impl From<Vec<i32>> for QuantizedBuffer {
    fn from(v: Vec<i32>) -> Self {
        QuantizedBuffer::I32(v)
    }
}

/// A quantized tensor. Matmul operands must be 2-D, but construction
/// accepts any rank so that bad operands can be represented and rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedMatrix {
    buffer: QuantizedBuffer,
    shape: Vec<usize>,
    qparams: QuantizationDescriptor,
}

impl QuantizedMatrix {
    /// Wrap a buffer.
    ///
    /// Fails if the buffer length does not match `shape` or the zero point is
    /// not representable in the buffer's element type.
    ///
    /// ```
    /// use qmatmul::{QuantizationDescriptor, QuantizedMatrix};
    ///
    /// let qp = QuantizationDescriptor::affine(0.5, 0).unwrap();
    /// let m = QuantizedMatrix::new(vec![1i8, 2, 3, 4, 5, 6], &[2, 3], qp).unwrap();
    /// assert_eq!((m.rows(), m.cols()), (2, 3));
    /// ```
    pub fn new(
        buffer: impl Into<QuantizedBuffer>,
        shape: &[usize],
        qparams: QuantizationDescriptor,
    ) -> Result<Self> {
        let buffer = buffer.into();
        let expected: usize = shape.iter().product();
        if buffer.len() != expected {
            return Err(QMatmulError::BufferLength {
                shape: shape.to_vec(),
                expected,
                actual: buffer.len(),
            });
        }
        qparams.check_zero_point(buffer.dtype())?;
        Ok(Self {
            buffer,
            shape: shape.to_vec(),
            qparams,
        })
    }

    /// Quantize real values per tensor: `round(v / scale) + zero_point`,
    /// saturated to `dtype`.
    pub fn quantize_per_tensor(
        values: &[f64],
        shape: &[usize],
        qparams: QuantizationDescriptor,
        dtype: QDType,
    ) -> Result<Self> {
        qparams.check_zero_point(dtype)?;
        let (min, max) = (dtype.min_value(), dtype.max_value());
        let codes = values
            .iter()
            .map(|&v| quantize_value(v, qparams.scale(), qparams.zero_point(), min, max))
            .collect();
        Self::new(QuantizedBuffer::from_codes(codes, dtype), shape, qparams)
    }

    /// Real values `(code - zero_point) * scale`, row-major.
    pub fn dequantize(&self) -> Vec<f64> {
        let (scale, zp) = (self.qparams.scale(), self.qparams.zero_point());
        self.buffer
            .to_i64_vec()
            .into_iter()
            .map(|q| dequantize_value(q, scale, zp))
            .collect()
    }

    pub fn dtype(&self) -> QDType {
        self.buffer.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Rows of a 2-D matrix.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not 2-dimensional.
    pub fn rows(&self) -> usize {
        assert_eq!(self.rank(), 2, "rows() on a rank-{} tensor", self.rank());
        self.shape[0]
    }

    /// Columns of a 2-D matrix.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not 2-dimensional.
    pub fn cols(&self) -> usize {
        assert_eq!(self.rank(), 2, "cols() on a rank-{} tensor", self.rank());
        self.shape[1]
    }

    pub fn qparams(&self) -> &QuantizationDescriptor {
        &self.qparams
    }

    pub fn scale(&self) -> f64 {
        self.qparams.scale()
    }

    pub fn zero_point(&self) -> i64 {
        self.qparams.zero_point()
    }

    pub fn scheme(&self) -> QScheme {
        self.qparams.scheme()
    }

    pub fn buffer(&self) -> &QuantizedBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> QuantizedBuffer {
        self.buffer
    }

    pub fn as_i8(&self) -> Option<&[i8]> {
        match &self.buffer {
            QuantizedBuffer::I8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.buffer {
            QuantizedBuffer::U8(v) => Some(v),
            _ => None,
        }
    }
}
