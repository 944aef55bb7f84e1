//! Operand checks run before any arithmetic.

use crate::error::{QMatmulError, Result};
use crate::quant::QuantizedMatrix;

/// Problem dimensions: A is m×k, B is k×n, C is m×n.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulDims {
    pub m: usize,
    pub k: usize,
    pub n: usize,
}

impl MatmulDims {
    /// Multiply-adds times two, the usual op count for a GEMM.
    pub fn ops(&self) -> u64 {
        2 * (self.m as u64) * (self.k as u64) * (self.n as u64)
    }
}

/// Check that `a` and `b` can be multiplied and return the problem size.
///
/// Rules, in order: 8-bit element types, same element type, per-tensor
/// scheme, same scheme, both 2-D, `a.cols == b.rows`.
pub fn check_inputs(a: &QuantizedMatrix, b: &QuantizedMatrix) -> Result<MatmulDims> {
    let (a_dtype, b_dtype) = (a.dtype(), b.dtype());
    if !a_dtype.is_byte() || !b_dtype.is_byte() {
        return Err(QMatmulError::InvalidDataType {
            a: a_dtype,
            b: b_dtype,
            reason: "operands must be QInt8 or QUInt8",
        });
    }
    if a_dtype != b_dtype {
        return Err(QMatmulError::InvalidDataType {
            a: a_dtype,
            b: b_dtype,
            reason: "operands must have the same data type",
        });
    }

    if !a.scheme().is_per_tensor() {
        return Err(QMatmulError::UnsupportedScheme(a.scheme()));
    }
    if a.scheme() != b.scheme() {
        return Err(QMatmulError::SchemeMismatch {
            a: a.scheme(),
            b: b.scheme(),
        });
    }

    // both operands must be exactly 2-D
    let (&[m, k], &[b_k, n]) = (a.shape(), b.shape()) else {
        return Err(QMatmulError::DimensionMismatch {
            a: a.rank(),
            b: b.rank(),
        });
    };
    if k != b_k {
        return Err(QMatmulError::ShapeMismatch {
            a_cols: k,
            b_rows: b_k,
        });
    }

    Ok(MatmulDims { m, k, n })
}
