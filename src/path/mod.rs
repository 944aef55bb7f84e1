//! The two ways to compute a validated quantized matmul.
//!
//! A path is picked when the operator is composed, never per element:
//! [`crate::quantized_matmul`] always runs [`DefaultPath`], and
//! [`crate::quantized_matmul_with`] takes any [`MatmulPath`] by generic
//! parameter.

pub mod fallback;
#[cfg(feature = "int-gemm")]
pub mod integer;

pub use fallback::DequantizeFallback;
#[cfg(feature = "int-gemm")]
pub use integer::IntegerGemm;

use crate::error::Result;
use crate::quant::{QuantElement, QuantizationDescriptor};
use crate::validate::MatmulDims;

/// Path the operator uses in this build: the integer kernel when the
/// `int-gemm` feature is enabled, the dequantize fallback otherwise.
#[cfg(feature = "int-gemm")]
pub type DefaultPath = IntegerGemm;
/// Path the operator uses in this build: the integer kernel when the
/// `int-gemm` feature is enabled, the dequantize fallback otherwise.
#[cfg(not(feature = "int-gemm"))]
pub type DefaultPath = DequantizeFallback;

/// Typed, already-validated operands plus all quantization parameters.
#[derive(Debug, Clone, Copy)]
pub struct GemmProblem<'a, T> {
    /// A codes (m × k), row-major
    pub a: &'a [T],
    /// B codes (k × n), row-major
    pub b: &'a [T],
    pub dims: MatmulDims,
    pub a_qparams: QuantizationDescriptor,
    pub b_qparams: QuantizationDescriptor,
    pub out_qparams: QuantizationDescriptor,
}

impl<T> GemmProblem<'_, T> {
    /// `(scale_a * scale_b) / scale_out`
    pub fn rescale(&self) -> f64 {
        self.a_qparams.scale() * self.b_qparams.scale() / self.out_qparams.scale()
    }
}

/// Strategy for turning a [`GemmProblem`] into output codes.
pub trait MatmulPath {
    /// Short name for logs and benchmark output.
    const NAME: &'static str;

    /// Output codes (m × n), row-major, in `out_qparams`' domain.
    fn compute<T: QuantElement>(&self, problem: &GemmProblem<'_, T>) -> Result<Vec<T>>;
}
