//! Dequantize → f64 matmul → requantize.

use super::{GemmProblem, MatmulPath};
use crate::error::Result;
use crate::matrix::naive_ikj::matmul_ikj;
use crate::quant::affine::{dequantize_value, quantize_value};
use crate::quant::{QuantElement, QuantizationDescriptor};
use crate::validate::MatmulDims;

/// Reference path: always compiled, used as the correctness oracle for the
/// integer kernel. It cannot fail once the inputs are validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DequantizeFallback;

impl MatmulPath for DequantizeFallback {
    const NAME: &'static str = "dequantize-fallback";

    fn compute<T: QuantElement>(&self, problem: &GemmProblem<'_, T>) -> Result<Vec<T>> {
        let MatmulDims { m, k, n } = problem.dims;
        let ra = dequantize(problem.a, &problem.a_qparams);
        let rb = dequantize(problem.b, &problem.b_qparams);

        let mut rc = vec![0.0f64; m * n];
        matmul_ikj(&ra, &rb, &mut rc, m, n, k);

        let out = problem.out_qparams;
        let (min, max) = (T::MIN as i64, T::MAX as i64);
        Ok(rc
            .into_iter()
            .map(|v| T::saturate(quantize_value(v, out.scale(), out.zero_point(), min, max)))
            .collect())
    }
}

fn dequantize<T: QuantElement>(codes: &[T], qparams: &QuantizationDescriptor) -> Vec<f64> {
    codes
        .iter()
        .map(|&q| dequantize_value(q.widen() as i64, qparams.scale(), qparams.zero_point()))
        .collect()
}
