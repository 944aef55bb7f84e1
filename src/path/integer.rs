//! Integer-only accumulate-and-requantize path.

use log::debug;

use super::{GemmProblem, MatmulPath};
use crate::config::KernelConfig;
use crate::error::Result;
use crate::matrix::transpose::transpose;
use crate::quant::QuantElement;
use crate::requant::FixedPointMultiplier;
use crate::threaded::gemm_4x4_mt::gemm_i32_4x4_mt;
use crate::validate::MatmulDims;

/// Integer GEMM with fixed-point requantization.
///
/// Raw code products are accumulated in i32 straight from the input
/// buffers. The zero points are folded in afterwards:
///
/// ```text
/// Σ (a - za)(b - zb) = Σ ab - zb·Σa - za·Σb + k·za·zb
/// ```
///
/// using row sums of A and column sums of B, then every cell is rescaled
/// by the fixed-point multiplier for `(scale_a * scale_b) / scale_out`.
#[derive(Debug, Clone, Default)]
pub struct IntegerGemm {
    config: KernelConfig,
}

impl IntegerGemm {
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

impl MatmulPath for IntegerGemm {
    const NAME: &'static str = "int-gemm";

    fn compute<T: QuantElement>(&self, problem: &GemmProblem<'_, T>) -> Result<Vec<T>> {
        let MatmulDims { m, k, n } = problem.dims;
        let multiplier = FixedPointMultiplier::derive(problem.rescale())?;
        debug!(
            "int-gemm requantize: mantissa={} exponent={}",
            multiplier.mantissa(),
            multiplier.exponent()
        );

        // Transpose B once so both operands are read along k
        let bt = transpose(problem.b, k, n);

        let mut acc = vec![0i32; m * n];
        gemm_i32_4x4_mt(problem.a, &bt, &mut acc, m, n, k, &self.config)?;

        // Zero points are range-checked against 8-bit types, so they fit in i32
        let za = problem.a_qparams.zero_point() as i32;
        let zb = problem.b_qparams.zero_point() as i32;
        let row_sums_a = line_sums(problem.a, m, k);
        let col_sums_b = line_sums(&bt, n, k);
        // Wrapping keeps the corrected sum exact whenever it fits in i32
        let kzz = (k as i32).wrapping_mul(za).wrapping_mul(zb);

        let out_zp = problem.out_qparams.zero_point();
        let mut out = Vec::with_capacity(m * n);
        for (acc_row, &row_sum) in acc.chunks(n.max(1)).zip(&row_sums_a) {
            for (&raw, &col_sum) in acc_row.iter().zip(&col_sums_b) {
                let corrected = raw
                    .wrapping_sub(zb.wrapping_mul(row_sum))
                    .wrapping_sub(za.wrapping_mul(col_sum))
                    .wrapping_add(kzz);
                out.push(T::saturate(multiplier.apply(corrected) as i64 + out_zp));
            }
        }
        Ok(out)
    }
}

// Sum of each of the `lines` rows of a `lines × len` row-major matrix
fn line_sums<T: QuantElement>(data: &[T], lines: usize, len: usize) -> Vec<i32> {
    (0..lines)
        .map(|i| {
            data[i * len..(i + 1) * len]
                .iter()
                .fold(0i32, |s, &q| s.wrapping_add(q.widen()))
        })
        .collect()
}
