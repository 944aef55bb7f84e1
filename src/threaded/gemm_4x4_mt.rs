//! Multi-threaded 4×4 blocked integer GEMM.

use log::debug;
use rayon::prelude::*;

use crate::blocked::gemm_4x4::gemm_i32_blocked_4x4;
use crate::config::KernelConfig;
use crate::error::{QMatmulError, Result};
use crate::quant::QuantElement;

/// Multi-threaded integer matrix multiplication using the 4×4 kernel.
///
/// Splits A and ACC into bands of whole rows (a multiple of 4, so bands
/// tile cleanly) and runs the blocked GEMM on each band. Thread count comes
/// from [`KernelConfig::choose_thread_count`].
///
/// The thread pool is built for this call only and dropped before
/// returning. If it cannot be built the call fails and `acc` is left
/// untouched.
pub fn gemm_i32_4x4_mt<T: QuantElement>(
    a: &[T],
    bt: &[T],
    acc: &mut [i32],
    m: usize,
    n: usize,
    k: usize,
    config: &KernelConfig,
) -> Result<()> {
    let effective_threads = config.choose_thread_count(m, n, k);

    if effective_threads == 1 || n == 0 || k == 0 {
        gemm_i32_blocked_4x4(a, bt, acc, m, n, k);
        return Ok(());
    }

    let rows_per_band = m.div_ceil(effective_threads).next_multiple_of(4);
    debug!(
        "int gemm {m}x{k}x{n}: {effective_threads} threads, {rows_per_band} rows per band"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_threads)
        .build()
        .map_err(|e| QMatmulError::KernelContext(e.to_string()))?;

    pool.install(|| {
        acc.par_chunks_mut(rows_per_band * n)
            .zip(a.par_chunks(rows_per_band * k))
            .for_each(|(acc_band, a_band)| {
                let rows = acc_band.len() / n;
                gemm_i32_blocked_4x4(a_band, bt, acc_band, rows, n, k);
            });
    });

    Ok(())
}
