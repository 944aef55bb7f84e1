//! 4×4 blocked integer GEMM.

use crate::kernels::kernel_4x4::kernel_4x4_i32;
use crate::quant::QuantElement;

/// L1 blocking along k: a packed 4×KC panel of A and of B stays in cache.
const KC: usize = 256;

/// Cache-blocked integer matrix multiplication: ACC += A × B
///
/// Breaks the computation into k-blocks, packs (and widens) A and B for
/// sequential access, and calls the 4×4 microkernel for each tile. Rows and
/// columns that don't fill a 4×4 tile go through scalar code.
///
/// No zero points are applied here; the raw code products are summed with
/// wrapping i32 arithmetic.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `bt` - Transposed matrix B^T (n × k), row-major
/// * `acc` - Accumulators (m × n), row-major, accumulated into
pub fn gemm_i32_blocked_4x4<T: QuantElement>(
    a: &[T],
    bt: &[T],
    acc: &mut [i32],
    m: usize,
    n: usize,
    k: usize,
) {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(bt.len(), n * k, "B^T: expected {}x{}={} elements", n, k, n * k);
    assert_eq!(acc.len(), m * n, "ACC: expected {}x{}={} elements", m, n, m * n);
    if m == 0 || n == 0 || k == 0 {
        return;
    }

    // Only complete 4×4 tiles go through the kernel
    let m_main = (m / 4) * 4;
    let n_main = (n / 4) * 4;
    let kc = k.min(KC);

    let mut a_pack = vec![0i32; 4 * kc];
    // Every 4-column panel of B for one k-block, packed once and reused by all rows
    let mut b_panels = vec![0i32; n_main * kc];

    for kk in (0..k).step_by(kc) {
        let k_block = (kk + kc).min(k) - kk;

        for j in (0..n_main).step_by(4) {
            let panel = &mut b_panels[j * k_block..(j + 4) * k_block];
            pack_b_panel(bt, panel, j, kk, k_block, k);
        }

        for i in (0..m_main).step_by(4) {
            let a_panel = &mut a_pack[..4 * k_block];
            pack_a_panel(a, a_panel, i, kk, k_block, k);

            for j in (0..n_main).step_by(4) {
                let b_panel = &b_panels[j * k_block..(j + 4) * k_block];
                kernel_4x4_i32(a_panel, b_panel, acc, i * n + j, n);
            }
        }
    }

    // Leftover rows (all columns), then leftover columns of the tiled rows
    if m_main < m {
        edge_case(a, bt, acc, m_main..m, 0..n, n, k);
    }
    if n_main < n {
        edge_case(a, bt, acc, 0..m_main, n_main..n, n, k);
    }
}

// Pack 4 rows of A for one k-block, interleaved: the 4 row values for each
// k position sit next to each other
fn pack_a_panel<T: QuantElement>(
    a: &[T],
    a_panel: &mut [i32],
    i_start: usize,
    k_start: usize,
    k_block: usize,
    k_total: usize,
) {
    for p in 0..k_block {
        for r in 0..4 {
            a_panel[p * 4 + r] = a[(i_start + r) * k_total + k_start + p].widen();
        }
    }
}

// Pack 4 columns of B (rows of B^T) for one k-block, interleaved the same way
fn pack_b_panel<T: QuantElement>(
    bt: &[T],
    b_panel: &mut [i32],
    j_start: usize,
    k_start: usize,
    k_block: usize,
    k_total: usize,
) {
    for p in 0..k_block {
        for c in 0..4 {
            b_panel[p * 4 + c] = bt[(j_start + c) * k_total + k_start + p].widen();
        }
    }
}

// Scalar dot products for cells outside the 4×4 tiles
fn edge_case<T: QuantElement>(
    a: &[T],
    bt: &[T],
    acc: &mut [i32],
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
    n: usize,
    k: usize,
) {
    for i in rows {
        let a_row = &a[i * k..(i + 1) * k];
        for j in cols.clone() {
            let b_col = &bt[j * k..(j + 1) * k];
            let dot = a_row
                .iter()
                .zip(b_col)
                .fold(0i32, |s, (&x, &y)| s.wrapping_add(x.widen() * y.widen()));
            acc[i * n + j] = acc[i * n + j].wrapping_add(dot);
        }
    }
}
