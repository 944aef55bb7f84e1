//! 4×4 integer microkernel for matrix multiplication.

/// Computes a 4×4 tile: C[0:4, 0:4] += A_packed × B_packed
///
/// This is the inner kernel called by the blocked GEMM. It keeps the 16
/// accumulators in a local array (the compiler keeps them in registers and
/// vectorizes the column loop), reads 4 A values and 4 B values per step of
/// k, and adds the finished tile into C.
///
/// Products of two 8-bit codes always fit in i32; the sums wrap, which the
/// zero-point correction in the caller relies on.
///
/// # Arguments
///
/// * `a_pack` - `k * 4` values, the 4 rows of A interleaved per k
/// * `b_pack` - `k * 4` values, the 4 columns of B interleaved per k
/// * `c` - Accumulator matrix, tile starts at `offset`, row stride `ldc`
#[inline]
pub fn kernel_4x4_i32(a_pack: &[i32], b_pack: &[i32], c: &mut [i32], offset: usize, ldc: usize) {
    let mut tile = [[0i32; 4]; 4];

    // Main loop: for each k, broadcast each A value across the 4 B values
    for (a, b) in a_pack.chunks_exact(4).zip(b_pack.chunks_exact(4)) {
        for (row, &a_val) in tile.iter_mut().zip(a) {
            for (acc, &b_val) in row.iter_mut().zip(b) {
                *acc = acc.wrapping_add(a_val * b_val);
            }
        }
    }

    // Add the tile into C (we accumulate, not overwrite)
    for (r, row) in tile.iter().enumerate() {
        let start = offset + r * ldc;
        for (dst, &v) in c[start..start + 4].iter_mut().zip(row) {
            *dst = dst.wrapping_add(v);
        }
    }
}
