/// Transpose a matrix: dst = src^T
///
/// Converts from row-major (rows × cols) to row-major (cols × rows).
/// After transpose, what was column j of src becomes row j of dst.
///
/// # Example
///
/// ```
/// use qmatmul::matrix::transpose::transpose;
///
/// let src: Vec<i8> = vec![1, 2, 3,   // 2×3 matrix
///                         4, 5, 6];
///
/// assert_eq!(transpose(&src, 2, 3), vec![1, 4,   // 3×2 matrix
///                                        2, 5,
///                                        3, 6]);
/// ```
pub fn transpose<T: Copy>(src: &[T], rows: usize, cols: usize) -> Vec<T> {
    assert_eq!(src.len(), rows * cols, "src: expected {}x{}={} elements", rows, cols, rows * cols);
    let mut dst = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        dst.extend((0..rows).map(|i| src[i * cols + j]));
    }
    dst
}
