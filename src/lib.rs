//! Quantized 8-bit matrix multiplication, built from scratch.
//!
//! Multiplies two per-tensor quantized matrices (`i8` × `i8` or `u8` × `u8`)
//! and returns a quantized result in a caller-chosen output domain. With the
//! default `int-gemm` feature the whole computation is integer-only: codes
//! are accumulated in i32 and rescaled by a fixed-point multiplier. Without
//! it, the operands are dequantized, multiplied in f64 and requantized.
//!
//! ## Usage
//!
//! ```
//! use qmatmul::{quantized_matmul, QuantizationDescriptor, QuantizedMatrix};
//!
//! let a = QuantizedMatrix::new(
//!     vec![1i8, 2, 3, 4, 5, 6],
//!     &[2, 3],
//!     QuantizationDescriptor::affine(0.5, 0)?,
//! )?;
//! let b = QuantizedMatrix::new(
//!     vec![1i8, 0, 0, 1, 1, 1],
//!     &[3, 2],
//!     QuantizationDescriptor::affine(0.25, 0)?,
//! )?;
//!
//! let c = quantized_matmul(&a, &b, 0.125, 0)?;
//! assert_eq!(c.shape(), &[2, 2]);
//! assert_eq!(c.as_i8(), Some(&[4i8, 5, 10, 11][..]));
//! # Ok::<(), qmatmul::QMatmulError>(())
//! ```
//!
//! ## Rounding
//!
//! Every rounding step rounds half away from zero: the multiplier mantissa,
//! the fixed-point rescale and the fallback's requantize. Both paths
//! therefore agree exactly on ties; elsewhere they agree to within one
//! quantization step.
//!
//! ## What's inside
//!
//! - Input validation with one error per broken rule
//! - Fixed-point multiplier derivation (frexp + 31-bit mantissa)
//! - 4×4 integer microkernel with k-blocking and panel packing
//! - Row-band parallelism on a per-call thread pool
//! - Dequantize fallback, always compiled, used as the correctness oracle

pub mod config;
pub mod error;
pub mod matrix;
pub mod path;
pub mod quant;
pub mod requant;
pub mod validate;

#[cfg(feature = "int-gemm")]
pub mod blocked;
#[cfg(feature = "int-gemm")]
pub mod kernels;
#[cfg(feature = "int-gemm")]
pub mod threaded;

use log::debug;

pub use config::KernelConfig;
pub use error::{QMatmulError, Result};
pub use path::{DefaultPath, DequantizeFallback, GemmProblem, MatmulPath};
#[cfg(feature = "int-gemm")]
pub use path::IntegerGemm;
pub use quant::{QDType, QScheme, QuantElement, QuantizationDescriptor, QuantizedBuffer, QuantizedMatrix};
pub use requant::{derive_multiplier, FixedPointMultiplier};
pub use validate::{check_inputs, MatmulDims};

/// Quantized matrix multiply: C = A × B in the `(output_scale,
/// output_zero_point)` domain.
///
/// Runs [`DefaultPath`], fixed at build time by the `int-gemm` feature.
/// Kernel tuning is read from the environment (see
/// [`KernelConfig::from_env`]).
///
/// # Errors
///
/// Fails before any arithmetic if the operands don't pass
/// [`check_inputs`], if `output_scale` is not positive and finite, or if
/// `output_zero_point` does not fit the operands' element type. The integer
/// path additionally fails with `OverflowError` on an unrepresentable
/// rescale.
pub fn quantized_matmul(
    a: &QuantizedMatrix,
    b: &QuantizedMatrix,
    output_scale: f64,
    output_zero_point: i64,
) -> Result<QuantizedMatrix> {
    quantized_matmul_with(&default_path(), a, b, output_scale, output_zero_point)
}

/// Same as [`quantized_matmul`] with an explicitly chosen path.
pub fn quantized_matmul_with<P: MatmulPath>(
    path: &P,
    a: &QuantizedMatrix,
    b: &QuantizedMatrix,
    output_scale: f64,
    output_zero_point: i64,
) -> Result<QuantizedMatrix> {
    let dims = check_inputs(a, b)?;
    let out_qparams = QuantizationDescriptor::affine(output_scale, output_zero_point)?;
    out_qparams.check_zero_point(a.dtype())?;

    debug!(
        "quantized_matmul [{}x{}] x [{}x{}] {} via {}",
        dims.m,
        dims.k,
        dims.k,
        dims.n,
        a.dtype(),
        P::NAME
    );

    match (a.buffer(), b.buffer()) {
        (QuantizedBuffer::I8(_), QuantizedBuffer::I8(_)) => {
            run_typed::<i8, P>(path, a, b, dims, out_qparams)
        }
        (QuantizedBuffer::U8(_), QuantizedBuffer::U8(_)) => {
            run_typed::<u8, P>(path, a, b, dims, out_qparams)
        }
        _ => Err(QMatmulError::InvalidDataType {
            a: a.dtype(),
            b: b.dtype(),
            reason: "operands must have the same data type",
        }),
    }
}

fn run_typed<T: QuantElement, P: MatmulPath>(
    path: &P,
    a: &QuantizedMatrix,
    b: &QuantizedMatrix,
    dims: MatmulDims,
    out_qparams: QuantizationDescriptor,
) -> Result<QuantizedMatrix> {
    let mismatch = || QMatmulError::InvalidDataType {
        a: a.dtype(),
        b: b.dtype(),
        reason: "operand buffer does not match the dispatched type",
    };
    let problem = GemmProblem {
        a: T::view(a.buffer()).ok_or_else(mismatch)?,
        b: T::view(b.buffer()).ok_or_else(mismatch)?,
        dims,
        a_qparams: *a.qparams(),
        b_qparams: *b.qparams(),
        out_qparams,
    };

    // The output only exists once the path has finished successfully
    let codes = path.compute(&problem)?;
    QuantizedMatrix::new(T::into_buffer(codes), &[dims.m, dims.n], out_qparams)
}

#[cfg(feature = "int-gemm")]
fn default_path() -> DefaultPath {
    IntegerGemm::new(KernelConfig::from_env())
}

#[cfg(not(feature = "int-gemm"))]
fn default_path() -> DefaultPath {
    DequantizeFallback
}
