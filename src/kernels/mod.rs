//! Microkernels for the inner loop of the integer matrix multiplication.
//!
//! These kernels compute small tiles of C += A × B on i32 accumulators.
//! They're called by the blocked GEMM after packing the 8-bit inputs into
//! widened, cache-friendly panels.
//!
//! Available kernels:
//! - `kernel_4x4`: 4×4 tile, portable scalar code the compiler vectorizes

pub mod kernel_4x4;
