//! Cache-blocked integer GEMM.
//!
//! Breaks the multiplication into k-blocks that fit in L1, packs the 8-bit
//! codes into widened panels for sequential access, then calls the
//! microkernels for the inner computation.
//!
//! Available implementations:
//! - `gemm_4x4`: Uses the 4×4 i32 kernel

pub mod gemm_4x4;
