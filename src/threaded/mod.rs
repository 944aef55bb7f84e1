//! Multi-threaded integer GEMM.
//!
//! Wraps the blocked GEMM with parallel execution across row bands on a
//! per-call rayon pool. Thread count adapts to matrix size - small matrices
//! stay on the calling thread.
//!
//! Available implementations:
//! - `gemm_4x4_mt`: Multi-threaded 4×4 integer GEMM

pub mod gemm_4x4_mt;
