//! Basic matrix operations.
//!
//! Layout helpers for the integer kernel and the plain i-k-j product the
//! dequantize fallback runs on real values.

pub mod naive_ikj;
pub mod transpose;
