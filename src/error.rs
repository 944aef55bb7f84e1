//! Error type shared by validation, multiplier derivation and the kernels.

use thiserror::Error;

use crate::quant::{QDType, QScheme};

/// Everything that can go wrong in a quantized matmul call.
///
/// All validation variants are raised before any arithmetic starts, so an
/// error never comes with a partially written output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QMatmulError {
    /// Operand element type is not 8-bit, or the two operands disagree
    #[error("MatMul operands should use the same 8-bit data type: {reason} (a = {a}, b = {b})")]
    InvalidDataType {
        /// Element type of the left operand
        a: QDType,
        /// Element type of the right operand
        b: QDType,
        /// Which rule was broken
        reason: &'static str,
    },

    /// Scheme is not per-tensor
    #[error("only per-tensor quantization is supported in MatMul, got {0}")]
    UnsupportedScheme(QScheme),

    /// Operands carry different schemes
    #[error("both inputs to MatMul must have the same quantization scheme (a = {a}, b = {b})")]
    SchemeMismatch {
        /// Scheme of the left operand
        a: QScheme,
        /// Scheme of the right operand
        b: QScheme,
    },

    /// An operand is not 2-dimensional
    #[error("MatMul operands must both be 2-dimensional ({a} and {b} dimensions provided)")]
    DimensionMismatch {
        /// Rank of the left operand
        a: usize,
        /// Rank of the right operand
        b: usize,
    },

    /// Inner dimensions disagree
    #[error("size of a ({a_cols}) at dimension 1 must match size of b ({b_rows}) at dimension 0")]
    ShapeMismatch {
        /// Columns of the left operand
        a_cols: usize,
        /// Rows of the right operand
        b_rows: usize,
    },

    /// Rescale ratio handed to multiplier derivation is not a positive finite number
    #[error("quantization scale ratio ({0}) must be positive and finite")]
    DomainError(f64),

    /// Derived mantissa does not fit in an i32
    #[error("fixed-point mantissa {mantissa} does not fit in 32 bits")]
    OverflowError {
        /// The offending mantissa
        mantissa: i64,
    },

    /// Scale of a descriptor is not a positive finite number
    #[error("quantization scale ({0}) must be positive and finite")]
    InvalidScale(f64),

    /// Zero point cannot be stored in the element type
    #[error("zero point {zero_point} is out of range [{min}, {max}] for {dtype}")]
    ZeroPointOutOfRange {
        /// The offending zero point
        zero_point: i64,
        /// Element type it was checked against
        dtype: QDType,
        /// Smallest representable value
        min: i64,
        /// Largest representable value
        max: i64,
    },

    /// Buffer length does not match the shape
    #[error("buffer holds {actual} elements but shape {shape:?} needs {expected}")]
    BufferLength {
        /// Requested shape
        shape: Vec<usize>,
        /// Elements the shape needs
        expected: usize,
        /// Elements the buffer has
        actual: usize,
    },

    /// Per-call kernel context (thread pool) could not be built
    #[error("failed to build kernel context: {0}")]
    KernelContext(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, QMatmulError>;
