//! Quantized data model.
//!
//! A [`QuantizedMatrix`] is a code buffer plus a shape plus a
//! [`QuantizationDescriptor`]. The kernels only ever see typed slices of
//! [`QuantElement`] codes.

pub mod affine;
pub mod descriptor;
pub mod element;
pub mod matrix;

pub use descriptor::{QDType, QScheme, QuantizationDescriptor};
pub use element::QuantElement;
pub use matrix::{QuantizedBuffer, QuantizedMatrix};
