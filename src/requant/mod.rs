//! Requantization: fixed-point multiplier derivation and the integer rescale
//! it drives.

pub mod fixed_point;
pub mod multiplier;

pub use multiplier::{derive_multiplier, FixedPointMultiplier};
