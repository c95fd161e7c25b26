//! Arithmetic helpers for the engine.
//!
//! - [`CheckedArithmetic`]: `Result`-returning checked ops on domain newtypes.
//! - [`mul_div`], [`sqrt_product`], [`narrow`]: 256/512-bit intermediates
//!   for products that do not fit in `u128`.
//! - [`encode`], [`uqdiv`], [`fraction`], [`mul_decode`]: UQ112x112
//!   fixed-point used by the cumulative price accumulators.

mod checked;
mod uq112x112;
mod wide;

pub use checked::CheckedArithmetic;
pub use uq112x112::{encode, fraction, mul_decode, q112, uqdiv, RESOLUTION};
pub use wide::{full_mul, mul_div, narrow, narrow_wide, sqrt_product};

/// Wide unsigned integers used by accumulators and invariant checks.
pub use primitive_types::{U256, U512};
