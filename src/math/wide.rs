//! Wide-integer helpers for products that do not fit in 128 bits.
//!
//! Every product of two `u128` values is carried out in [`U256`] and every
//! product of two 256-bit values in [`U512`], then narrowed back with an
//! explicit check.  Nothing here relies on native wrapping.

use primitive_types::{U256, U512};

use crate::domain::Rounding;
use crate::error::AmmError;

/// Computes `a × b / denominator` with a 256-bit intermediate.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Rounding;
/// use cp_amm::math::mul_div;
///
/// // u128::MAX * 4 overflows u128, the quotient does not.
/// assert_eq!(mul_div(u128::MAX, 4, 8, Rounding::Down), Ok(u128::MAX / 2));
/// assert_eq!(mul_div(10, 1, 3, Rounding::Up), Ok(4));
/// ```
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128, AmmError> {
    if denominator == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let d = U256::from(denominator);
    let mut quotient = product / d;
    if rounding.is_up() && !(product % d).is_zero() {
        quotient += U256::one();
    }
    narrow(quotient, "mul_div result exceeds 128 bits")
}

/// Floor of `√(a × b)`, exact for every pair of `u128` inputs.
///
/// # Examples
///
/// ```
/// use cp_amm::math::sqrt_product;
///
/// assert_eq!(sqrt_product(100_000, 50_000), 70_710);
/// assert_eq!(sqrt_product(u128::MAX, u128::MAX), u128::MAX);
/// ```
#[must_use]
pub fn sqrt_product(a: u128, b: u128) -> u128 {
    let root = isqrt(U256::from(a) * U256::from(b));
    // √((2^128 - 1)^2) < 2^128, so the low word holds the whole root.
    root.low_u128()
}

/// Integer square root via Newton's method.
pub(crate) fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return n;
    }
    let mut x = n;
    let mut y = (n >> 1u32) + (n & U256::one());
    while y < x {
        x = y;
        y = (x + n / x) >> 1u32;
    }
    x
}

/// Full 512-bit product of two 256-bit values.
#[must_use]
pub fn full_mul(a: U256, b: U256) -> U512 {
    a.full_mul(b)
}

/// Narrows a 256-bit value to `u128`, failing with `context` on overflow.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `value` needs more than 128 bits.
pub fn narrow(value: U256, context: &'static str) -> Result<u128, AmmError> {
    if value.bits() > 128 {
        return Err(AmmError::Overflow(context));
    }
    Ok(value.low_u128())
}

/// Narrows a 512-bit value to `u128`, failing with `context` on overflow.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `value` needs more than 128 bits.
pub fn narrow_wide(value: U512, context: &'static str) -> Result<u128, AmmError> {
    if value.bits() > 128 {
        return Err(AmmError::Overflow(context));
    }
    Ok(value.low_u128())
}
