//! UQ112x112 unsigned fixed-point numbers.
//!
//! A UQ112x112 value has 112 integer bits and 112 fractional bits.  The
//! ratio of two 112-bit reserves always fits, and multiplying that ratio by
//! a 32-bit elapsed time still fits in 256 bits, which is what makes the
//! cumulative price accumulators overflow-free per update.

use primitive_types::{U256, U512};

use super::wide::narrow_wide;
use crate::domain::{Amount, Reserve};
use crate::error::AmmError;

/// Number of fractional bits.
pub const RESOLUTION: u32 = 112;

/// `1.0` in UQ112x112.
#[must_use]
pub fn q112() -> U256 {
    U256::one() << RESOLUTION
}

/// Encodes a reserve as a UQ112x112 value (`reserve << 112`).
#[must_use]
pub fn encode(reserve: Reserve) -> U256 {
    U256::from(reserve.get()) << RESOLUTION
}

/// Divides a UQ112x112 value by a reserve, yielding UQ112x112.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `divisor` is empty.
pub fn uqdiv(value: U256, divisor: Reserve) -> Result<U256, AmmError> {
    if divisor.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    Ok(value / U256::from(divisor.get()))
}

/// The price `numerator / denominator` as UQ112x112.
///
/// # Errors
///
/// Returns [`AmmError::DivisionByZero`] if `denominator` is empty.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::{Amount, Reserve};
/// use cp_amm::math::{fraction, q112, U256};
///
/// let two = Reserve::try_from(Amount::new(2)).expect("fits");
/// let one = Reserve::try_from(Amount::new(1)).expect("fits");
/// assert_eq!(fraction(two, one), Ok(q112() * U256::from(2u8)));
/// ```
pub fn fraction(numerator: Reserve, denominator: Reserve) -> Result<U256, AmmError> {
    uqdiv(encode(numerator), denominator)
}

/// Multiplies a UQ112x112 price by an amount and drops the fraction.
///
/// Computed in 512 bits: a price can be close to `2^224` and an amount up
/// to `2^128`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the integer result exceeds `u128`.
pub fn mul_decode(price: U256, amount: Amount) -> Result<Amount, AmmError> {
    let product: U512 = price.full_mul(U256::from(amount.get()));
    let decoded = product >> RESOLUTION;
    narrow_wide(decoded, "fixed-point product exceeds 128 bits").map(Amount::new)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn reserve(v: u128) -> Reserve {
        let Ok(r) = Reserve::try_from(Amount::new(v)) else {
            panic!("reserve must fit");
        };
        r
    }

    #[test]
    fn encode_is_shift() {
        assert_eq!(encode(reserve(3)), q112() * U256::from(3u8));
    }

    #[test]
    fn fraction_of_equal_reserves_is_one() {
        assert_eq!(fraction(reserve(1_000), reserve(1_000)), Ok(q112()));
    }

    #[test]
    fn fraction_by_empty_reserve() {
        assert_eq!(
            fraction(reserve(1), Reserve::ZERO),
            Err(AmmError::DivisionByZero)
        );
    }

    #[test]
    fn largest_ratio_fits() {
        let Ok(p) = fraction(Reserve::MAX, reserve(1)) else {
            panic!("expected Ok");
        };
        assert!(p.bits() <= 224);
    }

    #[test]
    fn mul_decode_round_trip() {
        let Ok(half) = fraction(reserve(1), reserve(2)) else {
            panic!("expected Ok");
        };
        assert_eq!(mul_decode(half, Amount::new(1_001)), Ok(Amount::new(500)));
        assert_eq!(mul_decode(q112(), Amount::MAX), Ok(Amount::MAX));
    }

    #[test]
    fn mul_decode_overflow() {
        let Err(AmmError::Overflow(_)) = mul_decode(q112() * U256::from(2u8), Amount::MAX) else {
            panic!("expected Overflow");
        };
    }
}
