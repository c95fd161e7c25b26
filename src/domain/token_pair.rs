//! Canonically ordered pair of distinct assets.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::AmmError;

/// An unordered asset set stored in canonical order.
///
/// Construction sorts the two assets so that `first() < second()` under
/// [`Address`] ordering.  `(X, Y)` and `(Y, X)` therefore build equal
/// values, which is what lets the registry resolve both orders to the same
/// pair instance.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::{Address, TokenPair};
///
/// let x = Address::repeat_byte(1);
/// let y = Address::repeat_byte(2);
///
/// let pair = TokenPair::new(y, x).expect("distinct assets");
/// assert_eq!(pair.first(), x);
/// assert_eq!(pair, TokenPair::new(x, y).expect("distinct assets"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    asset_a: Address,
    asset_b: Address,
}

impl TokenPair {
    /// Creates a canonically ordered pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if both ids are equal.
    /// - [`AmmError::ZeroAddress`] if either id is the null identifier.
    pub fn new(x: Address, y: Address) -> Result<Self, AmmError> {
        let (asset_a, asset_b) = Self::sort(x, y)?;
        Ok(Self { asset_a, asset_b })
    }

    /// Sorts two asset ids into canonical order without building a pair.
    ///
    /// # Errors
    ///
    /// Same as [`TokenPair::new`].
    pub fn sort(x: Address, y: Address) -> Result<(Address, Address), AmmError> {
        if x == y {
            return Err(AmmError::IdenticalAssets);
        }
        let (lo, hi) = if x < y { (x, y) } else { (y, x) };
        // Only the lower id can be null once the two are ordered.
        if lo.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        Ok((lo, hi))
    }

    /// Returns the lower asset id.
    #[must_use]
    pub const fn first(&self) -> Address {
        self.asset_a
    }

    /// Returns the higher asset id.
    #[must_use]
    pub const fn second(&self) -> Address {
        self.asset_b
    }

    /// Returns `true` if `asset` is one of the two members.
    #[must_use]
    pub fn contains(&self, asset: &Address) -> bool {
        self.asset_a == *asset || self.asset_b == *asset
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn both_orders_build_the_same_pair() {
        let Ok(p1) = TokenPair::new(addr(1), addr(2)) else {
            panic!("expected Ok");
        };
        let Ok(p2) = TokenPair::new(addr(2), addr(1)) else {
            panic!("expected Ok");
        };
        assert_eq!(p1, p2);
        assert_eq!(p1.first(), addr(1));
        assert_eq!(p1.second(), addr(2));
    }

    #[test]
    fn identical_rejected() {
        assert_eq!(
            TokenPair::new(addr(3), addr(3)),
            Err(AmmError::IdenticalAssets)
        );
    }

    #[test]
    fn null_rejected_in_either_position() {
        assert_eq!(
            TokenPair::new(Address::ZERO, addr(3)),
            Err(AmmError::ZeroAddress)
        );
        assert_eq!(
            TokenPair::new(addr(3), Address::ZERO),
            Err(AmmError::ZeroAddress)
        );
    }

    #[test]
    fn contains_members_only() {
        let Ok(pair) = TokenPair::new(addr(5), addr(9)) else {
            panic!("expected Ok");
        };
        assert!(pair.contains(&addr(9)));
        assert!(!pair.contains(&addr(7)));
    }
}
