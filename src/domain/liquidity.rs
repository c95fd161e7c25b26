//! Claim-token (LP share) quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;

/// A quantity of a pair's claim tokens.
///
/// Distinct from [`Amount`] because it counts pro-rata ownership of the
/// pooled reserves, not units of either asset.  Keeping the two apart
/// stops a claim balance from being passed where an asset amount is
/// expected.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Liquidity;
///
/// let issued = Liquidity::new(69_710);
/// let locked = Liquidity::new(1_000);
/// assert_eq!(issued.checked_add(&locked), Some(Liquidity::new(70_710)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Liquidity(u128);

impl Liquidity {
    /// No claims.
    pub const ZERO: Self = Self(0);

    /// Unlimited allowance marker.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Liquidity` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Reinterprets the raw value as an [`Amount`] for wide-integer math.
    pub const fn as_amount(&self) -> Amount {
        Amount::new(self.0)
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
