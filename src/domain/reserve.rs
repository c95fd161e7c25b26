//! Reserve values bounded to 112 bits.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;
use crate::error::AmmError;

/// A reserve balance that fits in 112 bits.
///
/// The reserve store keeps both balances at this width so that the
/// product of two reserves and the UQ112x112 price shift stay inside a
/// 256-bit accumulator.  The only way in is the checked
/// [`TryFrom<Amount>`] conversion, which fails loudly instead of
/// truncating.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::{Amount, Reserve};
///
/// let r = Reserve::try_from(Amount::new(1_000)).expect("fits");
/// assert_eq!(r.amount(), Amount::new(1_000));
/// assert!(Reserve::try_from(Amount::MAX).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Reserve(u128);

impl Reserve {
    /// Bit width of a reserve.
    pub const BITS: u32 = 112;

    /// Empty reserve.
    pub const ZERO: Self = Self(0);

    /// Largest storable reserve, `2^112 - 1`.
    pub const MAX: Self = Self((1u128 << Self::BITS) - 1);

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the reserve is empty.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widens back to an [`Amount`].
    pub const fn amount(&self) -> Amount {
        Amount::new(self.0)
    }
}

impl TryFrom<Amount> for Reserve {
    type Error = AmmError;

    fn try_from(value: Amount) -> Result<Self, Self::Error> {
        if value.get() > Self::MAX.0 {
            return Err(AmmError::Overflow("reserve exceeds 112 bits"));
        }
        Ok(Self(value.get()))
    }
}

impl fmt::Display for Reserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
