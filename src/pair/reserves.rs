//! Reserve store: two 112-bit reserves and the time they were written.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Reserve, Timestamp};
use crate::error::Result;

/// The pair's own bookkeeping of what it holds, as of `last_update`.
///
/// This is *not* the live custodied balance.  Between a deposit and the
/// next mutating call the ledger balance exceeds the reserve, and that gap
/// is exactly what `mint` and `swap` read as the caller's payment.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::{Amount, Timestamp};
/// use cp_amm::pair::Reserves;
///
/// let r = Reserves::from_amounts(Amount::new(1_000), Amount::new(2_000), Timestamp::new(7))
///     .expect("fits in 112 bits");
/// assert_eq!(r.amount_b(), Amount::new(2_000));
/// assert_eq!(r.last_update(), Timestamp::new(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reserves {
    reserve_a: Reserve,
    reserve_b: Reserve,
    last_update: Timestamp,
}

impl Reserves {
    /// Empty reserves at time zero, the state of a fresh pair.
    pub const EMPTY: Self = Self {
        reserve_a: Reserve::ZERO,
        reserve_b: Reserve::ZERO,
        last_update: Timestamp::new(0),
    };

    /// Builds a store from already-checked reserves.
    #[must_use]
    pub const fn new(reserve_a: Reserve, reserve_b: Reserve, last_update: Timestamp) -> Self {
        Self {
            reserve_a,
            reserve_b,
            last_update,
        }
    }

    /// Builds a store from raw balances.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`](crate::error::AmmError::Overflow) if
    /// either balance needs more than 112 bits.
    pub fn from_amounts(balance_a: Amount, balance_b: Amount, now: Timestamp) -> Result<Self> {
        Ok(Self::new(
            Reserve::try_from(balance_a)?,
            Reserve::try_from(balance_b)?,
            now,
        ))
    }

    /// Reserve of the lower asset.
    #[must_use]
    pub const fn reserve_a(&self) -> Reserve {
        self.reserve_a
    }

    /// Reserve of the higher asset.
    #[must_use]
    pub const fn reserve_b(&self) -> Reserve {
        self.reserve_b
    }

    /// Reserve of the lower asset as an [`Amount`].
    pub const fn amount_a(&self) -> Amount {
        self.reserve_a.amount()
    }

    /// Reserve of the higher asset as an [`Amount`].
    pub const fn amount_b(&self) -> Amount {
        self.reserve_b.amount()
    }

    /// Truncated time of the last write.
    #[must_use]
    pub const fn last_update(&self) -> Timestamp {
        self.last_update
    }

    /// `true` while either side is empty; no trade can be priced.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.reserve_a.is_zero() || self.reserve_b.is_zero()
    }
}
