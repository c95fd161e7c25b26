//! Swap fee tier built on [`BasisPoints`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::BasisPoints;

/// The fee a pair charges on every inbound swap amount.
///
/// The reference venue charges 0.30%, i.e. 30 bp on a 10 000 scale, which
/// is the same ratio as the classic `997 / 1000` formulation.  Both the
/// engine's invariant check and the quoting engine read the fee from the
/// pair's tier, so quotes and enforcement agree to the rounding digit.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::FeeTier;
///
/// let tier = FeeTier::default();
/// assert_eq!(tier.basis_points().get(), 30);
/// assert_eq!(tier.retained(), 9_970);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// No fee.  Only meaningful in tests and simulations.
    pub const ZERO: Self = Self(BasisPoints::ZERO);

    /// 0.30%, the constant-product reference fee.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% fee.
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Fee numerator on the 10 000 scale.
    #[must_use]
    pub const fn numerator(&self) -> u128 {
        self.0.get() as u128
    }

    /// Share of an inbound amount that is priced, on the 10 000 scale.
    #[must_use]
    pub const fn retained(&self) -> u128 {
        self.0.complement()
    }

    /// Returns `true` if the fee is strictly below 100%.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0.get() < BasisPoints::MAX_PERCENT.get()
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::TIER_0_30_PERCENT
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
