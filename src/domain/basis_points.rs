//! Basis-point representation for percentages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Scale of the basis-point system: 10 000 bp = 100%.
pub const BPS_SCALE: u128 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Values above 10 000 are representable but meaningless as percentages;
/// [`is_valid_percent`](Self::is_valid_percent) tells them apart.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::BasisPoints;
///
/// let bp = BasisPoints::new(30);
/// assert_eq!(bp.complement(), 9_970);
/// assert!(bp.is_valid_percent());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(10_000);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= Self::MAX_PERCENT.0
    }

    /// Returns `10_000 - self`, the share kept after the percentage is taken.
    ///
    /// Saturates at zero for out-of-range values.
    #[must_use]
    pub const fn complement(&self) -> u128 {
        BPS_SCALE.saturating_sub(self.0 as u128)
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn valid_percent_range() {
        assert!(BasisPoints::ZERO.is_valid_percent());
        assert!(BasisPoints::MAX_PERCENT.is_valid_percent());
        assert!(!BasisPoints::new(10_001).is_valid_percent());
    }

    #[test]
    fn complement_of_standard_fee() {
        assert_eq!(BasisPoints::new(30).complement(), 9_970);
        assert_eq!(BasisPoints::new(20_000).complement(), 0);
    }

    #[test]
    fn display() {
        assert_eq!(BasisPoints::new(30).to_string(), "30bp");
    }
}
