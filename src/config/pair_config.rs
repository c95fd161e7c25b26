//! Configuration shared by every pair a registry creates.

use serde::{Deserialize, Serialize};

use crate::domain::{FeeTier, Liquidity};
use crate::error::AmmError;

/// Claims locked forever on the first provision of every pair.
pub const MINIMUM_LIQUIDITY: Liquidity = Liquidity::new(1_000);

/// Immutable parameters of a constant-product pair.
///
/// # Validation
///
/// - The fee must be strictly below 100%, otherwise no swap can ever
///   satisfy the invariant.
/// - The locked minimum must be non-zero, otherwise the claim supply could
///   return to zero while reserves are non-zero.
///
/// # Examples
///
/// ```
/// use cp_amm::config::PairConfig;
/// use cp_amm::domain::{BasisPoints, FeeTier, Liquidity};
///
/// let reference = PairConfig::default();
/// assert_eq!(reference.fee_tier().basis_points().get(), 30);
/// assert_eq!(reference.minimum_liquidity(), Liquidity::new(1_000));
///
/// let custom = PairConfig::new(FeeTier::new(BasisPoints::new(100)), Liquidity::new(10))
///     .expect("valid config");
/// assert_eq!(custom.fee_tier().numerator(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    fee_tier: FeeTier,
    minimum_liquidity: Liquidity,
}

impl PairConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if either value is out of range.
    pub fn new(fee_tier: FeeTier, minimum_liquidity: Liquidity) -> Result<Self, AmmError> {
        let config = Self {
            fee_tier,
            minimum_liquidity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if either value is out of range.
    pub fn validate(&self) -> Result<(), AmmError> {
        if !self.fee_tier.is_valid() {
            return Err(AmmError::InvalidConfiguration("fee must be below 100%"));
        }
        if self.minimum_liquidity.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "minimum locked liquidity must be non-zero",
            ));
        }
        Ok(())
    }

    /// Returns the swap fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the claims locked on first provision.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            fee_tier: FeeTier::TIER_0_30_PERCENT,
            minimum_liquidity: MINIMUM_LIQUIDITY,
        }
    }
}
