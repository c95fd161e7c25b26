//! Liquidity-ratio solver.

use serde::{Deserialize, Serialize};

use super::quote;
use crate::domain::Amount;
use crate::error::{AmmError, Result};

/// What a provider is willing to deposit.
///
/// `desired_*` are upper bounds; `min_*` protect against the reserve ratio
/// drifting between the time the request is built and the time it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepositAmounts {
    /// Most of the first asset to deposit.
    pub desired_a: Amount,
    /// Most of the second asset to deposit.
    pub desired_b: Amount,
    /// Least of the first asset acceptable.
    pub min_a: Amount,
    /// Least of the second asset acceptable.
    pub min_b: Amount,
}

impl DepositAmounts {
    /// Request with no slippage protection.
    pub const fn exact(desired_a: Amount, desired_b: Amount) -> Self {
        Self {
            desired_a,
            desired_b,
            min_a: Amount::ZERO,
            min_b: Amount::ZERO,
        }
    }
}

/// Picks the deposit that matches the current reserve ratio.
///
/// With both reserves empty the desired amounts are taken verbatim: the
/// first provider sets the price.  Otherwise the first desired amount is
/// quoted in the second asset; if that fits under `desired_b` it is used,
/// else the second desired amount is quoted back in the first asset.
///
/// Reserves are given in the same order as the request.
///
/// # Errors
///
/// - [`AmmError::InsufficientAmountA`] / [`AmmError::InsufficientAmountB`]
///   if the solved amount falls below its minimum.
/// - Any [`quote`] error.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Amount;
/// use cp_amm::quote::{optimal_deposit, DepositAmounts};
///
/// let request = DepositAmounts::exact(Amount::new(1_000), Amount::new(1_000));
/// let solved = optimal_deposit(&request, Amount::new(100_000), Amount::new(50_000));
/// assert_eq!(solved, Ok((Amount::new(1_000), Amount::new(500))));
/// ```
pub fn optimal_deposit(
    request: &DepositAmounts,
    reserve_a: Amount,
    reserve_b: Amount,
) -> Result<(Amount, Amount)> {
    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok((request.desired_a, request.desired_b));
    }

    let b_optimal = quote(request.desired_a, reserve_a, reserve_b)?;
    if b_optimal <= request.desired_b {
        if b_optimal < request.min_b {
            return Err(AmmError::InsufficientAmountB);
        }
        return Ok((request.desired_a, b_optimal));
    }

    let a_optimal = quote(request.desired_b, reserve_b, reserve_a)?;
    if a_optimal > request.desired_a || a_optimal < request.min_a {
        return Err(AmmError::InsufficientAmountA);
    }
    Ok((a_optimal, request.desired_b))
}
