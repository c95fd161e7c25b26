//! Unified error types for the pair engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every failure is surfaced to the immediate caller and
//! unwinds the whole operation: no partial state survives an `Err`.
//!
//! Variants are grouped by the layer that raises them:
//!
//! | Group | Variants |
//! |-------|----------|
//! | Input validation | [`IdenticalAssets`](AmmError::IdenticalAssets), [`ZeroAddress`](AmmError::ZeroAddress), [`InsufficientAmount`](AmmError::InsufficientAmount), [`InsufficientInputAmount`](AmmError::InsufficientInputAmount), [`InsufficientOutputAmount`](AmmError::InsufficientOutputAmount), [`InvalidPath`](AmmError::InvalidPath), [`Expired`](AmmError::Expired), [`InsufficientLiquidity`](AmmError::InsufficientLiquidity), … |
//! | Liquidity math | [`InsufficientLiquidityMinted`](AmmError::InsufficientLiquidityMinted), [`InsufficientLiquidityBurned`](AmmError::InsufficientLiquidityBurned) |
//! | Invariant | [`InvariantViolated`](AmmError::InvariantViolated), [`Overflow`](AmmError::Overflow), [`Underflow`](AmmError::Underflow), [`DivisionByZero`](AmmError::DivisionByZero) |
//! | External transfer | [`InsufficientBalance`](AmmError::InsufficientBalance), [`InsufficientAllowance`](AmmError::InsufficientAllowance), [`TransferFailed`](AmmError::TransferFailed) |
//! | Concurrency | [`Locked`](AmmError::Locked) |
//! | TWAP | [`NoObservation`](AmmError::NoObservation), [`TimestampNotAdvanced`](AmmError::TimestampNotAdvanced), [`WindowNotElapsed`](AmmError::WindowNotElapsed), [`ZeroPriceDelta`](AmmError::ZeroPriceDelta) |

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure the engine, its advisors and its reference host can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AmmError {
    // -- input validation ---------------------------------------------------
    /// Both sides of a pair name the same asset.
    #[error("identical assets")]
    IdenticalAssets,

    /// An asset or recipient is the null identifier.
    #[error("zero address")]
    ZeroAddress,

    /// A quote was requested for a zero amount.
    #[error("insufficient amount")]
    InsufficientAmount,

    /// Nothing was paid into the pair, or a quote input is zero.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// No output was requested, or the output is below the caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// An exact-out route needs more input than the caller allowed.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// The solved amount of the first asset is below its minimum.
    #[error("insufficient amount of asset A")]
    InsufficientAmountA,

    /// The solved amount of the second asset is below its minimum.
    #[error("insufficient amount of asset B")]
    InsufficientAmountB,

    /// A reserve is zero or a requested output would drain it.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A route path is too short or repeats an asset back-to-back.
    #[error("invalid path: {0}")]
    InvalidPath(&'static str),

    /// Swap output would be sent to one of the pair's own asset ids.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// The caller's deadline is in the past.
    #[error("deadline expired")]
    Expired,

    /// The registry already holds a pair for this asset set.
    #[error("pair already exists")]
    PairExists,

    /// No pair is registered for this asset set.
    #[error("pair not found")]
    PairNotFound,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    // -- liquidity math -----------------------------------------------------
    /// A deposit was too small to issue any claim tokens.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A withdrawal would return zero of at least one asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    // -- invariant ----------------------------------------------------------
    /// The fee-adjusted balance product fell below the reserve product.
    #[error("constant-product invariant violated")]
    InvariantViolated,

    /// Arithmetic overflow, including a reserve exceeding 112 bits.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("underflow: {0}")]
    Underflow(&'static str),

    /// Division by a zero denominator.
    #[error("division by zero")]
    DivisionByZero,

    // -- external transfer --------------------------------------------------
    /// The sender does not hold enough of the asset.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The spender's allowance does not cover the transfer.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// The asset ledger refused the transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(&'static str),

    // -- concurrency --------------------------------------------------------
    /// A mutating call arrived while the pair was busy.
    #[error("pair is locked")]
    Locked,

    // -- TWAP guard ---------------------------------------------------------
    /// No observation has been recorded for the pair.
    #[error("no observation recorded for pair")]
    NoObservation,

    /// The pair's timestamp has not moved past the stored observation.
    #[error("pair timestamp has not advanced")]
    TimestampNotAdvanced,

    /// Less time than the requested window has elapsed.
    #[error("observation window not elapsed")]
    WindowNotElapsed,

    /// The cumulative price did not move over the window.
    #[error("zero cumulative price delta")]
    ZeroPriceDelta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = AmmError::Overflow("reserve exceeds 112 bits");
        assert_eq!(err.to_string(), "overflow: reserve exceeds 112 bits");
    }

    #[test]
    fn errors_are_comparable() {
        assert_eq!(AmmError::Locked, AmmError::Locked);
        assert_ne!(AmmError::Locked, AmmError::Expired);
    }
}
