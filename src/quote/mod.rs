//! Stateless quoting: single-hop and multi-hop amounts, and the
//! liquidity-ratio solver.
//!
//! Every function here reads the fee from the pair's [`FeeTier`], the same
//! value the engine enforces, so a quoted output is always accepted by
//! [`Pair::swap`] at unchanged reserves.
//!
//! [`FeeTier`]: crate::domain::FeeTier
//! [`Pair::swap`]: crate::pair::Pair::swap

mod amounts;
mod liquidity;

pub use amounts::{get_amount_in, get_amount_out, get_amounts_in, get_amounts_out, quote};
pub use liquidity::{optimal_deposit, DepositAmounts};
