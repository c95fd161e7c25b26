//! Time-weighted cumulative price accumulators.

use primitive_types::U256;
use tracing::trace;

use super::Reserves;
use crate::domain::Timestamp;
use crate::error::{AmmError, Result};
use crate::math::fraction;

/// Running integrals of each side's price over time, in UQ112x112.
///
/// `cumulative_a` integrates `reserve_b / reserve_a` (the price of the
/// lower asset in units of the higher one), `cumulative_b` the inverse.
/// Two readings taken `t` seconds apart give the mean price over that
/// window as `(later - earlier) / t`.
///
/// Additions wrap at 256 bits.  Consumers must take differences with
/// wrapping subtraction, which stays correct across a single wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceAccumulator {
    cumulative_a: U256,
    cumulative_b: U256,
}

impl PriceAccumulator {
    /// Creates an accumulator from raw readings.
    #[must_use]
    pub const fn new(cumulative_a: U256, cumulative_b: U256) -> Self {
        Self {
            cumulative_a,
            cumulative_b,
        }
    }

    /// Cumulative price of the lower asset.
    #[must_use]
    pub const fn cumulative_a(&self) -> U256 {
        self.cumulative_a
    }

    /// Cumulative price of the higher asset.
    #[must_use]
    pub const fn cumulative_b(&self) -> U256 {
        self.cumulative_b
    }

    /// Integrates the price held by `prior` from its timestamp up to `now`.
    ///
    /// Nothing accrues when no time has passed or when either prior
    /// reserve is empty.  The price used is always the *prior* one: it is
    /// the price that was in force during the elapsed interval.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if a single increment exceeds 256
    /// bits, which cannot happen with 112-bit reserves and a 32-bit
    /// interval.
    pub fn accrue(&self, prior: &Reserves, now: Timestamp) -> Result<Self> {
        let elapsed = now.elapsed_since(prior.last_update());
        if elapsed == 0 || prior.is_degenerate() {
            return Ok(*self);
        }
        let span = U256::from(elapsed);
        let step_a = fraction(prior.reserve_b(), prior.reserve_a())?
            .checked_mul(span)
            .ok_or(AmmError::Overflow("cumulative price increment"))?;
        let step_b = fraction(prior.reserve_a(), prior.reserve_b())?
            .checked_mul(span)
            .ok_or(AmmError::Overflow("cumulative price increment"))?;
        trace!(elapsed, %step_a, %step_b, "accrue cumulative prices");
        Ok(Self {
            cumulative_a: self.cumulative_a.overflowing_add(step_a).0,
            cumulative_b: self.cumulative_b.overflowing_add(step_b).0,
        })
    }
}
