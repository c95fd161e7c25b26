//! Observation store and windowed execution.

use std::collections::HashMap;

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Address, Amount, Rounding, SwapDirection, Timestamp, BPS_SCALE};
use crate::error::{AmmError, Result};
use crate::host::{atomically, Host};
use crate::math::{mul_decode, mul_div};
use crate::pair::Pair;
use crate::quote::get_amount_out;

/// Accumulator snapshot of one pair at one pair timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Pair timestamp the snapshot was taken at.
    pub timestamp: Timestamp,
    /// Cumulative price of the lower asset.
    pub cumulative_a: U256,
    /// Cumulative price of the higher asset.
    pub cumulative_b: U256,
}

impl Observation {
    fn of(pair: &Pair) -> Self {
        let (reserves, prices) = pair.price_state();
        Self {
            timestamp: reserves.last_update(),
            cumulative_a: prices.cumulative_a(),
            cumulative_b: prices.cumulative_b(),
        }
    }

    const fn cumulative(&self, direction: SwapDirection) -> U256 {
        match direction {
            SwapDirection::AToB => self.cumulative_a,
            SwapDirection::BToA => self.cumulative_b,
        }
    }
}

/// A trade request executed against the time-weighted price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedTrade {
    /// Exact input paid by the trader.
    pub amount_in: Amount,
    /// Least output the trader accepts.
    pub min_out: Amount,
    /// Seconds that must separate the stored observation from the pair's
    /// current timestamp.
    pub window: u32,
    /// Which asset is paid in.
    pub direction: SwapDirection,
}

/// Per-pair observation store and windowed executor.
///
/// Traders approve the guard's [`address`](Self::address) as a spender of
/// the asset they pay in.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Address;
/// use cp_amm::guard::TwapGuard;
///
/// let guard = TwapGuard::new(Address::repeat_byte(0x70));
/// assert!(guard.observation(&Address::repeat_byte(1)).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TwapGuard {
    address: Address,
    observations: HashMap<Address, Observation>,
}

impl TwapGuard {
    /// Creates a guard acting from `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            observations: HashMap::new(),
        }
    }

    /// Ledger address the guard spends from.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Stored observation for the pair at `pair`.
    #[must_use]
    pub fn observation(&self, pair: &Address) -> Option<Observation> {
        self.observations.get(pair).copied()
    }

    /// Stores the pair's current accumulator snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TimestampNotAdvanced`] unless the pair's
    /// timestamp has moved past the stored observation.
    pub fn record_observation(&mut self, pair: &Pair) -> Result<Observation> {
        let current = Observation::of(pair);
        if let Some(previous) = self.observations.get(&pair.address()) {
            if current.timestamp.elapsed_since(previous.timestamp) == 0 {
                return Err(AmmError::TimestampNotAdvanced);
            }
        }
        self.observations.insert(pair.address(), current);
        debug!(pair = %pair.address(), timestamp = %current.timestamp, "observation recorded");
        Ok(current)
    }

    /// Executes `trade` for `trader` at the lesser of the windowed mean
    /// price and the current spot quote, then refreshes the observation.
    ///
    /// Returns the output paid to `trader`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
    /// - [`AmmError::NoObservation`] if nothing was recorded for the pair.
    /// - [`AmmError::WindowNotElapsed`] if less than `window` seconds (and
    ///   never less than one) separate the observation from the pair's
    ///   current timestamp.
    /// - [`AmmError::ZeroPriceDelta`] if the cumulative price did not move.
    /// - [`AmmError::InsufficientOutputAmount`] if the capped output is zero
    ///   or below `min_out`.
    /// - Transfer and swap errors; the whole execution then unwinds.
    pub fn execute_windowed<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        trader: &Address,
        pair: &Pair,
        trade: &WindowedTrade,
    ) -> Result<Amount> {
        if trade.amount_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }
        let observed = self
            .observations
            .get(&pair.address())
            .copied()
            .ok_or(AmmError::NoObservation)?;
        let current = Observation::of(pair);

        let elapsed = current.timestamp.elapsed_since(observed.timestamp);
        if elapsed < trade.window.max(1) {
            warn!(pair = %pair.address(), elapsed, window = trade.window, "window not elapsed");
            return Err(AmmError::WindowNotElapsed);
        }
        let (delta, _) = current
            .cumulative(trade.direction)
            .overflowing_sub(observed.cumulative(trade.direction));
        if delta.is_zero() {
            return Err(AmmError::ZeroPriceDelta);
        }

        let fee = pair.fee_tier();
        let mean_price = delta / U256::from(elapsed);
        let gross = mul_decode(mean_price, trade.amount_in)?;
        let windowed = Amount::new(mul_div(
            gross.get(),
            fee.retained(),
            BPS_SCALE,
            Rounding::Down,
        )?);

        let reserves = pair.get_state();
        let (reserve_in, reserve_out) = match trade.direction {
            SwapDirection::AToB => (reserves.amount_a(), reserves.amount_b()),
            SwapDirection::BToA => (reserves.amount_b(), reserves.amount_a()),
        };
        let spot = get_amount_out(trade.amount_in, reserve_in, reserve_out, fee)?;
        let amount_out = windowed.min(spot);
        if amount_out.is_zero() || amount_out < trade.min_out {
            return Err(AmmError::InsufficientOutputAmount);
        }

        let tokens = pair.token_pair();
        let (asset_in, out_a, out_b) = match trade.direction {
            SwapDirection::AToB => (tokens.first(), Amount::ZERO, amount_out),
            SwapDirection::BToA => (tokens.second(), amount_out, Amount::ZERO),
        };
        atomically(host, |host| {
            host.transfer_from(
                &asset_in,
                &self.address,
                trader,
                &pair.address(),
                trade.amount_in,
            )?;
            pair.swap(host, &self.address, out_a, out_b, trader, &[])
        })?;

        self.observations.insert(pair.address(), Observation::of(pair));
        debug!(
            pair = %pair.address(),
            %trader,
            amount_in = %trade.amount_in,
            %windowed,
            %spot,
            %amount_out,
            "windowed trade executed"
        );
        Ok(amount_out)
    }
}
