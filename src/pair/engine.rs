//! The constant-product pair engine.
//!
//! # Operation shape
//!
//! Every mutating call follows the same sequence:
//!
//! 1. Take the pair's [`BusyFlag`]; a re-entrant call fails with
//!    [`AmmError::Locked`].
//! 2. Copy the current [`Reserves`] and [`PriceAccumulator`].
//! 3. Inside a host journal scope, move assets and compute the next state
//!    from the copy.  Claim-ledger writes come last, after every other
//!    fallible step.
//! 4. On success commit the scope, store the next state and emit events.
//!    On failure roll the scope back; nothing was written.
//!
//! # Invariant (swap)
//!
//! With fee `f` basis points and scale `S = 10 000`:
//!
//! ```text
//! (balance_a·S − in_a·f) × (balance_b·S − in_b·f) ≥ reserve_a × reserve_b × S²
//! ```
//!
//! evaluated in 512-bit arithmetic against the reserves as they were
//! *before* the trade.

use parking_lot::Mutex;
use primitive_types::U256;
use tracing::{debug, warn};

use super::{BusyFlag, BusyGuard, ClaimLedger, PairEvent, PriceAccumulator, Reserves};
use crate::config::PairConfig;
use crate::domain::{
    Address, Amount, FeeTier, Liquidity, Rounding, SwapDirection, Timestamp, TokenPair, BPS_SCALE,
};
use crate::error::{AmmError, Result};
use crate::host::{atomically, AssetLedger, Host};
use crate::math::{full_mul, mul_div, sqrt_product, CheckedArithmetic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PairState {
    reserves: Reserves,
    prices: PriceAccumulator,
}

impl PairState {
    /// Accrues the prior price up to `now`, then records the new balances.
    fn advance(&self, balance_a: Amount, balance_b: Amount, now: Timestamp) -> Result<Self> {
        let reserves = Reserves::from_amounts(balance_a, balance_b, now)?;
        let prices = self.prices.accrue(&self.reserves, now)?;
        Ok(Self { reserves, prices })
    }
}

/// Full copy of a pair's mutable state, used to undo multi-pair operations.
#[derive(Debug, Clone)]
pub(crate) struct PairSnapshot {
    state: PairState,
    claims: ClaimLedger,
}

/// One constant-product market for an unordered asset pair.
///
/// A `Pair` custodies nothing itself: the assets sit in the host ledger
/// under [`address`](Self::address), and the pair keeps its own view of
/// them in the reserve store.  Callers deposit first and then call
/// [`mint`](Self::mint) or [`swap`](Self::swap); the engine reads the gap
/// between ledger balance and reserve as the payment.
///
/// All methods take `&self`.  Mutating calls are serialised per pair by an
/// internal busy flag, so a `Pair` can be shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use cp_amm::config::PairConfig;
/// use cp_amm::domain::{Address, Amount, Liquidity, TokenPair};
/// use cp_amm::host::{AssetLedger, MemoryHost};
/// use cp_amm::pair::Pair;
///
/// let (x, y) = (Address::repeat_byte(1), Address::repeat_byte(2));
/// let pair = Pair::new(
///     Address::repeat_byte(0xee),
///     TokenPair::new(x, y).expect("distinct"),
///     PairConfig::default(),
/// );
/// let lp = Address::repeat_byte(0x11);
///
/// let mut host = MemoryHost::new(1_000);
/// host.mint(&x, &pair.address(), Amount::new(100_000)).expect("deposit");
/// host.mint(&y, &pair.address(), Amount::new(50_000)).expect("deposit");
///
/// let issued = pair.mint(&mut host, &lp, &lp).expect("first provision");
/// assert_eq!(issued, Liquidity::new(69_710));
/// assert_eq!(pair.total_claim_supply(), Liquidity::new(70_710));
/// ```
#[derive(Debug)]
pub struct Pair {
    address: Address,
    token_pair: TokenPair,
    config: PairConfig,
    busy: BusyFlag,
    state: Mutex<PairState>,
    claims: Mutex<ClaimLedger>,
}

impl Pair {
    /// Creates an empty pair.  Reserves start at zero and no trade is
    /// possible until the first [`mint`](Self::mint).
    #[must_use]
    pub fn new(address: Address, token_pair: TokenPair, config: PairConfig) -> Self {
        Self {
            address,
            token_pair,
            config,
            busy: BusyFlag::new(),
            state: Mutex::new(PairState::default()),
            claims: Mutex::new(ClaimLedger::new()),
        }
    }

    // -- read-only surface ---------------------------------------------------

    /// Ledger address holding the pair's assets.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The two assets, canonically ordered.
    #[must_use]
    pub const fn token_pair(&self) -> TokenPair {
        self.token_pair
    }

    /// Immutable parameters.
    #[must_use]
    pub const fn config(&self) -> PairConfig {
        self.config
    }

    /// Swap fee charged on inbound amounts.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.config.fee_tier()
    }

    /// Reserves and the time they were last written.
    #[must_use]
    pub fn get_state(&self) -> Reserves {
        self.state.lock().reserves
    }

    /// Stored cumulative price of the lower asset.
    #[must_use]
    pub fn price_cumulative_a(&self) -> U256 {
        self.state.lock().prices.cumulative_a()
    }

    /// Stored cumulative price of the higher asset.
    #[must_use]
    pub fn price_cumulative_b(&self) -> U256 {
        self.state.lock().prices.cumulative_b()
    }

    /// Reserves and accumulators read together under one lock.
    #[must_use]
    pub fn price_state(&self) -> (Reserves, PriceAccumulator) {
        let state = self.snapshot_state();
        (state.reserves, state.prices)
    }

    /// Cumulative prices as they would read if the pair were updated at
    /// `now` (Unix seconds).  Writes nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`PriceAccumulator::accrue`] errors.
    pub fn current_cumulative_prices(&self, now: u64) -> Result<(U256, U256)> {
        let state = self.snapshot_state();
        let prices = state
            .prices
            .accrue(&state.reserves, Timestamp::from_unix(now))?;
        Ok((prices.cumulative_a(), prices.cumulative_b()))
    }

    /// `(reserve_in, reserve_out)` for a trade paying `input`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if `input` is not one of the assets.
    pub fn reserves_for(&self, input: &Address) -> Result<(Amount, Amount)> {
        let reserves = self.get_state();
        match self.direction_for(input)? {
            SwapDirection::AToB => Ok((reserves.amount_a(), reserves.amount_b())),
            SwapDirection::BToA => Ok((reserves.amount_b(), reserves.amount_a())),
        }
    }

    /// Which way a trade paying `input` flows.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if `input` is not one of the assets.
    pub fn direction_for(&self, input: &Address) -> Result<SwapDirection> {
        if *input == self.token_pair.first() {
            Ok(SwapDirection::AToB)
        } else if *input == self.token_pair.second() {
            Ok(SwapDirection::BToA)
        } else {
            Err(AmmError::InvalidPath("asset is not part of this pair"))
        }
    }

    /// `true` while a mutating call is in progress.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    // -- claim ledger --------------------------------------------------------

    /// Total claims outstanding, locked minimum included.
    #[must_use]
    pub fn total_claim_supply(&self) -> Liquidity {
        self.claims.lock().total_supply()
    }

    /// Claims held by `holder`.
    #[must_use]
    pub fn claim_balance_of(&self, holder: &Address) -> Liquidity {
        self.claims.lock().balance_of(holder)
    }

    /// Claims `spender` may move on behalf of `owner`.
    #[must_use]
    pub fn claim_allowance(&self, owner: &Address, spender: &Address) -> Liquidity {
        self.claims.lock().allowance(owner, spender)
    }

    /// Moves claims from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds too little.
    pub fn transfer_claims(&self, from: &Address, to: &Address, amount: Liquidity) -> Result<()> {
        self.claims.lock().transfer(from, to, amount)
    }

    /// Lets `spender` move up to `amount` of `owner`'s claims.
    pub fn approve_claims(&self, owner: &Address, spender: &Address, amount: Liquidity) {
        self.claims.lock().approve(owner, spender, amount);
    }

    /// Moves claims on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// See [`ClaimLedger::transfer_from`].
    pub fn transfer_claims_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Liquidity,
    ) -> Result<()> {
        self.claims.lock().transfer_from(spender, from, to, amount)
    }

    // -- mutating operations -------------------------------------------------

    /// Issues claims to `to` for whatever was deposited since the last update.
    ///
    /// On the first provision `√(Δa·Δb) − minimum` claims are issued and
    /// the configured minimum is locked under [`Address::ZERO`].  After
    /// that the issue is `min(Δa·supply/reserve_a, Δb·supply/reserve_b)`;
    /// any excess of one side stays in the pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - [`AmmError::InsufficientLiquidityMinted`] if the issue rounds to zero.
    /// - [`AmmError::Overflow`] if a balance exceeds 112 bits.
    pub fn mint<H: Host + ?Sized>(
        &self,
        host: &mut H,
        sender: &Address,
        to: &Address,
    ) -> Result<Liquidity> {
        let _guard = self.enter("mint")?;
        let state = self.snapshot_state();
        let now = Timestamp::from_unix(host.now());

        let (next, issued, amount_a, amount_b) = atomically(host, |host| {
            let (balance_a, balance_b) = self.balances(host);
            let amount_a = balance_a.safe_sub(&state.reserves.amount_a())?;
            let amount_b = balance_b.safe_sub(&state.reserves.amount_b())?;
            let minimum = self.config.minimum_liquidity();

            let mut claims = self.claims.lock();
            let supply = claims.total_supply();
            let issued = if supply.is_zero() {
                Liquidity::new(sqrt_product(amount_a.get(), amount_b.get()))
                    .checked_sub(&minimum)
                    .unwrap_or(Liquidity::ZERO)
            } else {
                let by_a = mul_div(
                    amount_a.get(),
                    supply.get(),
                    state.reserves.amount_a().get(),
                    Rounding::Down,
                )?;
                let by_b = mul_div(
                    amount_b.get(),
                    supply.get(),
                    state.reserves.amount_b().get(),
                    Rounding::Down,
                )?;
                Liquidity::new(by_a.min(by_b))
            };
            if issued.is_zero() {
                return Err(AmmError::InsufficientLiquidityMinted);
            }

            let next = state.advance(balance_a, balance_b, now)?;
            if supply.is_zero() {
                // issued + minimum is the root itself, so neither mint can overflow.
                claims.mint(&Address::ZERO, minimum)?;
            }
            claims.mint(to, issued)?;
            Ok((next, issued, amount_a, amount_b))
        })?;

        debug!(pair = %self.address, %to, %issued, %amount_a, %amount_b, "mint");
        self.publish(
            host,
            next,
            PairEvent::Mint {
                pair: self.address,
                sender: *sender,
                amount_a,
                amount_b,
                to: *to,
                liquidity: issued,
            },
        );
        Ok(issued)
    }

    /// Redeems the claims held by the pair itself, paying both assets to `to`.
    ///
    /// The caller transfers claims to [`address`](Self::address) first.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout rounds to zero.
    /// - Any transfer error from the host.
    pub fn burn<H: Host + ?Sized>(
        &self,
        host: &mut H,
        sender: &Address,
        to: &Address,
    ) -> Result<(Amount, Amount)> {
        let _guard = self.enter("burn")?;
        let state = self.snapshot_state();
        let now = Timestamp::from_unix(host.now());

        let (next, burned, amount_a, amount_b) = atomically(host, |host| {
            let (balance_a, balance_b) = self.balances(host);
            let (held, supply) = {
                let claims = self.claims.lock();
                (claims.balance_of(&self.address), claims.total_supply())
            };
            if supply.is_zero() {
                return Err(AmmError::InsufficientLiquidityBurned);
            }
            let amount_a = Amount::new(mul_div(
                held.get(),
                balance_a.get(),
                supply.get(),
                Rounding::Down,
            )?);
            let amount_b = Amount::new(mul_div(
                held.get(),
                balance_b.get(),
                supply.get(),
                Rounding::Down,
            )?);
            if amount_a.is_zero() || amount_b.is_zero() {
                return Err(AmmError::InsufficientLiquidityBurned);
            }

            host.transfer(&self.token_pair.first(), &self.address, to, amount_a)?;
            host.transfer(&self.token_pair.second(), &self.address, to, amount_b)?;

            let (balance_a, balance_b) = self.balances(host);
            let next = state.advance(balance_a, balance_b, now)?;
            self.claims.lock().burn(&self.address, held)?;
            Ok((next, held, amount_a, amount_b))
        })?;

        debug!(pair = %self.address, %to, %burned, %amount_a, %amount_b, "burn");
        self.publish(
            host,
            next,
            PairEvent::Burn {
                pair: self.address,
                sender: *sender,
                amount_a,
                amount_b,
                to: *to,
                liquidity: burned,
            },
        );
        Ok((amount_a, amount_b))
    }

    /// Pays the requested outputs to `to`, then checks that enough was paid in.
    ///
    /// Outputs are sent before the payment is verified; the fee-adjusted
    /// invariant check afterwards is unconditional and runs in the same
    /// journal scope, so an unpaid swap unwinds completely.  `data` is
    /// accepted and ignored: no callback is made.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - [`AmmError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`AmmError::InsufficientLiquidity`] if an output is not strictly
    ///   below its reserve (checked before any transfer).
    /// - [`AmmError::InvalidRecipient`] if `to` is one of the pair's assets.
    /// - [`AmmError::InsufficientInputAmount`] if nothing was paid in.
    /// - [`AmmError::InvariantViolated`] if too little was paid in.
    pub fn swap<H: Host + ?Sized>(
        &self,
        host: &mut H,
        sender: &Address,
        amount_a_out: Amount,
        amount_b_out: Amount,
        to: &Address,
        data: &[u8],
    ) -> Result<()> {
        let _guard = self.enter("swap")?;
        if amount_a_out.is_zero() && amount_b_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        let state = self.snapshot_state();
        let reserve_a = state.reserves.amount_a();
        let reserve_b = state.reserves.amount_b();
        if amount_a_out >= reserve_a || amount_b_out >= reserve_b {
            return Err(AmmError::InsufficientLiquidity);
        }
        if self.token_pair.contains(to) {
            return Err(AmmError::InvalidRecipient);
        }
        let now = Timestamp::from_unix(host.now());

        let (next, amount_a_in, amount_b_in) = atomically(host, |host| {
            if !amount_a_out.is_zero() {
                host.transfer(&self.token_pair.first(), &self.address, to, amount_a_out)?;
            }
            if !amount_b_out.is_zero() {
                host.transfer(&self.token_pair.second(), &self.address, to, amount_b_out)?;
            }

            let (balance_a, balance_b) = self.balances(host);
            // Outputs are strictly below the reserves, so these cannot underflow.
            let amount_a_in = balance_a.saturating_sub(&reserve_a.saturating_sub(&amount_a_out));
            let amount_b_in = balance_b.saturating_sub(&reserve_b.saturating_sub(&amount_b_out));
            if amount_a_in.is_zero() && amount_b_in.is_zero() {
                return Err(AmmError::InsufficientInputAmount);
            }

            self.check_invariant(
                (balance_a, balance_b),
                (amount_a_in, amount_b_in),
                &state.reserves,
            )?;
            let next = state.advance(balance_a, balance_b, now)?;
            Ok((next, amount_a_in, amount_b_in))
        })?;

        debug!(
            pair = %self.address,
            %amount_a_in,
            %amount_b_in,
            %amount_a_out,
            %amount_b_out,
            %to,
            aux_len = data.len(),
            "swap"
        );
        self.publish(
            host,
            next,
            PairEvent::Swap {
                pair: self.address,
                sender: *sender,
                amount_a_in,
                amount_b_in,
                amount_a_out,
                amount_b_out,
                to: *to,
            },
        );
        Ok(())
    }

    /// Sets the reserves to the custodied balances without moving value.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - [`AmmError::Overflow`] if a balance exceeds 112 bits.
    pub fn sync<H: Host + ?Sized>(&self, host: &mut H) -> Result<()> {
        let _guard = self.enter("sync")?;
        let state = self.snapshot_state();
        let (balance_a, balance_b) = self.balances(host);
        let next = state.advance(balance_a, balance_b, Timestamp::from_unix(host.now()))?;
        debug!(pair = %self.address, %balance_a, %balance_b, "sync");
        *self.state.lock() = next;
        host.emit(self.sync_event(&next.reserves));
        Ok(())
    }

    /// Sends any custodied excess over the reserves to `to`.  Reserves and
    /// accumulators are untouched.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - Any transfer error from the host.
    pub fn skim<H: Host + ?Sized>(&self, host: &mut H, to: &Address) -> Result<(Amount, Amount)> {
        let _guard = self.enter("skim")?;
        let reserves = self.get_state();
        let (excess_a, excess_b) = atomically(host, |host| {
            let (balance_a, balance_b) = self.balances(host);
            let excess_a = balance_a.saturating_sub(&reserves.amount_a());
            let excess_b = balance_b.saturating_sub(&reserves.amount_b());
            if !excess_a.is_zero() {
                host.transfer(&self.token_pair.first(), &self.address, to, excess_a)?;
            }
            if !excess_b.is_zero() {
                host.transfer(&self.token_pair.second(), &self.address, to, excess_b)?;
            }
            Ok((excess_a, excess_b))
        })?;
        debug!(pair = %self.address, %to, %excess_a, %excess_b, "skim");
        Ok((excess_a, excess_b))
    }

    // -- crate-internal ------------------------------------------------------

    pub(crate) fn snapshot(&self) -> PairSnapshot {
        PairSnapshot {
            state: self.snapshot_state(),
            claims: self.claims.lock().clone(),
        }
    }

    pub(crate) fn restore(&self, snapshot: PairSnapshot) {
        *self.state.lock() = snapshot.state;
        *self.claims.lock() = snapshot.claims;
    }

    // -- internals -----------------------------------------------------------

    fn enter(&self, op: &'static str) -> Result<BusyGuard<'_>> {
        self.busy.try_acquire().map_err(|err| {
            warn!(pair = %self.address, op, "re-entrant call refused");
            err
        })
    }

    fn snapshot_state(&self) -> PairState {
        *self.state.lock()
    }

    fn balances<L: AssetLedger + ?Sized>(&self, ledger: &L) -> (Amount, Amount) {
        (
            ledger.balance_of(&self.token_pair.first(), &self.address),
            ledger.balance_of(&self.token_pair.second(), &self.address),
        )
    }

    fn check_invariant(
        &self,
        (balance_a, balance_b): (Amount, Amount),
        (amount_a_in, amount_b_in): (Amount, Amount),
        reserves: &Reserves,
    ) -> Result<()> {
        let scale = U256::from(BPS_SCALE);
        let fee = U256::from(self.config.fee_tier().numerator());
        let adjusted = |balance: Amount, paid: Amount| {
            (U256::from(balance.get()) * scale)
                .checked_sub(U256::from(paid.get()) * fee)
                .ok_or(AmmError::Underflow("fee exceeds adjusted balance"))
        };
        let after = full_mul(adjusted(balance_a, amount_a_in)?, adjusted(balance_b, amount_b_in)?);
        let k = U256::from(reserves.reserve_a().get()) * U256::from(reserves.reserve_b().get());
        let before = full_mul(k, scale * scale);
        if after < before {
            warn!(
                pair = %self.address,
                %amount_a_in,
                %amount_b_in,
                "swap rejected: fee-adjusted product below reserve product"
            );
            return Err(AmmError::InvariantViolated);
        }
        Ok(())
    }

    fn sync_event(&self, reserves: &Reserves) -> PairEvent {
        PairEvent::Sync {
            pair: self.address,
            reserve_a: reserves.amount_a(),
            reserve_b: reserves.amount_b(),
        }
    }

    fn publish<H: Host + ?Sized>(&self, host: &mut H, next: PairState, event: PairEvent) {
        *self.state.lock() = next;
        host.emit(self.sync_event(&next.reserves));
        host.emit(event);
    }
}
