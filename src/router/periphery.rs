//! Router operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Address, Amount, Liquidity};
use crate::error::{AmmError, Result};
use crate::host::{atomically, ensure_deadline, Host};
use crate::pair::Pair;
use crate::quote::{get_amounts_in, get_amounts_out, optimal_deposit, DepositAmounts};
use crate::registry::PairRegistry;

/// Outcome of [`Router::add_liquidity`].
///
/// `amount_x` and `amount_y` follow the asset order the caller passed,
/// not the pair's canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedLiquidity {
    /// Deposited amount of the first asset argument.
    pub amount_x: Amount,
    /// Deposited amount of the second asset argument.
    pub amount_y: Amount,
    /// Claims issued.
    pub liquidity: Liquidity,
}

/// User-facing entry point composing registry, quoting and engine.
///
/// The router acts from its own ledger [`address`](Self::address): users
/// approve that address as a spender of their assets (and of their claims
/// for [`remove_liquidity`](Self::remove_liquidity)).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use cp_amm::domain::{Address, Amount, Liquidity};
/// use cp_amm::host::{AssetLedger, MemoryHost};
/// use cp_amm::quote::DepositAmounts;
/// use cp_amm::registry::PairRegistry;
/// use cp_amm::router::Router;
///
/// let (x, y) = (Address::repeat_byte(1), Address::repeat_byte(2));
/// let user = Address::repeat_byte(0x42);
/// let router = Router::new(Arc::new(PairRegistry::default()), Address::repeat_byte(0x99));
///
/// let mut host = MemoryHost::new(1_000);
/// for asset in [x, y] {
///     host.mint(&asset, &user, Amount::new(1_000_000)).expect("faucet");
///     host.approve(&asset, &user, &router.address(), Amount::MAX);
/// }
///
/// let request = DepositAmounts::exact(Amount::new(100_000), Amount::new(50_000));
/// let added = router
///     .add_liquidity(&mut host, &user, x, y, &request, &user, 2_000)
///     .expect("provision");
/// assert_eq!(added.liquidity, Liquidity::new(69_710));
///
/// let amounts = router
///     .swap_exact_tokens_for_tokens(&mut host, &user, Amount::new(1_000), Amount::new(1), &[x, y], &user, 2_000)
///     .expect("swap");
/// assert_eq!(amounts[0], Amount::new(1_000));
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<PairRegistry>,
    address: Address,
}

impl Router {
    /// Creates a router over `registry`, acting from `address`.
    #[must_use]
    pub const fn new(registry: Arc<PairRegistry>, address: Address) -> Self {
        Self { registry, address }
    }

    /// Ledger address the router spends from.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The registry pairs are created in and looked up from.
    #[must_use]
    pub fn registry(&self) -> &PairRegistry {
        &self.registry
    }

    /// Deposits into the `x`/`y` pair at its current ratio, creating the
    /// pair first if it does not exist.
    ///
    /// Pair creation is not undone if the deposit later fails.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `deadline` has passed.
    /// - Registry, solver, transfer and mint errors.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity<H: Host + ?Sized>(
        &self,
        host: &mut H,
        provider: &Address,
        x: Address,
        y: Address,
        request: &DepositAmounts,
        to: &Address,
        deadline: u64,
    ) -> Result<AddedLiquidity> {
        ensure_deadline(&*host, deadline)?;
        let pair = self.registry.get_or_create_pair(x, y)?;
        let (reserve_x, reserve_y) = pair.reserves_for(&x)?;
        let (amount_x, amount_y) = optimal_deposit(request, reserve_x, reserve_y)?;

        let liquidity = self.transact(host, &[Arc::clone(&pair)], |host| {
            host.transfer_from(&x, &self.address, provider, &pair.address(), amount_x)?;
            host.transfer_from(&y, &self.address, provider, &pair.address(), amount_y)?;
            pair.mint(host, &self.address, to)
        })?;

        debug!(pair = %pair.address(), %amount_x, %amount_y, %liquidity, "liquidity added");
        Ok(AddedLiquidity {
            amount_x,
            amount_y,
            liquidity,
        })
    }

    /// Redeems `liquidity` claims of `provider` for both assets.
    ///
    /// Returns `(amount_x, amount_y)` in the caller's asset order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `deadline` has passed.
    /// - [`AmmError::PairNotFound`] if no pair exists.
    /// - [`AmmError::InsufficientAmountA`] / [`AmmError::InsufficientAmountB`]
    ///   if a payout is below `min_x` / `min_y`.
    /// - Claim allowance and burn errors.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity<H: Host + ?Sized>(
        &self,
        host: &mut H,
        provider: &Address,
        x: Address,
        y: Address,
        liquidity: Liquidity,
        (min_x, min_y): (Amount, Amount),
        to: &Address,
        deadline: u64,
    ) -> Result<(Amount, Amount)> {
        ensure_deadline(&*host, deadline)?;
        let pair = self.registry.get_pair(x, y).ok_or(AmmError::PairNotFound)?;

        let (amount_x, amount_y) = self.transact(host, &[Arc::clone(&pair)], |host| {
            pair.transfer_claims_from(&self.address, provider, &pair.address(), liquidity)?;
            let (amount_a, amount_b) = pair.burn(host, &self.address, to)?;
            let (amount_x, amount_y) = if x == pair.token_pair().first() {
                (amount_a, amount_b)
            } else {
                (amount_b, amount_a)
            };
            if amount_x < min_x {
                return Err(AmmError::InsufficientAmountA);
            }
            if amount_y < min_y {
                return Err(AmmError::InsufficientAmountB);
            }
            Ok((amount_x, amount_y))
        })?;

        debug!(pair = %pair.address(), %liquidity, %amount_x, %amount_y, "liquidity removed");
        Ok((amount_x, amount_y))
    }

    /// Sells exactly `amount_in` of `path[0]` for as much of the last asset
    /// as the route gives, at least `amount_out_min`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `deadline` has passed.
    /// - [`AmmError::InsufficientOutputAmount`] if the route yields too little.
    /// - Path, quoting, transfer and swap errors.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_tokens<H: Host + ?Sized>(
        &self,
        host: &mut H,
        trader: &Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &[Address],
        to: &Address,
        deadline: u64,
    ) -> Result<Vec<Amount>> {
        ensure_deadline(&*host, deadline)?;
        let pairs = self.resolve(path)?;
        let amounts = get_amounts_out(self.registry.as_ref(), amount_in, path)?;
        let amount_out = amounts.last().copied().unwrap_or(Amount::ZERO);
        if amount_out < amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }
        self.execute_route(host, trader, &pairs, &amounts, path, to)?;
        Ok(amounts)
    }

    /// Buys exactly `amount_out` of the last path asset, paying at most
    /// `amount_in_max` of `path[0]`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `deadline` has passed.
    /// - [`AmmError::ExcessiveInputAmount`] if the route needs more input.
    /// - Path, quoting, transfer and swap errors.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_tokens<H: Host + ?Sized>(
        &self,
        host: &mut H,
        trader: &Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &[Address],
        to: &Address,
        deadline: u64,
    ) -> Result<Vec<Amount>> {
        ensure_deadline(&*host, deadline)?;
        let pairs = self.resolve(path)?;
        let amounts = get_amounts_in(self.registry.as_ref(), amount_out, path)?;
        let amount_in = amounts.first().copied().unwrap_or(Amount::MAX);
        if amount_in > amount_in_max {
            return Err(AmmError::ExcessiveInputAmount);
        }
        self.execute_route(host, trader, &pairs, &amounts, path, to)?;
        Ok(amounts)
    }

    // -- internals -----------------------------------------------------------

    fn resolve(&self, path: &[Address]) -> Result<Vec<Arc<Pair>>> {
        if path.len() < 2 {
            return Err(AmmError::InvalidPath("path needs at least two assets"));
        }
        path.windows(2)
            .map(|hop| {
                self.registry
                    .get_pair(hop[0], hop[1])
                    .ok_or(AmmError::PairNotFound)
            })
            .collect()
    }

    fn execute_route<H: Host + ?Sized>(
        &self,
        host: &mut H,
        trader: &Address,
        pairs: &[Arc<Pair>],
        amounts: &[Amount],
        path: &[Address],
        to: &Address,
    ) -> Result<()> {
        self.transact(host, pairs, |host| {
            let (Some(first), Some(amount_in)) = (pairs.first(), amounts.first()) else {
                return Err(AmmError::InvalidPath("empty route"));
            };
            host.transfer_from(&path[0], &self.address, trader, &first.address(), *amount_in)?;

            for (i, pair) in pairs.iter().enumerate() {
                let amount_out = amounts[i + 1];
                let (out_a, out_b) = if path[i] == pair.token_pair().first() {
                    (Amount::ZERO, amount_out)
                } else {
                    (amount_out, Amount::ZERO)
                };
                let recipient = pairs.get(i + 1).map_or(*to, |next| next.address());
                pair.swap(host, &self.address, out_a, out_b, &recipient, &[])?;
            }
            Ok(())
        })?;
        debug!(hops = pairs.len(), %trader, %to, "route executed");
        Ok(())
    }

    /// Runs `op` all-or-nothing across the host ledger and every pair in `pairs`.
    fn transact<H, T, F>(&self, host: &mut H, pairs: &[Arc<Pair>], op: F) -> Result<T>
    where
        H: Host + ?Sized,
        F: FnOnce(&mut H) -> Result<T>,
    {
        let snapshots: Vec<_> = pairs.iter().map(|pair| pair.snapshot()).collect();
        let outcome = atomically(host, op);
        if outcome.is_err() {
            for (pair, snapshot) in pairs.iter().zip(snapshots) {
                pair.restore(snapshot);
            }
        }
        outcome
    }
}
