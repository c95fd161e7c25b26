//! Embedded claim-token ledger.

use std::collections::HashMap;

use crate::domain::{Address, Liquidity};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;

/// Fungible ledger of a pair's claim tokens.
///
/// Owned by the pair by composition.  The sum of all balances always
/// equals [`total_supply`](Self::total_supply): every mutation checks
/// first and writes second, so a failed call changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimLedger {
    total_supply: Liquidity,
    balances: HashMap<Address, Liquidity>,
    // (owner, spender)
    allowances: HashMap<(Address, Address), Liquidity>,
}

impl ClaimLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total claims outstanding.
    #[must_use]
    pub const fn total_supply(&self) -> Liquidity {
        self.total_supply
    }

    /// Claims held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> Liquidity {
        self.balances.get(holder).copied().unwrap_or(Liquidity::ZERO)
    }

    /// Claims `spender` may move out of `owner`'s balance.
    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Liquidity {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Liquidity::ZERO)
    }

    /// Issues new claims to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the total supply would overflow.
    pub fn mint(&mut self, to: &Address, amount: Liquidity) -> Result<()> {
        let total = self.total_supply.safe_add(&amount)?;
        // Bounded by the total, so this cannot overflow once the total did not.
        let balance = self.balance_of(to).safe_add(&amount)?;
        self.total_supply = total;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Destroys claims held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if `from` holds fewer than `amount`.
    pub fn burn(&mut self, from: &Address, amount: Liquidity) -> Result<()> {
        let balance = self.balance_of(from).safe_sub(&amount)?;
        let total = self.total_supply.safe_sub(&amount)?;
        self.total_supply = total;
        self.set_balance(from, balance);
        Ok(())
    }

    /// Moves claims between holders.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds fewer than
    /// `amount`.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Liquidity) -> Result<()> {
        let debited = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.set_balance(from, debited);
        let credited = self.balance_of(to).safe_add(&amount)?;
        self.set_balance(to, credited);
        Ok(())
    }

    /// Sets `spender`'s allowance over `owner`'s claims.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Liquidity) {
        self.allowances.insert((*owner, *spender), amount);
    }

    /// Moves claims on behalf of `spender`, consuming its allowance.
    ///
    /// An allowance of [`Liquidity::MAX`] is never decremented.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `from` holds too little.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Liquidity,
    ) -> Result<()> {
        let allowance = self.allowance(from, spender);
        let remaining = if allowance == Liquidity::MAX {
            allowance
        } else {
            allowance
                .checked_sub(&amount)
                .ok_or(AmmError::InsufficientAllowance)?
        };
        if self.balance_of(from) < amount {
            return Err(AmmError::InsufficientBalance);
        }
        self.transfer(from, to, amount)?;
        self.approve(from, spender, remaining);
        Ok(())
    }

    fn set_balance(&mut self, holder: &Address, amount: Liquidity) {
        if amount.is_zero() {
            self.balances.remove(holder);
        } else {
            self.balances.insert(*holder, amount);
        }
    }
}
