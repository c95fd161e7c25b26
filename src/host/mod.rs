//! Collaborator interfaces the pair engine consumes from its host.
//!
//! The engine owns no asset balances itself.  It asks an [`AssetLedger`]
//! for the balances custodied under the pair's address, moves assets
//! through it, and relies on its journal to make each operation
//! all-or-nothing.  A [`Clock`] supplies the current time and an
//! [`EventSink`] receives indexing events after an operation commits.
//!
//! [`MemoryHost`] is a complete in-memory implementation used by the tests
//! and suitable for simulations.

mod memory;

pub use memory::{MemoryHost, Transfer, TransferHook};

use crate::domain::{Address, Amount};
use crate::error::{AmmError, Result};
use crate::pair::PairEvent;

/// Opaque marker returned by [`AssetLedger::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Wraps a journal depth.
    pub const fn new(depth: usize) -> Self {
        Self(depth)
    }

    /// Journal depth this checkpoint refers to.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.0
    }
}

/// Fungible asset ledger with a nested journal.
///
/// Transfers are expressed from the point of view of the ledger: `from` is
/// whoever is debited.  A transfer that fails must leave no trace, whether
/// it failed on balance, allowance or inside the asset's own logic.
///
/// Checkpoints nest: every `checkpoint` must be closed by exactly one
/// `commit` or `rollback`, innermost first.
pub trait AssetLedger {
    /// Balance of `asset` held by `holder`.
    fn balance_of(&self, asset: &Address, holder: &Address) -> Amount;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientBalance`] or [`AmmError::TransferFailed`];
    /// implementations may surface any error raised by the asset itself.
    fn transfer(&mut self, asset: &Address, from: &Address, to: &Address, amount: Amount)
        -> Result<()>;

    /// Moves `amount` of `asset` from `from` to `to` on behalf of `spender`,
    /// consuming `spender`'s allowance.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientAllowance`] plus everything
    /// [`transfer`](Self::transfer) can return.
    fn transfer_from(
        &mut self,
        asset: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()>;

    /// Opens a journal scope.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Closes a scope keeping its effects.
    fn commit(&mut self, checkpoint: Checkpoint);

    /// Closes a scope discarding every effect since it was opened.
    fn rollback(&mut self, checkpoint: Checkpoint);
}

/// Source of the current time, in Unix seconds.
pub trait Clock {
    /// Current time.
    fn now(&self) -> u64;
}

/// Receiver of committed pair events.
pub trait EventSink {
    /// Delivers one event.
    fn emit(&mut self, event: PairEvent);
}

/// Everything the engine needs from its execution environment.
pub trait Host: AssetLedger + Clock + EventSink {}

impl<T: AssetLedger + Clock + EventSink + ?Sized> Host for T {}

/// Runs `op` inside a journal scope, committing on `Ok` and rolling back on `Err`.
pub(crate) fn atomically<H, T, F>(host: &mut H, op: F) -> Result<T>
where
    H: Host + ?Sized,
    F: FnOnce(&mut H) -> Result<T>,
{
    let checkpoint = host.checkpoint();
    match op(host) {
        Ok(value) => {
            host.commit(checkpoint);
            Ok(value)
        }
        Err(err) => {
            host.rollback(checkpoint);
            Err(err)
        }
    }
}

/// Rejects a call whose `deadline` is already in the past.
///
/// # Errors
///
/// Returns [`AmmError::Expired`] if `now > deadline`.
pub fn ensure_deadline<C: Clock + ?Sized>(clock: &C, deadline: u64) -> Result<()> {
    if clock.now() > deadline {
        return Err(AmmError::Expired);
    }
    Ok(())
}
