//! In-memory reference host.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::{AssetLedger, Checkpoint, Clock, EventSink};
use crate::domain::{Address, Amount};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;
use crate::pair::PairEvent;

/// One asset movement, as seen by a [`TransferHook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Asset being moved.
    pub asset: Address,
    /// Debited holder.
    pub from: Address,
    /// Credited holder.
    pub to: Address,
    /// Quantity moved.
    pub amount: Amount,
}

/// Custom asset logic run after a balance has moved.
///
/// The hook receives the host mutably, so it can call back into a pair
/// while that pair is mid-operation.  Returning `Err` fails the transfer
/// and unwinds the balance change.
pub trait TransferHook: Send + Sync {
    /// Called once per successful balance movement of the hooked asset.
    ///
    /// # Errors
    ///
    /// Any error aborts the transfer that triggered the hook.
    fn on_transfer(&self, host: &mut MemoryHost, transfer: &Transfer) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
struct Book {
    balances: HashMap<(Address, Address), Amount>,
    // (asset, owner, spender)
    allowances: HashMap<(Address, Address, Address), Amount>,
}

#[derive(Debug)]
struct Snapshot {
    book: Book,
    events: usize,
}

/// A complete [`Host`](super::Host) kept in process memory.
///
/// Balances and allowances are plain maps.  Every open checkpoint stores a
/// copy of both, which keeps rollback trivially correct at the cost of
/// memory proportional to the nesting depth; fine for tests and
/// simulations, not meant for production ledgers.
///
/// An allowance of [`Amount::MAX`] is never decremented.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::{Address, Amount};
/// use cp_amm::host::{AssetLedger, MemoryHost};
///
/// let usdc = Address::repeat_byte(1);
/// let alice = Address::repeat_byte(0xa1);
/// let bob = Address::repeat_byte(0xb0);
///
/// let mut host = MemoryHost::new(1_700_000_000);
/// host.mint(&usdc, &alice, Amount::new(500)).expect("faucet");
/// host.transfer(&usdc, &alice, &bob, Amount::new(200)).expect("funded");
///
/// assert_eq!(host.balance_of(&usdc, &alice), Amount::new(300));
/// assert_eq!(host.balance_of(&usdc, &bob), Amount::new(200));
/// ```
#[derive(Default)]
pub struct MemoryHost {
    book: Book,
    now: u64,
    events: Vec<PairEvent>,
    hooks: HashMap<Address, Arc<dyn TransferHook>>,
    journal: Vec<Snapshot>,
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHost")
            .field("now", &self.now)
            .field("balances", &self.book.balances.len())
            .field("allowances", &self.book.allowances.len())
            .field("events", &self.events.len())
            .field("hooks", &self.hooks.len())
            .field("journal_depth", &self.journal.len())
            .finish()
    }
}

impl MemoryHost {
    /// Creates an empty host whose clock reads `now`.
    #[must_use]
    pub fn new(now: u64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    // -- faucet and allowances -----------------------------------------------

    /// Credits `amount` of `asset` to `holder` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would exceed `u128`.
    pub fn mint(&mut self, asset: &Address, holder: &Address, amount: Amount) -> Result<()> {
        let balance = self.balance_of(asset, holder).safe_add(&amount)?;
        self.set_balance(asset, holder, balance);
        Ok(())
    }

    /// Sets the allowance `spender` may move out of `owner`'s balance.
    pub fn approve(&mut self, asset: &Address, owner: &Address, spender: &Address, amount: Amount) {
        self.book.allowances.insert((*asset, *owner, *spender), amount);
    }

    /// Remaining allowance of `spender` over `owner`'s `asset`.
    #[must_use]
    pub fn allowance(&self, asset: &Address, owner: &Address, spender: &Address) -> Amount {
        self.book
            .allowances
            .get(&(*asset, *owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    // -- clock ---------------------------------------------------------------

    /// Moves the clock to `now`.  Going backwards is allowed.
    pub fn set_time(&mut self, now: u64) {
        self.now = now;
    }

    /// Moves the clock forward by `secs`.
    pub fn advance_time(&mut self, secs: u64) {
        self.now = self.now.saturating_add(secs);
    }

    // -- events --------------------------------------------------------------

    /// Events emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[PairEvent] {
        &self.events
    }

    /// Drains the event log.
    pub fn take_events(&mut self) -> Vec<PairEvent> {
        std::mem::take(&mut self.events)
    }

    // -- hooks ---------------------------------------------------------------

    /// Installs custom logic on every transfer of `asset`.
    pub fn set_hook(&mut self, asset: Address, hook: Arc<dyn TransferHook>) {
        self.hooks.insert(asset, hook);
    }

    /// Removes the hook on `asset`, if any.
    pub fn clear_hook(&mut self, asset: &Address) {
        self.hooks.remove(asset);
    }

    // -- internals -----------------------------------------------------------

    fn set_balance(&mut self, asset: &Address, holder: &Address, amount: Amount) {
        if amount.is_zero() {
            self.book.balances.remove(&(*asset, *holder));
        } else {
            self.book.balances.insert((*asset, *holder), amount);
        }
    }

    fn move_balance(&mut self, transfer: &Transfer) -> Result<()> {
        let debited = self
            .balance_of(&transfer.asset, &transfer.from)
            .checked_sub(&transfer.amount)
            .ok_or(AmmError::InsufficientBalance)?;
        self.set_balance(&transfer.asset, &transfer.from, debited);
        let credited = self
            .balance_of(&transfer.asset, &transfer.to)
            .safe_add(&transfer.amount)?;
        self.set_balance(&transfer.asset, &transfer.to, credited);
        Ok(())
    }

    fn spend_allowance(
        &mut self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<()> {
        let current = self.allowance(asset, owner, spender);
        if current == Amount::MAX {
            return Ok(());
        }
        let remaining = current
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientAllowance)?;
        self.approve(asset, owner, spender, remaining);
        Ok(())
    }

    fn run_transfer(&mut self, transfer: &Transfer) -> Result<()> {
        self.move_balance(transfer)?;
        trace!(
            asset = %transfer.asset,
            from = %transfer.from,
            to = %transfer.to,
            amount = %transfer.amount,
            "transfer"
        );
        // Cloned out so the hook may borrow the host mutably.
        let hook = self.hooks.get(&transfer.asset).cloned();
        match hook {
            Some(hook) => hook.on_transfer(self, transfer),
            None => Ok(()),
        }
    }

    fn scoped(&mut self, op: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let checkpoint = self.checkpoint();
        match op(self) {
            Ok(()) => {
                self.commit(checkpoint);
                Ok(())
            }
            Err(err) => {
                self.rollback(checkpoint);
                Err(err)
            }
        }
    }
}

impl AssetLedger for MemoryHost {
    fn balance_of(&self, asset: &Address, holder: &Address) -> Amount {
        self.book
            .balances
            .get(&(*asset, *holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        let transfer = Transfer {
            asset: *asset,
            from: *from,
            to: *to,
            amount,
        };
        self.scoped(|host| host.run_transfer(&transfer))
    }

    fn transfer_from(
        &mut self,
        asset: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        let transfer = Transfer {
            asset: *asset,
            from: *from,
            to: *to,
            amount,
        };
        self.scoped(|host| {
            host.spend_allowance(asset, from, spender, amount)?;
            host.run_transfer(&transfer)
        })
    }

    fn checkpoint(&mut self) -> Checkpoint {
        let depth = self.journal.len();
        self.journal.push(Snapshot {
            book: self.book.clone(),
            events: self.events.len(),
        });
        Checkpoint::new(depth)
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.journal.truncate(checkpoint.depth());
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.journal.truncate(checkpoint.depth().saturating_add(1));
        if self.journal.len() != checkpoint.depth().saturating_add(1) {
            return;
        }
        if let Some(snapshot) = self.journal.pop() {
            self.book = snapshot.book;
            self.events.truncate(snapshot.events);
        }
    }
}

impl Clock for MemoryHost {
    fn now(&self) -> u64 {
        self.now
    }
}

impl EventSink for MemoryHost {
    fn emit(&mut self, event: PairEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn asset() -> Address {
        Address::repeat_byte(1)
    }

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xb0)
    }

    fn funded() -> MemoryHost {
        let mut host = MemoryHost::new(1_000);
        let Ok(()) = host.mint(&asset(), &alice(), Amount::new(1_000)) else {
            panic!("faucet");
        };
        host
    }

    // -- transfers -----------------------------------------------------------

    #[test]
    fn transfer_moves_balance() {
        let mut host = funded();
        let Ok(()) = host.transfer(&asset(), &alice(), &bob(), Amount::new(400)) else {
            panic!("expected Ok");
        };
        assert_eq!(host.balance_of(&asset(), &alice()), Amount::new(600));
        assert_eq!(host.balance_of(&asset(), &bob()), Amount::new(400));
    }

    #[test]
    fn transfer_beyond_balance_fails() {
        let mut host = funded();
        assert_eq!(
            host.transfer(&asset(), &alice(), &bob(), Amount::new(1_001)),
            Err(AmmError::InsufficientBalance)
        );
        assert_eq!(host.balance_of(&asset(), &alice()), Amount::new(1_000));
    }

    #[test]
    fn self_transfer_is_neutral() {
        let mut host = funded();
        let Ok(()) = host.transfer(&asset(), &alice(), &alice(), Amount::new(1_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(host.balance_of(&asset(), &alice()), Amount::new(1_000));
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut host = funded();
        host.approve(&asset(), &alice(), &bob(), Amount::new(300));
        let Ok(()) = host.transfer_from(&asset(), &bob(), &alice(), &bob(), Amount::new(200))
        else {
            panic!("expected Ok");
        };
        assert_eq!(host.allowance(&asset(), &alice(), &bob()), Amount::new(100));
        assert_eq!(
            host.transfer_from(&asset(), &bob(), &alice(), &bob(), Amount::new(200)),
            Err(AmmError::InsufficientAllowance)
        );
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let mut host = funded();
        host.approve(&asset(), &alice(), &bob(), Amount::MAX);
        let Ok(()) = host.transfer_from(&asset(), &bob(), &alice(), &bob(), Amount::new(500))
        else {
            panic!("expected Ok");
        };
        assert_eq!(host.allowance(&asset(), &alice(), &bob()), Amount::MAX);
    }

    #[test]
    fn failed_transfer_from_keeps_allowance() {
        let mut host = funded();
        host.approve(&asset(), &alice(), &bob(), Amount::new(5_000));
        assert_eq!(
            host.transfer_from(&asset(), &bob(), &alice(), &bob(), Amount::new(2_000)),
            Err(AmmError::InsufficientBalance)
        );
        assert_eq!(host.allowance(&asset(), &alice(), &bob()), Amount::new(5_000));
    }

    // -- journal -------------------------------------------------------------

    #[test]
    fn rollback_restores_balances_and_events() {
        let mut host = funded();
        let cp = host.checkpoint();
        let Ok(()) = host.transfer(&asset(), &alice(), &bob(), Amount::new(10)) else {
            panic!("expected Ok");
        };
        host.emit(PairEvent::Sync {
            pair: Address::repeat_byte(9),
            reserve_a: Amount::new(1),
            reserve_b: Amount::new(1),
        });
        host.rollback(cp);
        assert_eq!(host.balance_of(&asset(), &bob()), Amount::ZERO);
        assert!(host.events().is_empty());
    }

    #[test]
    fn nested_commit_then_outer_rollback() {
        let mut host = funded();
        let outer = host.checkpoint();
        let inner = host.checkpoint();
        let Ok(()) = host.transfer(&asset(), &alice(), &bob(), Amount::new(10)) else {
            panic!("expected Ok");
        };
        host.commit(inner);
        assert_eq!(host.balance_of(&asset(), &bob()), Amount::new(10));
        host.rollback(outer);
        assert_eq!(host.balance_of(&asset(), &bob()), Amount::ZERO);
    }

    // -- hooks ---------------------------------------------------------------

    struct Counting(AtomicUsize);

    impl TransferHook for Counting {
        fn on_transfer(&self, _host: &mut MemoryHost, _transfer: &Transfer) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Refusing;

    impl TransferHook for Refusing {
        fn on_transfer(&self, _host: &mut MemoryHost, _transfer: &Transfer) -> Result<()> {
            Err(AmmError::TransferFailed("refused by asset"))
        }
    }

    #[test]
    fn hook_runs_per_transfer() {
        let mut host = funded();
        let hook = Arc::new(Counting(AtomicUsize::new(0)));
        host.set_hook(asset(), hook.clone());
        for _ in 0..3 {
            let Ok(()) = host.transfer(&asset(), &alice(), &bob(), Amount::new(1)) else {
                panic!("expected Ok");
            };
        }
        assert_eq!(hook.0.load(Ordering::SeqCst), 3);
        host.clear_hook(&asset());
        let Ok(()) = host.transfer(&asset(), &alice(), &bob(), Amount::new(1)) else {
            panic!("expected Ok");
        };
        assert_eq!(hook.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn failing_hook_unwinds_transfer() {
        let mut host = funded();
        host.set_hook(asset(), Arc::new(Refusing));
        assert_eq!(
            host.transfer(&asset(), &alice(), &bob(), Amount::new(1)),
            Err(AmmError::TransferFailed("refused by asset"))
        );
        assert_eq!(host.balance_of(&asset(), &alice()), Amount::new(1_000));
    }

    #[test]
    fn clock() {
        let mut host = MemoryHost::new(10);
        host.advance_time(5);
        assert_eq!(host.now(), 15);
        host.set_time(3);
        assert_eq!(host.now(), 3);
    }
}
