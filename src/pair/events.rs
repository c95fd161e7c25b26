//! Indexing events emitted by a pair after an operation commits.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, Liquidity};

/// One committed state change, for external indexers.
///
/// Failed operations emit nothing.  A successful `mint`, `burn` or `swap`
/// emits a [`Sync`](PairEvent::Sync) carrying the new reserves followed by
/// its own event; `sync` emits only the former.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairEvent {
    /// Reserves were rewritten.
    Sync {
        /// Pair address.
        pair: Address,
        /// New reserve of the lower asset.
        reserve_a: Amount,
        /// New reserve of the higher asset.
        reserve_b: Amount,
    },
    /// Claims were issued against a deposit.
    Mint {
        /// Pair address.
        pair: Address,
        /// Caller of the operation.
        sender: Address,
        /// Deposited amount of the lower asset.
        amount_a: Amount,
        /// Deposited amount of the higher asset.
        amount_b: Amount,
        /// Claim holder credited.
        to: Address,
        /// Claims issued to `to`.
        liquidity: Liquidity,
    },
    /// Claims were redeemed.
    Burn {
        /// Pair address.
        pair: Address,
        /// Caller of the operation.
        sender: Address,
        /// Withdrawn amount of the lower asset.
        amount_a: Amount,
        /// Withdrawn amount of the higher asset.
        amount_b: Amount,
        /// Recipient of both assets.
        to: Address,
        /// Claims destroyed.
        liquidity: Liquidity,
    },
    /// A trade settled.
    Swap {
        /// Pair address.
        pair: Address,
        /// Caller of the operation.
        sender: Address,
        /// Lower asset paid in.
        amount_a_in: Amount,
        /// Higher asset paid in.
        amount_b_in: Amount,
        /// Lower asset paid out.
        amount_a_out: Amount,
        /// Higher asset paid out.
        amount_b_out: Amount,
        /// Recipient of the outputs.
        to: Address,
    },
}

impl PairEvent {
    /// Address of the pair that emitted the event.
    #[must_use]
    pub const fn pair(&self) -> Address {
        match self {
            Self::Sync { pair, .. }
            | Self::Mint { pair, .. }
            | Self::Burn { pair, .. }
            | Self::Swap { pair, .. } => *pair,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_names_its_pair() {
        let pair = Address::repeat_byte(9);
        let other = Address::repeat_byte(1);
        let events = [
            PairEvent::Sync {
                pair,
                reserve_a: Amount::new(1),
                reserve_b: Amount::new(2),
            },
            PairEvent::Burn {
                pair,
                sender: other,
                amount_a: Amount::new(1),
                amount_b: Amount::new(1),
                to: other,
                liquidity: Liquidity::new(1),
            },
            PairEvent::Swap {
                pair,
                sender: other,
                amount_a_in: Amount::new(10),
                amount_b_in: Amount::ZERO,
                amount_a_out: Amount::ZERO,
                amount_b_out: Amount::new(9),
                to: other,
            },
        ];
        assert!(events.iter().all(|e| e.pair() == pair));
    }
}
