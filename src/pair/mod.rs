//! The Pair Engine.
//!
//! A [`Pair`] owns its reserve store ([`Reserves`]), its price
//! accumulators ([`PriceAccumulator`]), an embedded [`ClaimLedger`] and a
//! [`BusyFlag`].  It exposes `mint`, `burn`, `swap`, `sync` and `skim`,
//! each all-or-nothing against the host ledger.

mod accumulator;
mod claims;
mod engine;
mod events;
mod lock;
mod reserves;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use accumulator::PriceAccumulator;
pub use claims::ClaimLedger;
pub use engine::Pair;
pub use events::PairEvent;
pub use lock::{BusyFlag, BusyGuard};
pub use reserves::Reserves;
