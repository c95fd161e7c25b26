//! Seams between the engine and its periphery.
//!
//! [`PairLookup`] is what the quoting engine and router need from a pair
//! registry.  The engine's own collaborators (asset ledger, clock, event
//! sink) live in [`host`](crate::host).

mod pair_lookup;

pub use pair_lookup::PairLookup;
