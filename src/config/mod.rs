//! Declarative pair configuration.
//!
//! A [`PairConfig`] is handed to the registry once and applied to every
//! pair it creates.  The defaults reproduce the reference venue: a 0.30%
//! swap fee and 1 000 claims locked on first provision.

mod pair_config;

pub use pair_config::{PairConfig, MINIMUM_LIQUIDITY};
