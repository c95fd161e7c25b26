//! Pair registry.
//!
//! The registry is the only place pairs are created.  It owns a single
//! [`PairConfig`](crate::config::PairConfig) applied to every pair, derives
//! each pair's ledger address deterministically from its assets, and
//! answers lookups in either asset order.
//!
//! ```rust
//! use cp_amm::domain::Address;
//! use cp_amm::registry::PairRegistry;
//!
//! let registry = PairRegistry::default();
//! let (x, y) = (Address::repeat_byte(1), Address::repeat_byte(2));
//!
//! let created = registry.create_pair(y, x).expect("new pair");
//! let found = registry.get_pair(x, y).expect("registered");
//! assert_eq!(created.address(), found.address());
//! assert!(registry.create_pair(x, y).is_err());
//! ```

mod pair_registry;

pub use pair_registry::{pair_address, PairRegistry, PAIR_ADDRESS_TAG};
