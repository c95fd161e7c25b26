//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use cp_amm::prelude::*;
//! ```

pub use crate::config::{PairConfig, MINIMUM_LIQUIDITY};
pub use crate::domain::{
    Address, Amount, BasisPoints, FeeTier, Liquidity, Reserve, Rounding, SwapDirection, Timestamp,
    TokenPair,
};
pub use crate::error::{AmmError, Result};
pub use crate::guard::{TwapGuard, WindowedTrade};
pub use crate::host::{AssetLedger, Clock, EventSink, Host, MemoryHost};
pub use crate::math::CheckedArithmetic;
pub use crate::pair::{Pair, PairEvent, Reserves};
pub use crate::quote::{get_amount_in, get_amount_out, get_amounts_in, get_amounts_out, quote};
pub use crate::registry::PairRegistry;
pub use crate::router::Router;
pub use crate::traits::PairLookup;
