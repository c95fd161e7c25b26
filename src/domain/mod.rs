//! Value types shared by every layer of the engine.
//!
//! All types are small `Copy` newtypes with validated constructors, so an
//! asset id can never be confused with a claim balance and a reserve can
//! never silently exceed its 112-bit width.

mod address;
mod amount;
mod basis_points;
mod direction;
mod fee_tier;
mod liquidity;
mod reserve;
mod rounding;
mod timestamp;
mod token_pair;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::{BasisPoints, BPS_SCALE};
pub use direction::SwapDirection;
pub use fee_tier::FeeTier;
pub use liquidity::Liquidity;
pub use reserve::Reserve;
pub use rounding::Rounding;
pub use timestamp::Timestamp;
pub use token_pair::TokenPair;
