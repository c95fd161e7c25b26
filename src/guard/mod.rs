//! TWAP guard for order-execution consumers.
//!
//! The guard stores one [`Observation`] per pair and only executes a trade
//! once a caller-chosen window has elapsed since that observation.  The
//! output is capped by both the time-weighted mean price over the window
//! and the current spot quote, so a spot price distorted within the same
//! block cannot inflate the result.

mod twap;

pub use twap::{Observation, TwapGuard, WindowedTrade};
