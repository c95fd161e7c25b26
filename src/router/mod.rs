//! Periphery router.
//!
//! A thin layer over the engine that performs the two-step deposit/call
//! patterns on behalf of a user: pulling assets with allowances, chaining
//! swaps through a path where each pair pays the next directly, and
//! enforcing caller minimums and deadlines.
//!
//! Every router call is all-or-nothing across every pair it touches.

mod periphery;

pub use periphery::{AddedLiquidity, Router};
