//! # cp-amm
//!
//! Constant-product automated market maker: a two-asset pair engine with
//! fungible liquidity claims, time-weighted cumulative price accumulators,
//! a registry of pairs and a router for multi-hop trades.
//!
//! Pairs never hold assets themselves.  Every balance lives in an external
//! ledger reached through the [`Host`](host::Host) trait, which also
//! supplies the clock, collects [`PairEvent`](pair::PairEvent)s and
//! provides checkpoints so that each operation is all-or-nothing.
//! [`MemoryHost`](host::MemoryHost) is an in-process implementation for
//! tests and simulations.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cp_amm::domain::{Address, Amount};
//! use cp_amm::host::MemoryHost;
//! use cp_amm::quote::DepositAmounts;
//! use cp_amm::registry::PairRegistry;
//! use cp_amm::router::Router;
//!
//! let (usdc, weth) = (Address::repeat_byte(1), Address::repeat_byte(2));
//! let alice = Address::repeat_byte(0xa1);
//!
//! let mut host = MemoryHost::new(1_700_000_000);
//! host.mint(&usdc, &alice, Amount::new(1_000_000)).expect("faucet");
//! host.mint(&weth, &alice, Amount::new(1_000_000)).expect("faucet");
//!
//! let router = Router::new(Arc::new(PairRegistry::default()), Address::repeat_byte(0xf0));
//! host.approve(&usdc, &alice, &router.address(), Amount::MAX);
//! host.approve(&weth, &alice, &router.address(), Amount::MAX);
//!
//! // 1. Seed the pair; the first provider sets the price.
//! let request = DepositAmounts::exact(Amount::new(100_000), Amount::new(50_000));
//! let added = router
//!     .add_liquidity(&mut host, &alice, usdc, weth, &request, &alice, u64::MAX)
//!     .expect("first provision");
//! assert_eq!(added.liquidity.get(), 69_710);
//!
//! // 2. Sell 1 000 USDC for WETH.
//! let amounts = router
//!     .swap_exact_tokens_for_tokens(
//!         &mut host, &alice, Amount::new(1_000), Amount::ZERO, &[usdc, weth], &alice, u64::MAX,
//!     )
//!     .expect("swap");
//! assert!(amounts[1].get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │    Router     │   │  TwapGuard    │  periphery: slippage, deadlines, windows
//! └──────┬───────┘   └──────┬───────┘
//!        │ quote / registry   │ observations
//!        ▼                    ▼
//! ┌──────────────────────────────────┐
//! │   PairRegistry ─► Pair engine     │  reserves, claims, accumulators
//! └──────────────┬───────────────────┘
//!                │ Host (ledger, clock, events, checkpoints)
//!                ▼
//! ┌──────────────────────────────────┐
//! │   MemoryHost or an embedding      │
//! └──────────────────────────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`Reserve`](domain::Reserve), etc. |
//! | [`math`] | Checked arithmetic, 256/512-bit helpers, UQ112x112 fixed point |
//! | [`config`] | [`PairConfig`](config::PairConfig): fee and locked minimum |
//! | [`host`] | Ledger/clock/event seam and the in-memory [`MemoryHost`](host::MemoryHost) |
//! | [`pair`] | The [`Pair`](pair::Pair) engine: `mint`, `burn`, `swap`, `sync`, `skim` |
//! | [`quote`] | Pure quoting and the deposit ratio solver |
//! | [`registry`] | [`PairRegistry`](registry::PairRegistry): creation and lookup |
//! | [`router`] | [`Router`](router::Router): deadline and slippage checked periphery |
//! | [`guard`] | [`TwapGuard`](guard::TwapGuard): execution against windowed mean prices |
//! | [`traits`] | [`PairLookup`](traits::PairLookup) seam used by multi-hop quoting |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod guard;
pub mod host;
pub mod math;
pub mod pair;
pub mod prelude;
pub mod quote;
pub mod registry;
pub mod router;
pub mod traits;
