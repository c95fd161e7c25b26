//! Create-if-absent registry of pairs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::config::PairConfig;
use crate::domain::{Address, TokenPair};
use crate::error::{AmmError, Result};
use crate::pair::Pair;
use crate::traits::PairLookup;

/// Domain tag hashed in front of the asset ids when deriving pair addresses.
pub const PAIR_ADDRESS_TAG: &[u8] = b"cp-amm/pair/v1";

/// Ledger address of the pair trading `token_pair`.
///
/// `Keccak-256(tag ‖ first ‖ second)`.  Depends only on the canonically
/// ordered assets, so both orders give the same address.
#[must_use]
pub fn pair_address(token_pair: &TokenPair) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(PAIR_ADDRESS_TAG);
    hasher.update(token_pair.first().as_bytes());
    hasher.update(token_pair.second().as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Address::from_bytes(bytes)
}

#[derive(Debug, Default)]
struct Index {
    by_assets: HashMap<TokenPair, Arc<Pair>>,
    ordered: Vec<Arc<Pair>>,
}

/// Process-wide set of pairs, one per unordered asset set.
///
/// Creation holds the write lock across the existence check and the
/// insert, so concurrent attempts for the same assets yield exactly one
/// pair and one [`AmmError::PairExists`].
#[derive(Debug, Default)]
pub struct PairRegistry {
    config: PairConfig,
    inner: RwLock<Index>,
}

impl PairRegistry {
    /// Creates an empty registry whose pairs use `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: PairConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            inner: RwLock::new(Index::default()),
        })
    }

    /// Configuration applied to every pair.
    #[must_use]
    pub const fn config(&self) -> PairConfig {
        self.config
    }

    /// Creates the pair for `x` and `y`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] or [`AmmError::ZeroAddress`] for
    ///   invalid ids.
    /// - [`AmmError::PairExists`] if the pair is already registered.
    pub fn create_pair(&self, x: Address, y: Address) -> Result<Arc<Pair>> {
        let token_pair = TokenPair::new(x, y)?;
        let mut index = self.inner.write();
        if index.by_assets.contains_key(&token_pair) {
            return Err(AmmError::PairExists);
        }
        Ok(self.insert(&mut index, token_pair))
    }

    /// Returns the pair for `x` and `y`, creating it if absent.
    ///
    /// # Errors
    ///
    /// [`AmmError::IdenticalAssets`] or [`AmmError::ZeroAddress`].
    pub fn get_or_create_pair(&self, x: Address, y: Address) -> Result<Arc<Pair>> {
        let token_pair = TokenPair::new(x, y)?;
        let mut index = self.inner.write();
        if let Some(existing) = index.by_assets.get(&token_pair) {
            return Ok(Arc::clone(existing));
        }
        Ok(self.insert(&mut index, token_pair))
    }

    /// Looks up the pair for `x` and `y` in either order.
    #[must_use]
    pub fn get_pair(&self, x: Address, y: Address) -> Option<Arc<Pair>> {
        let token_pair = TokenPair::new(x, y).ok()?;
        self.inner.read().by_assets.get(&token_pair).cloned()
    }

    /// Number of registered pairs.
    #[must_use]
    pub fn all_pairs_len(&self) -> usize {
        self.inner.read().ordered.len()
    }

    /// The `index`-th pair in creation order.
    #[must_use]
    pub fn pair_at(&self, index: usize) -> Option<Arc<Pair>> {
        self.inner.read().ordered.get(index).cloned()
    }

    /// Every pair in creation order.
    #[must_use]
    pub fn all_pairs(&self) -> Vec<Arc<Pair>> {
        self.inner.read().ordered.clone()
    }

    fn insert(&self, index: &mut Index, token_pair: TokenPair) -> Arc<Pair> {
        let address = pair_address(&token_pair);
        let pair = Arc::new(Pair::new(address, token_pair, self.config));
        index.by_assets.insert(token_pair, Arc::clone(&pair));
        index.ordered.push(Arc::clone(&pair));
        debug!(
            pair = %address,
            asset_a = %token_pair.first(),
            asset_b = %token_pair.second(),
            total = index.ordered.len(),
            "pair created"
        );
        pair
    }
}

impl PairLookup for PairRegistry {
    fn pair_for(&self, x: &Address, y: &Address) -> Option<Arc<Pair>> {
        self.get_pair(*x, *y)
    }
}
