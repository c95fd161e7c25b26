//! Locating pairs by asset ids.

use std::sync::Arc;

use crate::domain::Address;
use crate::pair::Pair;

/// Resolves an unordered asset set to its pair.
///
/// Quoting and routing only need this one capability, so they depend on
/// the trait rather than on [`PairRegistry`](crate::registry::PairRegistry)
/// directly.
///
/// # Contract
///
/// - `pair_for(x, y)` and `pair_for(y, x)` return the same instance.
/// - Identical or null ids resolve to `None`, never to an error.
pub trait PairLookup {
    /// Returns the pair trading `x` against `y`, if one exists.
    fn pair_for(&self, x: &Address, y: &Address) -> Option<Arc<Pair>>;
}
