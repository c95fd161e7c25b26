//! Chain-agnostic 32-byte identifier for assets, holders and pairs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte identifier naming an asset, an account or a pair.
///
/// Assets, holders and pairs share one identifier space: a pair's own
/// address is also the holder under which the asset ledger custodies its
/// reserves.  The all-zero value is the *null* identifier; it is never a
/// valid asset and doubles as the unrecoverable sink for locked claims.
///
/// Ordering is lexicographic over the bytes, which gives the canonical
/// total order used to sort pair assets.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(!addr.is_zero());
/// assert!(Address::ZERO < addr);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// The null identifier.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Builds an address whose every byte is `byte`.
    ///
    /// Handy for fixtures and well-known actors.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 32])
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` for the null identifier.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}..{}",
            hex::encode(&self.0[..4]),
            hex::encode(&self.0[28..])
        )
    }
}
