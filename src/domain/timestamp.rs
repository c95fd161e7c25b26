//! Truncated 32-bit timestamps with wrapping differences.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch, truncated to 32 bits.
///
/// The pair only ever needs the *difference* between two timestamps, and
/// that difference is taken modulo `2^32`, so it stays correct across the
/// wrap in 2106 as long as updates are less than ~136 years apart.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Timestamp;
///
/// let before = Timestamp::from_unix(u64::from(u32::MAX) - 9);
/// let after = Timestamp::from_unix(u64::from(u32::MAX) + 21);
/// assert_eq!(after.elapsed_since(before), 30);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u32);

impl Timestamp {
    /// Wraps a raw 32-bit value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Truncates a full Unix time to its low 32 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_unix(secs: u64) -> Self {
        Self((secs % (1u64 << 32)) as u32)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Seconds from `earlier` to `self`, modulo `2^32`.
    #[must_use]
    pub const fn elapsed_since(&self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
