//! Trade direction across a pair.

use serde::{Deserialize, Serialize};

/// Which asset a trade sells into the pair.
///
/// `AToB` sells the lower-ordered asset and buys the higher one; its
/// time-weighted price is read from the pair's first cumulative
/// accumulator.  `BToA` is the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell asset A, receive asset B.
    AToB,
    /// Sell asset B, receive asset A.
    BToA,
}

impl SwapDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        match self {
            Self::AToB => Self::BToA,
            Self::BToA => Self::AToB,
        }
    }
}
