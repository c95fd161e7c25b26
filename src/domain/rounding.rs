//! Explicit rounding direction for division.

/// Rounding direction for every division performed on domain values.
///
/// The engine always rounds against the caller: amounts paid out round
/// [`Down`](Rounding::Down), fees taken round [`Up`](Rounding::Up).
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(!Rounding::Down.is_up());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}
