//! Single-hop and multi-hop swap amounts.

use primitive_types::{U256, U512};

use crate::domain::{Address, Amount, FeeTier, Rounding, BPS_SCALE};
use crate::error::{AmmError, Result};
use crate::math::{full_mul, mul_div, narrow_wide};
use crate::traits::PairLookup;

/// Converts `amount_a` into the equivalent amount of the other asset at
/// the reserve ratio, rounding down.  No fee is involved.
///
/// # Errors
///
/// - [`AmmError::InsufficientAmount`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::Amount;
/// use cp_amm::quote::quote;
///
/// assert_eq!(
///     quote(Amount::new(10), Amount::new(100), Amount::new(50)),
///     Ok(Amount::new(5))
/// );
/// ```
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    mul_div(
        amount_a.get(),
        reserve_b.get(),
        reserve_a.get(),
        Rounding::Down,
    )
    .map(Amount::new)
}

/// Largest output the pair will release for `amount_in`.
///
/// `in·(S−f)·reserve_out / (reserve_in·S + in·(S−f))`, floored, with
/// `S = 10 000` and `f` the fee in basis points.
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
///
/// # Examples
///
/// ```
/// use cp_amm::domain::{Amount, FeeTier};
/// use cp_amm::quote::get_amount_out;
///
/// let out = get_amount_out(
///     Amount::new(1_000),
///     Amount::new(1_000_000),
///     Amount::new(1_000_000),
///     FeeTier::default(),
/// );
/// assert_eq!(out, Ok(Amount::new(996)));
/// ```
pub fn get_amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let in_with_fee = U256::from(amount_in.get()) * U256::from(fee.retained());
    let numerator = full_mul(in_with_fee, U256::from(reserve_out.get()));
    let denominator = U256::from(reserve_in.get()) * U256::from(BPS_SCALE) + in_with_fee;
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    narrow_wide(numerator / U512::from(denominator), "amount out exceeds 128 bits")
        .map(Amount::new)
}

/// Smallest input that releases `amount_out`.
///
/// `reserve_in·amount_out·S / ((reserve_out − amount_out)·(S−f)) + 1`.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out` is not below `reserve_out`.
/// - [`AmmError::Overflow`] if the input exceeds `u128`.
pub fn get_amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = full_mul(
        U256::from(reserve_in.get()) * U256::from(amount_out.get()),
        U256::from(BPS_SCALE),
    );
    let remaining = reserve_out.saturating_sub(&amount_out);
    let denominator = U256::from(remaining.get()) * U256::from(fee.retained());
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let floor = narrow_wide(numerator / U512::from(denominator), "amount in exceeds 128 bits")?;
    floor
        .checked_add(1)
        .map(Amount::new)
        .ok_or(AmmError::Overflow("amount in exceeds 128 bits"))
}

/// Outputs along `path` for an exact input, one amount per path node.
///
/// `amounts[0] == amount_in`; every later entry is [`get_amount_out`]
/// applied to the previous one at the corresponding pair's reserves.
///
/// # Errors
///
/// - [`AmmError::InvalidPath`] if `path` has fewer than two assets or
///   repeats an asset back-to-back.
/// - [`AmmError::PairNotFound`] if a hop has no pair.
/// - Any [`get_amount_out`] error.
pub fn get_amounts_out<L: PairLookup + ?Sized>(
    lookup: &L,
    amount_in: Amount,
    path: &[Address],
) -> Result<Vec<Amount>> {
    check_path(path)?;
    let mut amounts = Vec::with_capacity(path.len());
    amounts.push(amount_in);
    let mut current = amount_in;
    for hop in path.windows(2) {
        let (fee, reserve_in, reserve_out) = hop_reserves(lookup, &hop[0], &hop[1])?;
        current = get_amount_out(current, reserve_in, reserve_out, fee)?;
        amounts.push(current);
    }
    Ok(amounts)
}

/// Inputs along `path` for an exact output, one amount per path node.
///
/// Walks the path backwards: `amounts[last] == amount_out` and each
/// earlier entry is [`get_amount_in`] for the next one.
///
/// # Errors
///
/// Same as [`get_amounts_out`], with [`get_amount_in`] errors instead.
pub fn get_amounts_in<L: PairLookup + ?Sized>(
    lookup: &L,
    amount_out: Amount,
    path: &[Address],
) -> Result<Vec<Amount>> {
    check_path(path)?;
    let mut amounts = vec![Amount::ZERO; path.len()];
    let mut current = amount_out;
    let last = path.len() - 1;
    amounts[last] = current;
    for i in (1..path.len()).rev() {
        let (fee, reserve_in, reserve_out) = hop_reserves(lookup, &path[i - 1], &path[i])?;
        current = get_amount_in(current, reserve_in, reserve_out, fee)?;
        amounts[i - 1] = current;
    }
    Ok(amounts)
}

fn check_path(path: &[Address]) -> Result<()> {
    if path.len() < 2 {
        return Err(AmmError::InvalidPath("path needs at least two assets"));
    }
    if path.windows(2).any(|hop| hop[0] == hop[1]) {
        return Err(AmmError::InvalidPath("path repeats an asset"));
    }
    Ok(())
}

fn hop_reserves<L: PairLookup + ?Sized>(
    lookup: &L,
    input: &Address,
    output: &Address,
) -> Result<(FeeTier, Amount, Amount)> {
    let pair = lookup
        .pair_for(input, output)
        .ok_or(AmmError::PairNotFound)?;
    let (reserve_in, reserve_out) = pair.reserves_for(input)?;
    Ok((pair.fee_tier(), reserve_in, reserve_out))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::registry::PairRegistry;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    fn seed(registry: &PairRegistry, host: &mut MemoryHost, x: u8, y: u8, rx: u128, ry: u128) {
        let Ok(pair) = registry.create_pair(addr(x), addr(y)) else {
            panic!("new pair");
        };
        let Ok(()) = host.mint(&addr(x), &pair.address(), Amount::new(rx)) else {
            panic!("faucet");
        };
        let Ok(()) = host.mint(&addr(y), &pair.address(), Amount::new(ry)) else {
            panic!("faucet");
        };
        let provider = addr(0xf0);
        let Ok(_) = pair.mint(host, &provider, &provider) else {
            panic!("seed mint");
        };
    }

    fn fee() -> FeeTier {
        FeeTier::default()
    }

    // -- quote ---------------------------------------------------------------

    #[test]
    fn quote_rejects_zeroes() {
        assert_eq!(
            quote(Amount::ZERO, Amount::new(1), Amount::new(1)),
            Err(AmmError::InsufficientAmount)
        );
        assert_eq!(
            quote(Amount::new(1), Amount::ZERO, Amount::new(1)),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn quote_handles_wide_products() {
        let r = Amount::new(u128::MAX / 2);
        assert_eq!(quote(r, r, r), Ok(r));
    }

    // -- single hop ----------------------------------------------------------

    #[test]
    fn amount_out_rejects_degenerate_inputs() {
        assert_eq!(
            get_amount_out(Amount::ZERO, Amount::new(1), Amount::new(1), fee()),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(
            get_amount_out(Amount::new(1), Amount::new(1), Amount::ZERO, fee()),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn amount_out_never_reaches_reserve() {
        let Ok(out) = get_amount_out(Amount::MAX, Amount::new(1), Amount::new(1_000), fee()) else {
            panic!("expected Ok");
        };
        assert_eq!(out, Amount::new(999));
    }

    #[test]
    fn amount_in_inverts_amount_out() {
        let r = Amount::new(1_000_000);
        assert_eq!(get_amount_in(Amount::new(996), r, r, fee()), Ok(Amount::new(1_000)));
        let Ok(back) = get_amount_out(Amount::new(1_000), r, r, fee()) else {
            panic!("expected Ok");
        };
        assert_eq!(back, Amount::new(996));
    }

    #[test]
    fn amount_in_rejects_draining_output() {
        let r = Amount::new(1_000);
        assert_eq!(
            get_amount_in(r, r, r, fee()),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            get_amount_in(Amount::ZERO, r, r, fee()),
            Err(AmmError::InsufficientOutputAmount)
        );
    }

    #[test]
    fn zero_fee_is_pure_constant_product() {
        let r = Amount::new(1_000);
        assert_eq!(
            get_amount_out(Amount::new(1_000), r, r, FeeTier::ZERO),
            Ok(Amount::new(500))
        );
    }

    // -- multi hop -----------------------------------------------------------

    #[test]
    fn multi_hop_equals_sequential_single_hops() {
        let registry = PairRegistry::default();
        let mut host = MemoryHost::new(1_000);
        seed(&registry, &mut host, 1, 2, 1_000_000, 2_000_000);
        seed(&registry, &mut host, 3, 2, 500_000, 3_000_000);

        let path = [addr(1), addr(2), addr(3)];
        let Ok(amounts) = get_amounts_out(&registry, Amount::new(10_000), &path) else {
            panic!("expected Ok");
        };

        let Ok(hop1) = get_amount_out(
            Amount::new(10_000),
            Amount::new(1_000_000),
            Amount::new(2_000_000),
            fee(),
        ) else {
            panic!("expected Ok");
        };
        let Ok(hop2) = get_amount_out(hop1, Amount::new(3_000_000), Amount::new(500_000), fee())
        else {
            panic!("expected Ok");
        };
        assert_eq!(amounts, vec![Amount::new(10_000), hop1, hop2]);
    }

    #[test]
    fn amounts_in_walk_backwards() {
        let registry = PairRegistry::default();
        let mut host = MemoryHost::new(1_000);
        seed(&registry, &mut host, 1, 2, 1_000_000, 2_000_000);
        seed(&registry, &mut host, 2, 3, 3_000_000, 500_000);

        let path = [addr(1), addr(2), addr(3)];
        let Ok(ins) = get_amounts_in(&registry, Amount::new(1_000), &path) else {
            panic!("expected Ok");
        };
        assert_eq!(ins[2], Amount::new(1_000));
        let Ok(outs) = get_amounts_out(&registry, ins[0], &path) else {
            panic!("expected Ok");
        };
        assert!(outs[2] >= Amount::new(1_000));
    }

    #[test]
    fn bad_paths() {
        let registry = PairRegistry::default();
        let mut host = MemoryHost::new(1_000);
        seed(&registry, &mut host, 1, 2, 1_000_000, 1_000_000);

        let Err(AmmError::InvalidPath(_)) =
            get_amounts_out(&registry, Amount::new(1), &[addr(1)])
        else {
            panic!("expected InvalidPath");
        };
        let Err(AmmError::InvalidPath(_)) =
            get_amounts_out(&registry, Amount::new(1), &[addr(1), addr(1)])
        else {
            panic!("expected InvalidPath");
        };
        assert_eq!(
            get_amounts_out(&registry, Amount::new(1_000), &[addr(1), addr(2), addr(9)]),
            Err(AmmError::PairNotFound)
        );
        assert_eq!(
            get_amounts_in(&registry, Amount::new(1), &[addr(9), addr(1)]),
            Err(AmmError::PairNotFound)
        );
    }
}
