//! Property-based tests for the pair engine.
//!
//! 1. **Product preservation**: a swap paid at the quoted rate never
//!    lowers `reserve_a * reserve_b`.
//! 2. **Quote tightness**: asking one unit more than the quote fails.
//! 3. **Mint/burn round trip**: a provider never gets back more than they
//!    deposited, and loses at most rounding dust.
//! 4. **Canonical ordering**: argument order never changes the pair.
//! 5. **Mint non-destruction**: reserves backing each claim never shrink
//!    on mint, whatever ratio is deposited.
//! 6. **Multi-hop equality**: path quotes equal chained single-hop quotes.

use proptest::prelude::*;

use crate::config::PairConfig;
use crate::domain::{Address, Amount, Liquidity, TokenPair};
use crate::error::AmmError;
use crate::host::{AssetLedger, MemoryHost};
use crate::pair::Pair;
use crate::quote::{get_amount_out, get_amounts_out, quote};
use crate::registry::{pair_address, PairRegistry};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const T0: u64 = 1_700_000_000;

fn tok_a() -> Address {
    Address::repeat_byte(1)
}

fn tok_b() -> Address {
    Address::repeat_byte(2)
}

fn seeded(ra: u128, rb: u128) -> (MemoryHost, Pair) {
    let Ok(tokens) = TokenPair::new(tok_a(), tok_b()) else {
        panic!("valid pair");
    };
    let pair = Pair::new(pair_address(&tokens), tokens, PairConfig::default());
    let mut host = MemoryHost::new(T0);
    fund(&mut host, &tok_a(), &pair.address(), ra);
    fund(&mut host, &tok_b(), &pair.address(), rb);
    let seeder = Address::repeat_byte(0x11);
    let Ok(_) = pair.mint(&mut host, &seeder, &seeder) else {
        panic!("seed mint");
    };
    (host, pair)
}

fn fund(host: &mut MemoryHost, asset: &Address, holder: &Address, amount: u128) {
    let Ok(()) = host.mint(asset, holder, Amount::new(amount)) else {
        panic!("faucet");
    };
}

fn product(pair: &Pair) -> u128 {
    let reserves = pair.get_state();
    // Both sides stay below 2^64 under these strategies.
    reserves.amount_a().get() * reserves.amount_b().get()
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [10_000, 10_000_000] to avoid extremes.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000u128
}

/// Trade size as a share of the input reserve, in basis points.
fn share_strategy() -> impl Strategy<Value = u128> {
    1u128..=5_000u128
}

// ---------------------------------------------------------------------------
// Property 1: Product preservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_never_lowers_product(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        share in share_strategy(),
        a_to_b in any::<bool>(),
    ) {
        let (mut host, pair) = seeded(ra, rb);
        let before = product(&pair);
        let (asset_in, rin, rout) = if a_to_b { (tok_a(), ra, rb) } else { (tok_b(), rb, ra) };
        let amount_in = (rin * share / 10_000).max(1);

        let Ok(out) = get_amount_out(Amount::new(amount_in), Amount::new(rin), Amount::new(rout), pair.fee_tier()) else {
            return Ok(());
        };
        if out.is_zero() { return Ok(()); }

        fund(&mut host, &asset_in, &pair.address(), amount_in);
        let trader = Address::repeat_byte(0x22);
        let (out_a, out_b) = if a_to_b { (Amount::ZERO, out) } else { (out, Amount::ZERO) };
        let result = pair.swap(&mut host, &trader, out_a, out_b, &trader, &[]);
        prop_assert!(result.is_ok(), "quoted swap rejected: {:?}", result);
        prop_assert!(
            product(&pair) >= before,
            "product fell: {} < {}",
            product(&pair), before
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: Quote tightness
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_one_unit_over_quote_is_rejected(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        share in share_strategy(),
    ) {
        let (mut host, pair) = seeded(ra, rb);
        let amount_in = (ra * share / 10_000).max(1);
        let Ok(out) = get_amount_out(Amount::new(amount_in), Amount::new(ra), Amount::new(rb), pair.fee_tier()) else {
            return Ok(());
        };
        let greedy = Amount::new(out.get() + 1);
        if greedy.get() >= rb { return Ok(()); }

        fund(&mut host, &tok_a(), &pair.address(), amount_in);
        let state = pair.get_state();
        let trader = Address::repeat_byte(0x22);
        prop_assert_eq!(
            pair.swap(&mut host, &trader, Amount::ZERO, greedy, &trader, &[]),
            Err(AmmError::InvariantViolated)
        );
        prop_assert_eq!(pair.get_state(), state);
        prop_assert_eq!(host.balance_of(&tok_b(), &trader), Amount::ZERO);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Mint/burn round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_mint_then_burn_returns_at_most_deposit(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        share in share_strategy(),
    ) {
        let (mut host, pair) = seeded(ra, rb);
        let supply = pair.total_claim_supply().get();
        let deposit_a = (ra * share / 10_000).max(1);
        let Ok(deposit_b) = quote(Amount::new(deposit_a), Amount::new(ra), Amount::new(rb)) else {
            return Ok(());
        };
        if deposit_b.is_zero() { return Ok(()); }

        let provider = Address::repeat_byte(0x33);
        fund(&mut host, &tok_a(), &pair.address(), deposit_a);
        fund(&mut host, &tok_b(), &pair.address(), deposit_b.get());
        let Ok(issued) = pair.mint(&mut host, &provider, &provider) else {
            return Ok(());
        };
        prop_assert!(issued > Liquidity::ZERO);

        let Ok(()) = pair.transfer_claims(&provider, &pair.address(), issued) else {
            panic!("provider holds the claims");
        };
        let Ok((back_a, back_b)) = pair.burn(&mut host, &provider, &provider) else {
            return Ok(());
        };
        prop_assert!(back_a.get() <= deposit_a, "a: {} > {}", back_a, deposit_a);
        prop_assert!(back_b <= deposit_b, "b: {} > {}", back_b, deposit_b);

        // Dust bounded by one claim unit's worth of each reserve plus the
        // rounding of the ratio quote.
        let dust = ra / rb + ra / supply + rb / supply + 4;
        prop_assert!(deposit_a - back_a.get() <= dust, "a dust {} > {}", deposit_a - back_a.get(), dust);
        prop_assert!(deposit_b.get() - back_b.get() <= dust, "b dust {} > {}", deposit_b.get() - back_b.get(), dust);
        prop_assert_eq!(pair.claim_balance_of(&provider), Liquidity::ZERO);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Canonical ordering
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pair_identity_ignores_argument_order(
        x in any::<[u8; 32]>(),
        y in any::<[u8; 32]>(),
    ) {
        let (x, y) = (Address::from_bytes(x), Address::from_bytes(y));
        let (Ok(forward), Ok(backward)) = (TokenPair::new(x, y), TokenPair::new(y, x)) else {
            return Ok(());
        };
        prop_assert_eq!(forward, backward);
        prop_assert!(forward.first() < forward.second());
        prop_assert_eq!(pair_address(&forward), pair_address(&backward));
    }
}

// ---------------------------------------------------------------------------
// Property 5: Mint non-destruction
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_mint_never_dilutes_existing_claims(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        deposit_a in 1u128..=5_000_000u128,
        deposit_b in 1u128..=5_000_000u128,
    ) {
        let (mut host, pair) = seeded(ra, rb);
        let supply_before = pair.total_claim_supply().get();
        let k_before = product(&pair);

        fund(&mut host, &tok_a(), &pair.address(), deposit_a);
        fund(&mut host, &tok_b(), &pair.address(), deposit_b);
        let provider = Address::repeat_byte(0x33);
        let Ok(_) = pair.mint(&mut host, &provider, &provider) else {
            return Ok(());
        };
        let supply_after = pair.total_claim_supply().get();
        let k_after = product(&pair);

        // k / supply^2 is the squared backing of one claim.
        prop_assert!(
            k_after * supply_before * supply_before >= k_before * supply_after * supply_after,
            "backing per claim fell: k {} -> {}, supply {} -> {}",
            k_before, k_after, supply_before, supply_after
        );
    }
}

// ---------------------------------------------------------------------------
// Property 6: Multi-hop equality
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_path_quote_equals_chained_hops(
        r1 in reserve_strategy(),
        r2 in reserve_strategy(),
        r3 in reserve_strategy(),
        r4 in reserve_strategy(),
        amount_in in 1u128..=1_000_000u128,
    ) {
        let tok_c = Address::repeat_byte(3);
        let registry = PairRegistry::default();
        let mut host = MemoryHost::new(T0);
        for (x, y, rx, ry) in [(tok_a(), tok_b(), r1, r2), (tok_b(), tok_c, r3, r4)] {
            let Ok(pair) = registry.create_pair(x, y) else {
                panic!("fresh registry");
            };
            fund(&mut host, &x, &pair.address(), rx);
            fund(&mut host, &y, &pair.address(), ry);
            let Ok(_) = pair.mint(&mut host, &x, &x) else {
                panic!("seed mint");
            };
        }

        let path = [tok_a(), tok_b(), tok_c];
        let Ok(amounts) = get_amounts_out(&registry, Amount::new(amount_in), &path) else {
            return Ok(());
        };

        let fee = registry.config().fee_tier();
        let Ok(mid) = get_amount_out(Amount::new(amount_in), Amount::new(r1), Amount::new(r2), fee) else {
            panic!("first hop quotes when the path does");
        };
        let Ok(last) = get_amount_out(mid, Amount::new(r3), Amount::new(r4), fee) else {
            panic!("second hop quotes when the path does");
        };
        prop_assert_eq!(amounts, vec![Amount::new(amount_in), mid, last]);
    }
}
