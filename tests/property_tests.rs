//! Property-based tests using proptest.
//!
//! These tests verify invariants across randomly generated chains rather
//! than fixed examples.

use maxpain::chain::{OptionChain, OptionChainPoint};
use maxpain::config::SentimentThresholds;
use maxpain::curve::find_break_evens;
use maxpain::exposure::{call_put_ratio, centers_of_gravity, open_interest_ranking};
use maxpain::gradient::threshold_level;
use maxpain::maxpain::{PainAccounting, solve};
use maxpain::payoff::PnlSample;
use maxpain::{Analyzer, Direction};
use proptest::prelude::*;

/// Chains of 1..12 strikes spaced 5 apart from 50, with random open
/// interest and premiums.
fn chain_strategy() -> impl Strategy<Value = OptionChain> {
    prop::collection::vec((0.0_f64..500.0, 0.0_f64..500.0, 0.0_f64..20.0, 0.0_f64..20.0), 1..12)
        .prop_map(|rows| {
            let points = rows
                .into_iter()
                .enumerate()
                .map(|(i, (c_oi, p_oi, c_px, p_px))| {
                    OptionChainPoint::new(50.0 + 5.0 * i as f64, c_oi, p_oi).with_prices(c_px, p_px)
                })
                .collect();
            OptionChain::new(points).unwrap()
        })
}

// --- Property Test 1: OI shares sum to one ---

proptest! {
    /// Whenever the chain carries open interest, the call and put shares
    /// partition it.
    #[test]
    fn oi_shares_sum_to_one(chain in chain_strategy()) {
        let r = call_put_ratio(&chain, &SentimentThresholds::default());
        if r.total_call + r.total_put > 0.0 {
            prop_assert!((r.call_share + r.put_share - 1.0).abs() < 1e-12);
        } else {
            prop_assert_eq!(r.call_share, 0.0);
            prop_assert!(r.sentiment.is_none());
        }
        prop_assert_eq!(r.ratio.is_some(), r.total_put > 0.0);
    }
}

// --- Property Test 2: max pain equals brute-force argmin ---

proptest! {
    /// The solver agrees with an independent scan of every listed strike,
    /// including the lowest-strike tie rule.
    #[test]
    fn max_pain_matches_brute_force(chain in chain_strategy()) {
        let mut best = (f64::NAN, f64::INFINITY);
        for s in chain.strikes() {
            let loss: f64 = chain
                .points()
                .iter()
                .map(|p| {
                    p.call_open_interest * (s - p.strike).max(0.0)
                        + p.put_open_interest * (p.strike - s).max(0.0)
                })
                .sum();
            if loss < best.1 {
                best = (s, loss);
            }
        }
        let mp = solve(&chain, PainAccounting::IntrinsicLoss).unwrap();
        let chosen = mp.ranked[0].total_losses;
        // Equal up to summation order; the strike must match unless the two
        // candidates tie within rounding.
        prop_assert!((chosen - best.1).abs() <= 1e-9 * best.1.max(1.0));
        if mp.strike != best.0 {
            let other = mp.ranked.iter().find(|r| r.strike == best.0).unwrap();
            prop_assert!((other.total_losses - chosen).abs() <= 1e-9 * chosen.max(1.0));
        }
        prop_assert_eq!(mp.ranked.len(), chain.len());
    }
}

// --- Property Test 3: centers of gravity lie within the strike range ---

proptest! {
    #[test]
    fn centers_within_strike_range(chain in chain_strategy()) {
        let c = centers_of_gravity(&chain);
        let lo = chain.min_strike().unwrap() - 1e-9;
        let hi = chain.max_strike().unwrap() + 1e-9;
        for center in [c.call_center, c.put_center, c.equilibrium].into_iter().flatten() {
            prop_assert!(center >= lo && center <= hi, "center {} outside [{}, {}]", center, lo, hi);
        }
        prop_assert_eq!(c.call_center.is_some(), chain.total_call_open_interest() > 0.0);
        prop_assert_eq!(
            c.equilibrium.is_some(),
            c.call_center.is_some() && c.put_center.is_some()
        );
    }
}

// --- Property Test 4: two-point interpolation lands on the midpoint ---

proptest! {
    /// A symmetric pair of samples straddling zero crosses at its midpoint.
    #[test]
    fn symmetric_pair_crosses_at_midpoint(
        mid in 1.0_f64..1000.0,
        half_width in 0.01_f64..50.0,
        magnitude in 0.1_f64..1e6,
    ) {
        let sample = |price: f64, pnl: f64| PnlSample {
            price,
            total_pnl: pnl,
            call_pnl: pnl,
            put_pnl: 0.0,
        };
        let points = find_break_evens(&[
            sample(mid - half_width, -magnitude),
            sample(mid + half_width, magnitude),
        ]);
        prop_assert_eq!(points.len(), 1);
        prop_assert!((points[0] - mid).abs() < 1e-9 * mid.max(1.0));
    }
}

// --- Property Test 5: analysis is idempotent ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Repeating the analysis on the same input produces the same result.
    #[test]
    fn analysis_is_idempotent(chain in chain_strategy(), price in 40.0_f64..120.0) {
        let analyzer = Analyzer::default();
        let a = analyzer.analyze(&chain, price).unwrap();
        let b = analyzer.analyze(&chain, price).unwrap();
        prop_assert_eq!(a, b);
    }
}

// --- Property Test 6: break-evens lie inside the sampled curve ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn break_evens_inside_curve_domain(chain in chain_strategy(), price in 40.0_f64..120.0) {
        let r = Analyzer::default().analyze(&chain, price).unwrap();
        let be = &r.seller.break_evens;
        for pair in be.points.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        let lo = chain.min_strike().unwrap() * 0.7 - 1e-9;
        let hi = chain.max_strike().unwrap() * 1.3 + 1e-9;
        for &p in &be.points {
            prop_assert!(p >= lo && p <= hi);
        }
        for zone in &be.zones {
            prop_assert!(zone.lower <= zone.upper);
        }
    }
}

// --- Property Test 7: rankings are sorted descending ---

proptest! {
    #[test]
    fn rankings_descend(chain in chain_strategy(), n in 1_usize..10) {
        let r = open_interest_ranking(&chain, n);
        prop_assert!(r.by_call.len() <= n);
        for pair in r.by_call.windows(2) {
            prop_assert!(pair[0].call_open_interest >= pair[1].call_open_interest);
        }
        for pair in r.by_put.windows(2) {
            prop_assert!(pair[0].put_open_interest >= pair[1].put_open_interest);
        }
        for pair in r.by_total.windows(2) {
            prop_assert!(pair[0].total_open_interest >= pair[1].total_open_interest);
        }
    }
}

// --- Property Test 8: unreachable threshold runs to the cap ---

proptest! {
    /// With puts only, holder losses never grow on the way up, so the walk
    /// exhausts its budget and says so.
    #[test]
    fn unreachable_threshold_hits_cap(
        put_oi in 1.0_f64..1000.0,
        step in 0.1_f64..5.0,
        cap in 1_usize..200,
    ) {
        let chain = OptionChain::new(vec![OptionChainPoint::new(100.0, 0.0, put_oi)]).unwrap();
        let t = threshold_level(&chain, 100.0, 0.0, 1.0, step, Direction::Up, cap);
        prop_assert!(!t.converged);
        prop_assert_eq!(t.iterations, cap);
        prop_assert!(t.loss_increase <= 0.0);
    }
}
