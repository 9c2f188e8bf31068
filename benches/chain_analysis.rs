use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use maxpain::chain::{OptionChain, OptionChainPoint};
use maxpain::exposure::{centers_of_gravity, open_interest_ranking};
use maxpain::maxpain::{PainAccounting, solve};
use maxpain::{Analyzer, ChainSnapshot};

/// Synthetic chain centered on 100: calls build up above spot, puts below.
fn generate_chain(n_strikes: usize) -> OptionChain {
    let k_min = 50.0;
    let k_max = 150.0;
    let points = (0..n_strikes)
        .map(|i| {
            let k = k_min + (k_max - k_min) * (i as f64 / (n_strikes - 1) as f64);
            let m = (k - 100.0) / 20.0;
            let call_oi = 1000.0 * (-(m - 0.5).powi(2)).exp();
            let put_oi = 1000.0 * (-(m + 0.5).powi(2)).exp();
            let call_px = (100.0 - k).max(0.0) + 4.0 * (-m * m).exp();
            let put_px = (k - 100.0).max(0.0) + 4.0 * (-m * m).exp();
            let call_delta = 1.0 / (1.0 + m.exp());
            OptionChainPoint::new(k, call_oi, put_oi)
                .with_prices(call_px, put_px)
                .with_greeks(call_delta, 0.01, call_delta - 1.0, 0.01)
        })
        .collect();
    OptionChain::new(points).expect("benchmark chain should be valid")
}

fn max_pain_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_pain");
    for n in [20, 100, 400] {
        let chain = generate_chain(n);
        group.bench_with_input(BenchmarkId::new("solve", n), &chain, |b, chain| {
            b.iter(|| solve(black_box(chain), PainAccounting::IntrinsicLoss).unwrap());
        });
    }
    group.finish();
}

fn exposure_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("exposure");
    let chain = generate_chain(100);
    group.bench_function("centers_of_gravity_100", |b| {
        b.iter(|| centers_of_gravity(black_box(&chain)));
    });
    group.bench_function("ranking_top5_100", |b| {
        b.iter(|| open_interest_ranking(black_box(&chain), 5));
    });
    group.finish();
}

fn full_analysis_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let analyzer = Analyzer::default();

    for n in [20, 100] {
        let chain = generate_chain(n);
        group.bench_with_input(BenchmarkId::new("analyze", n), &chain, |b, chain| {
            b.iter(|| analyzer.analyze(black_box(chain), black_box(103.0)).unwrap());
        });
    }

    // 12 expirations x 60 strikes; fans out across threads with `parallel`
    let snapshots: Vec<ChainSnapshot> = (0..12)
        .map(|i| ChainSnapshot {
            label: format!("expiry-{i}"),
            chain: generate_chain(60),
            current_price: 95.0 + i as f64,
        })
        .collect();
    group.bench_function("analyze_all_12", |b| {
        b.iter(|| analyzer.analyze_all(black_box(&snapshots)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    max_pain_benchmarks,
    exposure_benchmarks,
    full_analysis_benchmarks
);
criterion_main!(benches);
