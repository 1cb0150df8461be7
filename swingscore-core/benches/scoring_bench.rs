//! Criterion benchmarks for the scoring hot paths.
//!
//! Benchmarks:
//! 1. Indicator primitives over a long series (SMA, EMA, ATR, RSI, Bollinger)
//! 2. Full feature vector computation
//! 3. News scoring (short headline, long multi-snippet body)
//! 4. Alpha evaluation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swingscore_core::alpha::AlphaGateEngine;
use swingscore_core::features::FeatureEngine;
use swingscore_core::indicators::{atr, bollinger, closes, ema, rsi, sma};
use swingscore_core::news::NewsCertaintyScorer;
use swingscore_core::PriceBar;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

const HEADLINE: &str = "Company X announced on 2025-01-10 a signed ₹5,000 crore acquisition, approved by the board, Q2 FY25";

fn long_body() -> Vec<String> {
    (0..40)
        .map(|i| {
            format!(
                "Update {i}: the company may consider a $ {i}0 million expansion in FY2{} \
                 after reporting a {i}% rise in quarterly results; order book stands at ₹{i},200 crore.",
                i % 10
            )
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let bars = make_bars(1260);
    let series = closes(&bars);
    let mut group = c.benchmark_group("indicators");

    group.bench_function("sma_20", |b| b.iter(|| sma(black_box(&series), 20)));
    group.bench_function("ema_20", |b| b.iter(|| ema(black_box(&series), 20)));
    group.bench_function("atr_20", |b| b.iter(|| atr(black_box(&bars), 20)));
    group.bench_function("rsi_14", |b| b.iter(|| rsi(black_box(&series), 14)));
    group.bench_function("bollinger_20", |b| {
        b.iter(|| bollinger(black_box(&series), 20, 2.0))
    });

    group.finish();
}

fn bench_features(c: &mut Criterion) {
    let engine = FeatureEngine::default();
    let mut group = c.benchmark_group("features");

    for n in [60usize, 250, 1260] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::new("compute", n), &bars, |b, bars| {
            b.iter(|| engine.compute(black_box(bars)))
        });
    }

    group.finish();
}

fn bench_news(c: &mut Criterion) {
    let scorer = NewsCertaintyScorer::default();
    let body = long_body();
    let mut group = c.benchmark_group("news");

    group.bench_function("headline", |b| {
        b.iter(|| scorer.score(black_box(&[HEADLINE]), "X"))
    });
    group.bench_function("body_40_snippets", |b| {
        b.iter(|| scorer.score(black_box(&body), "X"))
    });

    group.finish();
}

fn bench_alpha(c: &mut Criterion) {
    let features = FeatureEngine::default().compute(&make_bars(250)).unwrap();
    let news = NewsCertaintyScorer::default().score(&[HEADLINE], "X");
    let engine = AlphaGateEngine::default();

    c.bench_function("alpha_evaluate", |b| {
        b.iter(|| engine.evaluate(black_box(&features), black_box(&news)))
    });
}

criterion_group!(benches, bench_indicators, bench_features, bench_news, bench_alpha);
criterion_main!(benches);
