//! Gate conjunction: all 16 combinations of the four gates.
//!
//! Each gate is driven by an input that no other gate reads, so every
//! combination is reachable: the alpha gate through its threshold, the
//! volume gate through relative volume, the trend gate through the SMA50
//! flag, and the setup gate through squeeze/breakout.

use chrono::NaiveDate;
use swingscore_core::alpha::{AlphaConfig, AlphaGateEngine};
use swingscore_core::features::FeatureVector;
use swingscore_core::news::NewsMetrics;

fn features(volume_ok: bool, trend_ok: bool, setup_ok: bool) -> FeatureVector {
    FeatureVector {
        as_of: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        close: 100.0,
        momentum_3: 55.0,
        momentum_20: 60.0,
        momentum_60: 58.0,
        relative_volume: if volume_ok { 2.0 } else { 1.2 },
        is_squeeze: setup_ok,
        breakout_direction: 0,
        price_band_position: 55.0,
        above_sma50: trend_ok,
        above_sma200: false,
        rsi14: 55.0,
        atr20: 1.5,
    }
}

fn engine(alpha_ok: bool) -> AlphaGateEngine {
    let mut config = AlphaConfig::default();
    // Alpha never reaches 100 and is never below 0.
    config.gates.alpha_min = if alpha_ok { 0.0 } else { 100.0 };
    AlphaGateEngine::new(config)
}

#[test]
fn final_pick_is_conjunction_of_all_gates() {
    let news = NewsMetrics::neutral("GATE");
    let mut picks = 0;
    for mask in 0u8..16 {
        let alpha_ok = mask & 0b0001 != 0;
        let volume_ok = mask & 0b0010 != 0;
        let trend_ok = mask & 0b0100 != 0;
        let setup_ok = mask & 0b1000 != 0;

        let r = engine(alpha_ok).evaluate(&features(volume_ok, trend_ok, setup_ok), &news);

        assert_eq!(r.gate_alpha, alpha_ok, "mask {mask:04b}");
        assert_eq!(r.gate_volume, volume_ok, "mask {mask:04b}");
        assert_eq!(r.gate_trend, trend_ok, "mask {mask:04b}");
        assert_eq!(r.gate_setup, setup_ok, "mask {mask:04b}");
        assert_eq!(
            r.final_pick,
            r.gate_alpha && r.gate_volume && r.gate_trend && r.gate_setup,
            "mask {mask:04b}"
        );
        if r.final_pick {
            picks += 1;
        }
    }
    assert_eq!(picks, 1);
}

#[test]
fn breakout_in_either_direction_satisfies_setup() {
    let news = NewsMetrics::neutral("GATE");
    for direction in [-1, 1] {
        let mut f = features(true, true, false);
        f.breakout_direction = direction;
        let r = engine(true).evaluate(&f, &news);
        assert!(r.gate_setup);
        assert!(r.final_pick);
    }
}

#[test]
fn thresholds_are_inclusive() {
    let news = NewsMetrics::neutral("GATE");
    let mut f = features(true, true, true);
    f.relative_volume = 1.5;
    let r = AlphaGateEngine::default().evaluate(&f, &news);
    assert!(r.gate_volume);

    let mut config = AlphaConfig::default();
    config.gates.alpha_min = r.alpha;
    let r2 = AlphaGateEngine::new(config).evaluate(&f, &news);
    assert!(r2.gate_alpha);
}
