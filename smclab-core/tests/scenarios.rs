//! End-to-end scenarios over synthetic windows.
//!
//! 1. Monotonic uptrend: no false structure on trending data
//! 2. V-shape: one bullish break and an order block at the last bearish candle
//! 3. Flat series: zero-move arithmetic never panics
//! 4. Three aligned swing highs: a resistance line with three touches
//! 5. Signal levels for a 110/100 bullish order block

use chrono::{TimeZone, Utc};
use smclab_core::config::{PipelineConfig, TrendLineConfig};
use smclab_core::detectors::{SwingDetector, TrendLineDetector};
use smclab_core::domain::{
    CandleWindow, Direction, OrderBlock, RawCandle, SignalDirection, SignalStatus, SwingKind,
    TrendLineKind,
};
use smclab_core::signals::SignalSynthesizer;
use smclab_core::Pipeline;

// ── Helpers ──────────────────────────────────────────────────────────

fn window(data: &[(f64, f64, f64, f64)]) -> CandleWindow {
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    CandleWindow::new(data.iter().enumerate().map(|(i, &(open, high, low, close))| RawCandle {
        timestamp: base + chrono::Duration::hours(i as i64),
        open,
        high,
        low,
        close,
        volume: 500.0,
    }))
    .unwrap()
}

/// Bullish candle closing at `close`.
fn bull(close: f64) -> (f64, f64, f64, f64) {
    let open = close / 1.002;
    (open, close * 1.001, open * 0.999, close)
}

/// Bearish candle closing at `close`.
fn bear(close: f64) -> (f64, f64, f64, f64) {
    let open = close * 1.002;
    (open, open * 1.001, close * 0.999, close)
}

// ── 1. Monotonic uptrend ─────────────────────────────────────────────

#[test]
fn monotonic_uptrend_has_no_false_structure() {
    let data: Vec<_> = (0..500).map(|i| bull(100.0 * 1.001_f64.powi(i))).collect();
    let w = window(&data);
    let result = Pipeline::default().run(&w);

    let n = w.len();
    assert!(result
        .swing_points
        .iter()
        .all(|s| s.kind == SwingKind::High && s.index >= n - 2 * 5));
    assert!(result.structure_breaks.is_empty());
    assert!(result.order_blocks.is_empty());
    assert!(result.signals.is_empty());
}

// ── 2. V-shape ───────────────────────────────────────────────────────

fn v_shape() -> (Vec<(f64, f64, f64, f64)>, f64) {
    let mut data: Vec<_> = (0..=20).map(|i| bull(80.0 * 1.0111_f64.powi(i))).collect();
    let pre_trough_high = data[20].1;

    let mut close = data[20].3;
    for _ in 21..=250 {
        close *= 0.997;
        data.push(bear(close));
    }

    let step = (pre_trough_high * 1.01 / close).powf(1.0 / 248.0);
    for i in 251..499 {
        close *= step;
        data.push(if i == 490 { bear(close) } else { bull(close) });
    }
    data.push(bull(pre_trough_high * 1.03));
    (data, pre_trough_high)
}

#[test]
fn v_shape_breaks_once_above_pre_trough_high() {
    let (data, pre_trough_high) = v_shape();
    let w = window(&data);
    let result = Pipeline::default().run(&w);

    let highs: Vec<_> = result
        .swing_points
        .iter()
        .filter(|s| s.kind == SwingKind::High)
        .collect();
    assert_eq!(highs.len(), 1);
    assert_eq!(highs[0].index, 20);
    assert_eq!(highs[0].price, pre_trough_high);

    assert_eq!(result.structure_breaks.len(), 1);
    let brk = result.structure_breaks[0];
    assert_eq!(brk.index, 499);
    assert_eq!(brk.direction, Direction::Bullish);
    assert!((brk.move_percentage - 3.0).abs() < 1e-6);
}

#[test]
fn v_shape_order_block_anchors_last_bearish_candle() {
    let (data, _) = v_shape();
    let w = window(&data);
    let result = Pipeline::default().run(&w);

    assert_eq!(result.order_blocks.len(), 1);
    let ob = result.order_blocks[0];
    assert_eq!(ob.origin_index, 490);
    assert_eq!(ob.trigger_index, 499);
    assert_eq!(ob.direction, Direction::Bullish);
    assert!(w[490].is_bearish());
    assert_eq!((ob.high, ob.low), (w[490].high, w[490].low));

    // Price has run more than 2% past the zone, so the long is already missed.
    assert_eq!(result.signals.len(), 1);
    assert_eq!(result.signals[0].direction, SignalDirection::Long);
    assert_eq!(result.signals[0].status, SignalStatus::Missed);
}

// ── 3. Flat series ───────────────────────────────────────────────────

#[test]
fn flat_series_has_no_breaks_or_blocks() {
    let w = window(&vec![(100.0, 100.0, 100.0, 100.0); 500]);
    let result = Pipeline::default().run(&w);

    assert!(result.structure_breaks.is_empty());
    assert!(result.order_blocks.is_empty());
    assert!(result.signals.is_empty());
    // 490 tied swing points per kind exceed the cap, so trend lines are skipped.
    assert!(result.trend_lines.is_empty());
    assert_eq!(result.current_price, Some(100.0));
}

#[test]
fn flat_series_trend_lines_are_horizontal() {
    let w = window(&vec![(100.0, 100.0, 100.0, 100.0); 500]);
    let swings = SwingDetector::default().detect(&w);
    let config = TrendLineConfig {
        recent_window: Some(100),
        ..TrendLineConfig::default()
    };
    let lines = TrendLineDetector::new(config).detect(&w, &swings);

    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 100.0);
        assert!(line.strength.is_finite());
    }
}

// ── 4. Aligned swing highs ───────────────────────────────────────────

#[test]
fn three_aligned_swing_highs_form_resistance() {
    let data: Vec<_> = (0..100)
        .map(|i| {
            let drift = 0.01 * i as f64;
            let high = match i {
                10 => 100.0,
                50 => 100.2,
                90 => 99.9,
                _ => 90.0 + drift,
            };
            let low = 88.0 + drift;
            let mid = (high + low) / 2.0;
            (mid, high, low, mid)
        })
        .collect();
    let w = window(&data);
    let result = Pipeline::default().run(&w);

    let peaks: Vec<usize> = result
        .swing_points
        .iter()
        .filter(|s| s.kind == SwingKind::High)
        .map(|s| s.index)
        .collect();
    assert_eq!(peaks, vec![10, 50, 90]);

    let best = result
        .trend_lines
        .iter()
        .find(|l| l.kind == TrendLineKind::Resistance)
        .expect("resistance line");
    assert!(best.touches >= 3);
    assert!(best.touch_points.contains(&10));
    assert!(best.touch_points.contains(&50));
    assert!(best.touch_points.contains(&90));
}

// ── 5. Signal arithmetic ─────────────────────────────────────────────

#[test]
fn bullish_order_block_signal_levels() {
    let ob = OrderBlock {
        origin_index: 0,
        high: 110.0,
        low: 100.0,
        direction: Direction::Bullish,
        trigger_index: 5,
    };
    let signal = SignalSynthesizer::default().signal_for(&ob, 105.0).unwrap();

    assert_eq!(signal.entry_price, 105.0);
    assert!((signal.stop_loss - 99.5).abs() < 1e-9);
    // risk = 105 - 99.5 = 5.5, target = 105 + 2 * 5.5
    assert!((signal.take_profit - 116.0).abs() < 1e-9);
    assert_eq!(signal.status, SignalStatus::Active);
}

#[test]
fn default_config_round_trips_through_pipeline() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    assert_eq!(pipeline.config(), &PipelineConfig::default());
}
