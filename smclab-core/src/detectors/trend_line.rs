//! Trend lines — exhaustive two-point fits through same-kind swing points.
//!
//! Every pair of swing lows (support) or swing highs (resistance) defines a candidate
//! line `price = slope * index + intercept`. A candidate survives when it is not too
//! steep and at least `min_touches` candles of the evaluated window have their low
//! (support) or high (resistance) within `tolerance_percentage` of the line. Survivors
//! are ranked by strength and greedily de-duplicated up to `max_lines`.
//!
//! The pair search is O(k²) in swing points per kind with one O(n) touch scan per
//! pair. `max_swing_points` bounds k: a kind with more swing points than that is
//! skipped rather than searched.

use tracing::warn;

use crate::config::{StrengthModel, TrendLineConfig};
use crate::detectors::Stage;
use crate::domain::{Candle, SwingKind, SwingPoint, TrendLine, TrendLineKind};

/// Candles inspected for the "not recently broken" bonus.
const RECENT_BREAK_WINDOW: usize = 20;

/// Relative slope difference below which two lines count as the same line.
const DUPLICATE_SLOPE_FRACTION: f64 = 0.1;

/// Lows this far below support (or highs this far above resistance) break the line.
const BREAK_FRACTION: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct TrendLineDetector {
    config: TrendLineConfig,
}

impl TrendLineDetector {
    pub fn new(config: TrendLineConfig) -> Self {
        assert!(config.min_touches >= 1, "min_touches must be >= 1");
        assert!(config.max_lines >= 1, "max_lines must be >= 1");
        assert!(
            config.tolerance_percentage.is_finite() && config.tolerance_percentage > 0.0,
            "tolerance_percentage must be finite and > 0"
        );
        Self { config }
    }

    pub fn config(&self) -> &TrendLineConfig {
        &self.config
    }

    /// Ranked trend lines (strongest first), at most `max_lines`.
    pub fn detect(&self, candles: &[Candle], swings: &[SwingPoint]) -> Vec<TrendLine> {
        let n = candles.len();
        if !self.can_run(n) {
            return Vec::new();
        }
        let offset = match self.config.recent_window {
            Some(window) => n.saturating_sub(window),
            None => 0,
        };
        let evaluated = &candles[offset..];

        let mut candidates = Vec::new();
        for kind in [TrendLineKind::Support, TrendLineKind::Resistance] {
            let swing_kind = match kind {
                TrendLineKind::Support => SwingKind::Low,
                TrendLineKind::Resistance => SwingKind::High,
            };
            let anchors: Vec<&SwingPoint> = swings
                .iter()
                .filter(|s| s.kind == swing_kind && s.index >= offset && s.index < n)
                .collect();

            if anchors.len() > self.config.max_swing_points {
                warn!(
                    ?kind,
                    swing_points = anchors.len(),
                    cap = self.config.max_swing_points,
                    "too many swing points, skipping trend-line search"
                );
                continue;
            }
            self.fit_pairs(evaluated, &anchors, kind, &mut candidates);
        }

        self.filter_best(candidates)
    }

    fn fit_pairs(
        &self,
        evaluated: &[Candle],
        anchors: &[&SwingPoint],
        kind: TrendLineKind,
        out: &mut Vec<TrendLine>,
    ) {
        let Some(last) = evaluated.last() else {
            return;
        };

        for (a, p1) in anchors.iter().enumerate() {
            for p2 in &anchors[a + 1..] {
                if p1.index == p2.index {
                    continue;
                }
                let slope = (p2.price - p1.price) / (p2.index as f64 - p1.index as f64);
                let intercept = p1.price - slope * p1.index as f64;
                if !slope.is_finite() || !intercept.is_finite() {
                    continue;
                }
                if slope.atan().to_degrees().abs() > self.config.max_slope_angle {
                    continue;
                }

                let touch_points = self.touch_points(evaluated, slope, intercept, kind);
                if touch_points.len() < self.config.min_touches {
                    continue;
                }

                let start_index = p1.index.min(p2.index);
                let mut line = TrendLine {
                    kind,
                    slope,
                    intercept,
                    start_index,
                    end_index: last.index,
                    touches: touch_points.len(),
                    strength: 0.0,
                    touch_points,
                };
                line.strength = self.strength(evaluated, &line);
                out.push(line);
            }
        }
    }

    /// Indices whose relevant price lies within tolerance of the line.
    ///
    /// Candles where the line price is not positive never count.
    fn touch_points(
        &self,
        evaluated: &[Candle],
        slope: f64,
        intercept: f64,
        kind: TrendLineKind,
    ) -> Vec<usize> {
        let tolerance = self.config.tolerance_percentage / 100.0;
        evaluated
            .iter()
            .filter(|c| {
                let line_price = slope * c.index as f64 + intercept;
                if line_price <= 0.0 {
                    return false;
                }
                let actual = match kind {
                    TrendLineKind::Support => c.low,
                    TrendLineKind::Resistance => c.high,
                };
                (actual - line_price).abs() / line_price <= tolerance
            })
            .map(|c| c.index)
            .collect()
    }

    fn strength(&self, evaluated: &[Candle], line: &TrendLine) -> f64 {
        let n = evaluated.len() as f64;
        match self.config.strength {
            StrengthModel::SpanWeighted => {
                let span = (line.end_index - line.start_index) as f64;
                line.touches as f64 * span / n
            }
            StrengthModel::TouchWeighted => {
                let mut strength = line.touches as f64 * 0.4 + (n / 100.0) * 0.3;
                if !recently_broken(evaluated, line) {
                    strength += 0.5;
                }
                strength
            }
        }
    }

    /// Strongest-first greedy selection that drops near-duplicates of kept lines.
    fn filter_best(&self, mut candidates: Vec<TrendLine>) -> Vec<TrendLine> {
        candidates.sort_by(|a, b| b.strength.total_cmp(&a.strength));

        let tolerance = self.config.tolerance_percentage / 100.0;
        let mut kept: Vec<TrendLine> = Vec::new();
        for line in candidates {
            if kept.len() >= self.config.max_lines {
                break;
            }
            let duplicate = kept
                .iter()
                .any(|existing| is_duplicate(existing, &line, tolerance));
            if !duplicate {
                kept.push(line);
            }
        }
        kept
    }
}

/// Same kind and either a near-equal slope or a near-equal intercept.
fn is_duplicate(existing: &TrendLine, line: &TrendLine, tolerance: f64) -> bool {
    if existing.kind != line.kind {
        return false;
    }
    let slope_close =
        (line.slope - existing.slope).abs() < line.slope.abs() * DUPLICATE_SLOPE_FRACTION;
    let intercept_close =
        (line.intercept - existing.intercept).abs() <= line.intercept.abs() * tolerance;
    slope_close || intercept_close
}

fn recently_broken(evaluated: &[Candle], line: &TrendLine) -> bool {
    let start = evaluated.len().saturating_sub(RECENT_BREAK_WINDOW);
    evaluated[start..].iter().any(|c| {
        let line_price = line.price_at(c.index);
        match line.kind {
            TrendLineKind::Support => c.low < line_price * (1.0 - BREAK_FRACTION),
            TrendLineKind::Resistance => c.high > line_price * (1.0 + BREAK_FRACTION),
        }
    })
}

impl Default for TrendLineDetector {
    fn default() -> Self {
        Self::new(TrendLineConfig::default())
    }
}

impl Stage for TrendLineDetector {
    fn name(&self) -> &str {
        "trend_line"
    }

    fn min_candles(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrendLineProfile;
    use crate::detectors::{assert_approx, make_hl_candles, SwingDetector};

    fn high(index: usize, price: f64) -> SwingPoint {
        SwingPoint {
            index,
            price,
            kind: SwingKind::High,
        }
    }

    fn low(index: usize, price: f64) -> SwingPoint {
        SwingPoint {
            index,
            price,
            kind: SwingKind::Low,
        }
    }

    /// 100 candles with highs at 95 except three near-100 peaks at 10, 50, 90.
    fn three_peaks() -> (crate::domain::CandleWindow, Vec<SwingPoint>) {
        let mut highs = vec![95.0; 100];
        let lows = vec![90.0; 100];
        highs[10] = 100.0;
        highs[50] = 100.2;
        highs[90] = 99.9;
        let w = make_hl_candles(&highs, &lows);
        let swings = vec![high(10, 100.0), high(50, 100.2), high(90, 99.9)];
        (w, swings)
    }

    #[test]
    fn resistance_through_three_peaks() {
        let (w, swings) = three_peaks();
        let lines = TrendLineDetector::default().detect(&w, &swings);

        assert!(!lines.is_empty());
        let best = &lines[0];
        assert_eq!(best.kind, TrendLineKind::Resistance);
        assert!(best.touches >= 3);
        assert_eq!(best.touch_points, vec![10, 50, 90]);
        assert_eq!(best.end_index, 99);
    }

    #[test]
    fn touch_points_lie_within_tolerance() {
        let (w, swings) = three_peaks();
        for line in TrendLineDetector::default().detect(&w, &swings) {
            for &i in &line.touch_points {
                let predicted = line.price_at(i);
                assert!((w[i].high - predicted).abs() / predicted <= 0.005 + 1e-12);
            }
        }
    }

    #[test]
    fn min_touches_filters_two_point_lines() {
        let mut highs = vec![95.0; 60];
        highs[10] = 100.0;
        highs[40] = 110.0;
        let w = make_hl_candles(&highs, &[90.0; 60]);
        let swings = [high(10, 100.0), high(40, 110.0)];

        assert!(TrendLineDetector::default().detect(&w, &swings).is_empty());

        let advanced = TrendLineDetector::new(TrendLineConfig::for_profile(
            TrendLineProfile::Advanced,
        ));
        let lines = advanced.detect(&w, &swings);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].touches, 2);
        assert_eq!(lines[0].start_index, 10);
    }

    #[test]
    fn steep_pairs_are_rejected() {
        let mut lows = vec![50.0; 30];
        lows[5] = 10.0;
        lows[6] = 40.0; // slope 30 per candle, ~88 degrees
        let highs: Vec<f64> = lows.iter().map(|l| l + 100.0).collect();
        let w = make_hl_candles(&highs, &lows);
        let swings = [low(5, 10.0), low(6, 40.0)];
        let config = TrendLineConfig {
            min_touches: 1,
            ..TrendLineConfig::default()
        };
        assert!(TrendLineDetector::new(config).detect(&w, &swings).is_empty());
    }

    #[test]
    fn span_weighted_strength() {
        let (w, swings) = three_peaks();
        let lines = TrendLineDetector::default().detect(&w, &swings);
        let best = &lines[0];
        let span = (best.end_index - best.start_index) as f64;
        assert_approx(best.strength, best.touches as f64 * span / 100.0, 1e-9);
    }

    #[test]
    fn touch_weighted_strength_includes_unbroken_bonus() {
        let (w, swings) = three_peaks();
        let detector =
            TrendLineDetector::new(TrendLineConfig::for_profile(TrendLineProfile::Advanced));
        let lines = detector.detect(&w, &swings);
        let best = &lines[0];
        // Highs near the tail sit at 95, well below every candidate: unbroken.
        assert_approx(best.strength, best.touches as f64 * 0.4 + 0.3 + 0.5, 1e-9);
    }

    #[test]
    fn broken_line_loses_bonus() {
        let mut highs = vec![95.0; 100];
        highs[10] = 100.0;
        highs[50] = 100.0;
        highs[95] = 105.0; // pierces the horizontal resistance near the tail
        let w = make_hl_candles(&highs, &[90.0; 100]);
        let swings = [high(10, 100.0), high(50, 100.0)];
        let detector =
            TrendLineDetector::new(TrendLineConfig::for_profile(TrendLineProfile::Advanced));
        let lines = detector.detect(&w, &swings);
        assert_eq!(lines.len(), 1);
        assert_approx(lines[0].strength, 2.0 * 0.4 + 0.3, 1e-9);
    }

    #[test]
    fn flat_series_does_not_crash_and_deduplicates() {
        let w = make_hl_candles(&[100.0; 120], &[100.0; 120]);
        let swings = SwingDetector::default().detect(&w);
        let lines = TrendLineDetector::default().detect(&w, &swings);
        assert!(lines.len() <= 2);
        for line in &lines {
            assert_eq!(line.slope, 0.0);
            assert!(line.touches >= 3);
        }
        let kinds: Vec<TrendLineKind> = lines.iter().map(|l| l.kind).collect();
        assert!(kinds.windows(2).all(|k| k[0] != k[1]));
    }

    #[test]
    fn swing_cap_skips_kind() {
        let w = make_hl_candles(&[100.0; 120], &[100.0; 120]);
        let swings = SwingDetector::default().detect(&w);
        let config = TrendLineConfig {
            max_swing_points: 10,
            ..TrendLineConfig::default()
        };
        assert!(TrendLineDetector::new(config).detect(&w, &swings).is_empty());
    }

    #[test]
    fn max_lines_caps_output() {
        // Zig-zag lows produce many overlapping support fits.
        let lows: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.05)
            .collect();
        let highs: Vec<f64> = lows.iter().map(|l| l + 3.0).collect();
        let w = make_hl_candles(&highs, &lows);
        let swings = SwingDetector::new(3).detect(&w);
        let config = TrendLineConfig {
            min_touches: 2,
            max_lines: 3,
            ..TrendLineConfig::default()
        };
        let lines = TrendLineDetector::new(config).detect(&w, &swings);
        assert!(lines.len() <= 3);
        for pair in lines.windows(2) {
            assert!(pair[0].strength >= pair[1].strength);
        }
    }

    #[test]
    fn recent_window_restricts_anchors_and_touches() {
        let (w, swings) = three_peaks();
        let config = TrendLineConfig {
            min_touches: 2,
            recent_window: Some(60),
            ..TrendLineConfig::default()
        };
        let lines = TrendLineDetector::new(config).detect(&w, &swings);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start_index, 50);
        assert!(lines[0].touch_points.iter().all(|&i| i >= 40));
    }

    #[test]
    fn advanced_profile_only_sees_last_hundred_candles() {
        let mut highs = vec![95.0; 150];
        highs[10] = 100.0;
        highs[30] = 100.0;
        highs[80] = 110.0;
        highs[120] = 110.0;
        let w = make_hl_candles(&highs, &[90.0; 150]);
        let swings = [
            high(10, 100.0),
            high(30, 100.0),
            high(80, 110.0),
            high(120, 110.0),
        ];

        let advanced =
            TrendLineDetector::new(TrendLineConfig::for_profile(TrendLineProfile::Advanced));
        let lines = advanced.detect(&w, &swings);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start_index, 80);
        assert_eq!(lines[0].touch_points, vec![80, 120]);

        let whole = TrendLineDetector::new(TrendLineConfig {
            recent_window: None,
            ..TrendLineConfig::for_profile(TrendLineProfile::Advanced)
        });
        assert!(whole.detect(&w, &swings).iter().any(|l| l.start_index == 10));
    }

    fn fitted(kind: TrendLineKind, slope: f64, intercept: f64, strength: f64) -> TrendLine {
        TrendLine {
            kind,
            slope,
            intercept,
            start_index: 0,
            end_index: 99,
            touches: 3,
            touch_points: vec![],
            strength,
        }
    }

    #[test]
    fn near_parallel_lines_of_same_kind_are_merged() {
        let strong = fitted(TrendLineKind::Resistance, 1.0, 100.0, 3.0);
        let weak = fitted(TrendLineKind::Resistance, 1.05, 150.0, 2.0);
        let support = fitted(TrendLineKind::Support, 1.02, 60.0, 1.0);

        // Intercepts are far apart, so only the slope test can merge these.
        assert!(is_duplicate(&strong, &weak, 0.005));
        assert!(!is_duplicate(&strong, &support, 0.005));

        let kept = TrendLineDetector::default().filter_best(vec![weak, support, strong]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].kind, TrendLineKind::Resistance);
        assert_eq!(kept[0].intercept, 100.0);
        assert_eq!(kept[1].kind, TrendLineKind::Support);
    }

    #[test]
    fn non_positive_line_price_never_touches() {
        let w = make_hl_candles(&[2.0; 10], &[1.0; 10]);
        // price = 5 - i: meets the lows at i = 4, reaches zero at 5, then goes negative.
        let touches =
            TrendLineDetector::default().touch_points(&w, -1.0, 5.0, TrendLineKind::Support);
        assert_eq!(touches, vec![4]);
    }

    #[test]
    fn fewer_than_two_swings_yields_nothing() {
        let (w, _) = three_peaks();
        assert!(TrendLineDetector::default()
            .detect(&w, &[high(10, 100.0)])
            .is_empty());
    }
}
