//! Arc curves for thrown projectiles
//!
//! Высота — чистая функция горизонтального прогресса (0.0 → 1.0), не времени.
//! Поэтому переменный frame rate не искажает форму дуги.

use serde::{Deserialize, Serialize};

/// Keyframe of a piecewise-linear arc curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcKey {
    pub time: f32,
    pub value: f32,
}

impl ArcKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Normalized arc shape: progress in [0, 1] → height factor
///
/// Итоговая высота = evaluate(progress) × (total_distance / arc_height_divisor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum ArcCurve {
    /// 4t(1 − t): 0 at both ends, 1.0 at the midpoint
    #[default]
    Parabolic,
    /// Piecewise-linear keys, sorted by time. Clamped outside the key range.
    Keyframes(Vec<ArcKey>),
}

impl ArcCurve {
    pub fn evaluate(&self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);

        match self {
            ArcCurve::Parabolic => 4.0 * t * (1.0 - t),
            ArcCurve::Keyframes(keys) => evaluate_keys(keys, t),
        }
    }
}

fn evaluate_keys(keys: &[ArcKey], t: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return 0.0;
    };

    if t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }

    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.time && t <= b.time {
            let span = b.time - a.time;
            if span <= f32::EPSILON {
                return b.value;
            }
            let local = (t - a.time) / span;
            return a.value + (b.value - a.value) * local;
        }
    }

    last.value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parabolic_endpoints_and_peak() {
        let curve = ArcCurve::Parabolic;
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(1.0), 0.0);
        assert_eq!(curve.evaluate(0.5), 1.0);
    }

    #[test]
    fn test_parabolic_clamps_progress() {
        let curve = ArcCurve::Parabolic;
        assert_eq!(curve.evaluate(-3.0), 0.0);
        assert_eq!(curve.evaluate(7.0), 0.0);
    }

    #[test]
    fn test_keyframes_interpolate_linearly() {
        let curve = ArcCurve::Keyframes(vec![
            ArcKey::new(0.0, 0.0),
            ArcKey::new(0.5, 2.0),
            ArcKey::new(1.0, 0.0),
        ]);

        assert_eq!(curve.evaluate(0.25), 1.0);
        assert_eq!(curve.evaluate(0.5), 2.0);
        assert_eq!(curve.evaluate(0.75), 1.0);
    }

    #[test]
    fn test_keyframes_clamp_outside_range() {
        let curve = ArcCurve::Keyframes(vec![ArcKey::new(0.2, 0.5), ArcKey::new(0.8, 1.5)]);

        assert_eq!(curve.evaluate(0.0), 0.5);
        assert_eq!(curve.evaluate(1.0), 1.5);
    }

    #[test]
    fn test_empty_keyframes_are_flat() {
        let curve = ArcCurve::Keyframes(Vec::new());
        assert_eq!(curve.evaluate(0.5), 0.0);
    }
}
