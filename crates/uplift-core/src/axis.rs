//! Percentage axis for uplift violins
//!
//! Provides tick selection over a fractional uplift range and the linear
//! mapping from uplift values to horizontal pixel positions.

use serde::{Deserialize, Serialize};

/// Ticks are spread at most this many times before giving up
const MAX_WIDEN_ATTEMPTS: usize = 12;

/// Initial outward padding when widening, in fractional uplift (1 point)
const WIDEN_PAD: f64 = 0.01;

/// Evenly spaced integer percentage ticks
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct TickSet {
    /// Distance between consecutive ticks in percentage points (1, 5 or 10)
    pub step: i32,
    /// Tick values in percentage points, ascending
    pub values: Vec<i32>,
}

impl TickSet {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smallest tick as a fraction (e.g. -5% -> -0.05)
    pub fn min_fraction(&self) -> Option<f64> {
        self.values.first().map(|&v| v as f64 / 100.0)
    }

    /// Largest tick as a fraction
    pub fn max_fraction(&self) -> Option<f64> {
        self.values.last().map(|&v| v as f64 / 100.0)
    }
}

/// Most ticks a set may hold; wider ranges get no ticks
pub const MAX_TICKS: i64 = 1000;

/// Tick step for a span of whole percentage points
pub fn tick_step(range: i64) -> i32 {
    if range > 30 {
        10
    } else if range > 10 {
        5
    } else {
        1
    }
}

/// Pick percentage ticks covering `[min, max]` (fractional uplift values)
///
/// The bounds are converted to whole percentage points inward
/// (`ceil(min * 100)`, `floor(max * 100)`), a step of 1, 5 or 10 is chosen by
/// span, and both ends are snapped inward to multiples of the step. The
/// result can be empty when the range is too narrow to hold a multiple of
/// the step; see [`widened_percent_ticks`]. It is also empty when the range
/// would need more than [`MAX_TICKS`] ticks or leaves the `i32` range.
pub fn percent_ticks(min: f64, max: f64) -> TickSet {
    if !min.is_finite() || !max.is_finite() {
        return TickSet::default();
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    // `as` saturates for out-of-range floats
    let min_pct = (min * 100.0).ceil() as i64;
    let max_pct = (max * 100.0).floor() as i64;
    let step = tick_step(max_pct.saturating_sub(min_pct));

    let (Ok(min_pct), Ok(max_pct)) = (i32::try_from(min_pct), i32::try_from(max_pct)) else {
        tracing::debug!(min, max, "tick range outside labelable percentages");
        return TickSet {
            step,
            values: Vec::new(),
        };
    };

    let first = ceil_to_multiple(min_pct.into(), step.into());
    let last = floor_to_multiple(max_pct.into(), step.into());
    if first > last {
        return TickSet {
            step,
            values: Vec::new(),
        };
    }

    let count = (last - first) / i64::from(step) + 1;
    if count > MAX_TICKS {
        tracing::debug!(min, max, count, "tick range too wide");
        return TickSet {
            step,
            values: Vec::new(),
        };
    }

    let values = (first..=last)
        .step_by(step as usize)
        .filter_map(|v| i32::try_from(v).ok())
        .collect();

    TickSet { step, values }
}

/// Like [`percent_ticks`], padding the range outward until two ticks fit
///
/// Ranges already too wide for [`MAX_TICKS`] are returned unticked.
pub fn widened_percent_ticks(min: f64, max: f64) -> TickSet {
    let mut ticks = percent_ticks(min, max);
    if ticks.is_empty() && is_too_wide(min, max) {
        return ticks;
    }
    let mut pad = WIDEN_PAD;

    for _ in 0..MAX_WIDEN_ATTEMPTS {
        if ticks.len() >= 2 {
            break;
        }
        tracing::debug!(min, max, pad, "tick range too narrow, widening");
        ticks = percent_ticks(min - pad, max + pad);
        pad *= 2.0;
    }

    ticks
}

// Even at the coarsest step the range needs more than MAX_TICKS ticks
fn is_too_wide(min: f64, max: f64) -> bool {
    let coarsest = (max - min).abs() * 100.0 / 10.0;
    coarsest.is_nan() || coarsest >= MAX_TICKS as f64
}

fn ceil_to_multiple(value: i64, step: i64) -> i64 {
    -((-value).div_euclid(step)) * step
}

fn floor_to_multiple(value: i64, step: i64) -> i64 {
    value.div_euclid(step) * step
}

/// Format a tick value for display
pub fn format_percent(value: i32) -> String {
    format!("{}%", value)
}

/// A tick guide in pixel space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct TickMark {
    /// Tick value in percentage points
    pub value: i32,
    /// Horizontal pixel position
    pub x: f64,
    /// Label text, e.g. "-5%"
    pub label: String,
}

/// Linear map from the tick range (as fractions) to `[0, width]` pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentScale {
    min: f64,
    range: f64,
    width: f64,
}

impl PercentScale {
    /// Scale spanning the first to last tick
    ///
    /// A single tick gives a zero span, which is treated as a span of 1.
    pub fn from_ticks(ticks: &TickSet, width: f64) -> Option<Self> {
        let min = ticks.min_fraction()?;
        let max = ticks.max_fraction()?;
        let span = max - min;
        Some(Self {
            min,
            range: if span == 0.0 { 1.0 } else { span },
            width,
        })
    }

    /// Pixel position of a fractional uplift value
    pub fn to_pixel(&self, value: f64) -> f64 {
        (value - self.min) / self.range * self.width
    }

    /// Fractional uplift value at a pixel position
    pub fn to_value(&self, px: f64) -> f64 {
        self.min + px / self.width * self.range
    }

    /// Pixel guides for every tick
    pub fn tick_marks(&self, ticks: &TickSet) -> Vec<TickMark> {
        ticks
            .values
            .iter()
            .map(|&value| TickMark {
                value,
                x: self.to_pixel(value as f64 / 100.0),
                label: format_percent(value),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_positive_range() {
        let ticks = percent_ticks(0.001, 0.027);
        assert_eq!(ticks.step, 1);
        assert_eq!(ticks.values, vec![1, 2]);
    }

    #[test]
    fn test_range_with_step_five() {
        let ticks = percent_ticks(-0.12, 0.08);
        assert_eq!(ticks.step, 5);
        assert_eq!(ticks.values, vec![-10, -5, 0, 5]);
    }

    #[test]
    fn test_range_with_step_ten() {
        let ticks = percent_ticks(-0.255, 0.31);
        assert_eq!(ticks.step, 10);
        assert_eq!(ticks.values, vec![-20, -10, 0, 10, 20, 30]);
    }

    #[test]
    fn test_empty_when_too_narrow() {
        assert!(percent_ticks(0.101, 0.109).is_empty());
    }

    #[test]
    fn test_non_finite() {
        assert!(percent_ticks(f64::NAN, 0.1).is_empty());
    }

    #[test]
    fn test_widening() {
        let ticks = widened_percent_ticks(0.1, 0.1);
        assert!(ticks.len() >= 2);
        assert!(ticks.values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_widening_keeps_valid_ranges() {
        assert_eq!(widened_percent_ticks(0.001, 0.027), percent_ticks(0.001, 0.027));
    }

    #[test]
    fn test_huge_range_is_unticked() {
        let ticks = percent_ticks(-1e8, 1e8);
        assert!(ticks.is_empty());
        assert_eq!(ticks.step, 10);

        assert!(percent_ticks(-1e6, 1e6).is_empty());
        assert!(percent_ticks(f64::MIN, f64::MAX).is_empty());
        assert!(widened_percent_ticks(-1e8, 1e8).is_empty());
    }

    #[test]
    fn test_tick_budget_boundary() {
        assert_eq!(percent_ticks(0.0, 99.9).len(), MAX_TICKS as usize);
        assert!(percent_ticks(0.0, 100.0).is_empty());
    }

    #[test]
    fn test_snap_negative() {
        assert_eq!(ceil_to_multiple(-12, 5), -10);
        assert_eq!(floor_to_multiple(-12, 5), -15);
        assert_eq!(ceil_to_multiple(12, 5), 15);
        assert_eq!(floor_to_multiple(12, 5), 10);
    }

    #[test]
    fn test_scale_transform() {
        let ticks = TickSet {
            step: 5,
            values: vec![-10, -5, 0, 5, 10],
        };
        let scale = PercentScale::from_ticks(&ticks, 100.0).unwrap();

        assert!((scale.to_pixel(-0.1) - 0.0).abs() < 1e-9);
        assert!((scale.to_pixel(0.0) - 50.0).abs() < 1e-9);
        assert!((scale.to_pixel(0.1) - 100.0).abs() < 1e-9);
        assert!((scale.to_value(scale.to_pixel(0.037)) - 0.037).abs() < 1e-12);
    }

    #[test]
    fn test_single_tick_scale() {
        let ticks = TickSet {
            step: 1,
            values: vec![3],
        };
        let scale = PercentScale::from_ticks(&ticks, 100.0).unwrap();
        assert!((scale.to_pixel(0.03)).abs() < 1e-12);
        assert!(PercentScale::from_ticks(&TickSet::default(), 100.0).is_none());
    }

    #[test]
    fn test_tick_marks() {
        let ticks = percent_ticks(-0.02, 0.02);
        let scale = PercentScale::from_ticks(&ticks, 80.0).unwrap();
        let marks = scale.tick_marks(&ticks);

        assert_eq!(marks.len(), 5);
        assert_eq!(marks[0].label, "-2%");
        assert!((marks[2].x - 40.0).abs() < 1e-9);
    }
}
