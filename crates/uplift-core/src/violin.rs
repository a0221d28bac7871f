//! Violin geometry for uplift density curves
//!
//! A violin is the density curve mirrored around a horizontal center line:
//! its thickness at each x encodes the local probability density of the
//! uplift. When the credible interval straddles zero, the silhouette is split
//! at the first grid point at or above zero into a loss lobe and a gain lobe
//! so the two probability masses can be shaded differently.
//!
//! All coordinates are abstract pixels: x grows to the right from 0 to
//! `width`, y grows downward from 0 to `height`.

use serde::{Deserialize, Serialize};
use uplift_stats::DensityCurve;

use crate::axis::{PercentScale, TickMark, TickSet};
use crate::types::Point2;

/// Pixel extent of a violin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolinConfig {
    /// Total width in pixels
    pub width: f64,
    /// Total height in pixels
    pub height: f64,
    /// Fraction of the half-height the densest point reaches
    pub fill_ratio: f64,
}

impl Default for ViolinConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 25.0,
            fill_ratio: 0.9,
        }
    }
}

impl ViolinConfig {
    fn center(&self) -> f64 {
        self.height / 2.0
    }

    fn max_half_extent(&self) -> f64 {
        self.center() * self.fill_ratio
    }
}

/// Which side of zero a lobe represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Negative uplift, drawn in the warning/danger color
    Loss,
    /// Positive uplift, drawn in the success color
    Gain,
}

/// One closed polygon of the violin silhouette
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ViolinLobe {
    pub tone: Tone,
    /// Closed outline; the last point equals the first
    pub points: Vec<Point2>,
}

/// Vertical line at the point estimate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct MeanMarker {
    pub x: f64,
    pub y_top: f64,
    pub y_bottom: f64,
}

/// Renderable violin
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ViolinGeometry {
    pub width: f64,
    pub height: f64,
    /// One lobe, or a loss lobe followed by a gain lobe
    pub lobes: Vec<ViolinLobe>,
    pub mean_marker: MeanMarker,
    pub tick_marks: Vec<TickMark>,
}

impl ViolinGeometry {
    /// Whether the silhouette was split at zero
    pub fn is_split(&self) -> bool {
        self.lobes.len() == 2
    }
}

/// Build the violin for `curve`, marking `mean`, on the scale of `ticks`
///
/// Returns `None` when the curve has fewer than two points or fewer than two
/// ticks are available to anchor the horizontal scale.
pub fn build_violin(
    curve: &DensityCurve,
    mean: f64,
    ticks: &TickSet,
    config: &ViolinConfig,
) -> Option<ViolinGeometry> {
    let xs = &curve.xs;
    let density = &curve.density;
    if xs.len() < 2 || density.len() != xs.len() || ticks.len() < 2 {
        return None;
    }

    let scale = PercentScale::from_ticks(ticks, config.width)?;
    let max_density = match curve.max_density() {
        d if d > 0.0 => d,
        _ => 1.0,
    };
    let half_extent = |d: f64| d / max_density * config.max_half_extent();

    let ci_low = xs[0];
    let ci_high = xs[xs.len() - 1];
    let straddles = ci_low < 0.0 && ci_high > 0.0;
    let zero_index = xs.iter().position(|&x| x >= 0.0);

    let lobes = match zero_index {
        Some(z) if straddles && z > 0 && z < xs.len() - 1 => vec![
            ViolinLobe {
                tone: Tone::Loss,
                points: lobe_outline(&xs[..=z], &density[..=z], &scale, &half_extent, config),
            },
            ViolinLobe {
                tone: Tone::Gain,
                points: lobe_outline(&xs[z..], &density[z..], &scale, &half_extent, config),
            },
        ],
        _ => vec![ViolinLobe {
            tone: if ci_low >= 0.0 { Tone::Gain } else { Tone::Loss },
            points: lobe_outline(xs, density, &scale, &half_extent, config),
        }],
    };

    let center = config.center();
    let mean_marker = MeanMarker {
        x: scale.to_pixel(mean),
        y_top: center - config.max_half_extent(),
        y_bottom: center + config.max_half_extent(),
    };

    Some(ViolinGeometry {
        width: config.width,
        height: config.height,
        lobes,
        mean_marker,
        tick_marks: scale.tick_marks(ticks),
    })
}

/// Closed outline: center start, top edge forward, center, bottom edge back, center start
fn lobe_outline(
    xs: &[f64],
    density: &[f64],
    scale: &PercentScale,
    half_extent: &impl Fn(f64) -> f64,
    config: &ViolinConfig,
) -> Vec<Point2> {
    let center = config.center();
    let mut points = Vec::with_capacity(xs.len() * 2 + 3);

    let first_x = scale.to_pixel(xs[0]);
    let last_x = scale.to_pixel(xs[xs.len() - 1]);

    points.push(Point2::new(first_x, center));
    for (&x, &d) in xs.iter().zip(density) {
        points.push(Point2::new(scale.to_pixel(x), center - half_extent(d)));
    }
    points.push(Point2::new(last_x, center));
    for (&x, &d) in xs.iter().zip(density).rev() {
        points.push(Point2::new(scale.to_pixel(x), center + half_extent(d)));
    }
    points.push(Point2::new(first_x, center));

    points
}
