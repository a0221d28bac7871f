//! Synthetic posterior draws
//!
//! Some summaries arrive with a mean and a credible interval but no posterior
//! draws. To still draw a violin for them, a symmetric Gaussian sample set is
//! synthesized around the mean with a spread estimated from the interval
//! width. The generator is seeded so the same summary always renders the same
//! silhouette.

use std::f64::consts::PI;

/// Default number of synthesized draws
pub const DEFAULT_SYNTHETIC_DRAWS: usize = 100;

/// Standard deviation implied by a credible interval, `|hi - lo| / 4`
///
/// A 95% interval of a normal distribution spans close to four standard
/// deviations.
pub fn std_from_interval(ci_low: f64, ci_high: f64) -> f64 {
    (ci_high - ci_low).abs() / 4.0
}

/// Draw `n` samples from `Normal(mean, std)` with a seeded generator
pub fn synthesize_gaussian(mean: f64, std: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = SimpleRng::new(seed);
    let mut draws = Vec::with_capacity(n);
    while draws.len() < n {
        let (g1, g2) = rng.gaussian_pair();
        draws.push(mean + std * g1);
        if draws.len() < n {
            draws.push(mean + std * g2);
        }
    }
    draws
}

// xorshift64
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let state = seed.wrapping_add(0x9E3779B97F4A7C15);
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }

    /// Box-Muller transform
    fn gaussian_pair(&mut self) -> (f64, f64) {
        let u1 = self.next_f64().max(1e-10);
        let u2 = self.next_f64();

        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;

        (r * theta.cos(), r * theta.sin())
    }
}
