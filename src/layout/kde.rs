use kernel_density_estimation::prelude::*;

use crate::error::{ChartsmithError, Result};

/// A kernel density estimate evaluated on a uniform grid.
#[derive(Debug, Clone)]
pub struct DensityCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// The bandwidth actually used (resolved when the caller passed 0).
    pub bandwidth: f64,
}

impl DensityCurve {
    pub fn max_density(&self) -> f64 {
        self.y.iter().cloned().fold(0.0, f64::max)
    }
}

/// Gaussian kernel density estimate of `samples`.
///
/// A `bandwidth` of 0 selects the rule-of-thumb `1.06 * sigma * n^(-1/5)`.
/// The grid spans the data range with `grid_size` evenly spaced points.
pub fn gaussian_kde(samples: &[f64], bandwidth: f64, grid_size: usize) -> Result<DensityCurve> {
    if samples.is_empty() {
        return Err(ChartsmithError::Data("density estimation needs at least one sample".into()));
    }
    let n = samples.len();
    let grid_size = grid_size.max(2);

    let h = if bandwidth > 0.0 {
        bandwidth
    } else {
        let sigma = std_dev(samples);
        if sigma > 0.0 {
            1.06 * sigma * (n as f64).powf(-0.2)
        } else {
            1.0
        }
    };

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in samples {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    // A degenerate range still needs a drawable span.
    if hi - lo < f64::EPSILON {
        lo -= h;
        hi += h;
    }

    let step = (hi - lo) / (grid_size - 1) as f64;
    let grid: Vec<f64> = (0..grid_size).map(|i| lo + i as f64 * step).collect();

    let observations: Vec<f32> = samples.iter().map(|&v| v as f32).collect();
    let eval_points: Vec<f32> = grid.iter().map(|&v| v as f32).collect();
    let fixed = Box::new(move |_: &[f32]| h as f32);
    let kde = KernelDensityEstimator::new(observations, fixed, Normal);
    let y: Vec<f64> = kde.pdf(&eval_points).iter().map(|&v| v as f64).collect();

    Ok(DensityCurve { x: grid, y, bandwidth: h })
}

fn std_dev(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_integrates_to_roughly_one() {
        let samples: Vec<f64> = (0..100).map(|i| (i as f64) / 10.0).collect();
        let curve = gaussian_kde(&samples, 0.0, 256).unwrap();
        let step = curve.x[1] - curve.x[0];
        let integral: f64 = curve.y.iter().sum::<f64>() * step;
        // Mass in the tails beyond the data range is lost, so allow slack.
        assert!(integral > 0.8 && integral < 1.1, "integral was {}", integral);
    }

    #[test]
    fn zero_bandwidth_uses_rule_of_thumb() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let curve = gaussian_kde(&samples, 0.0, 64).unwrap();
        let sigma = std_dev(&samples);
        let expected = 1.06 * sigma * 5f64.powf(-0.2);
        assert!((curve.bandwidth - expected).abs() < 1e-9);
    }

    #[test]
    fn identical_samples_do_not_collapse() {
        let curve = gaussian_kde(&[4.0, 4.0, 4.0], 0.0, 32).unwrap();
        assert!(curve.x.first().unwrap() < curve.x.last().unwrap());
        assert!(curve.max_density() > 0.0);
    }

    #[test]
    fn empty_samples_are_an_error() {
        assert!(gaussian_kde(&[], 1.0, 64).is_err());
    }
}
