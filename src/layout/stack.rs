use crate::error::{ChartsmithError, Result};

/// Baseline strategy for stacked layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOffset {
    /// Baseline at zero; plain stacking.
    Zero,
    /// Byron–Wattenberg streamgraph baseline minimizing weighted slope.
    Wiggle,
    /// Baseline symmetric around zero.
    Silhouette,
    /// Column sums normalized to one.
    Expand,
}

impl StackOffset {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "wiggle" => StackOffset::Wiggle,
            "silhouette" => StackOffset::Silhouette,
            "expand" => StackOffset::Expand,
            _ => StackOffset::Zero,
        }
    }
}

/// Lower/upper band of one stacked series across all x positions.
#[derive(Debug, Clone)]
pub struct StackedBand {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Stacks `values[series][x]` with the given baseline strategy.
///
/// All series must share the same length; at each x, the upper band of
/// series k equals the lower band of series k+1.
pub fn stack_series(values: &[Vec<f64>], offset: StackOffset) -> Result<Vec<StackedBand>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let m = values[0].len();
    for (j, series) in values.iter().enumerate() {
        if series.len() != m {
            return Err(ChartsmithError::Data(format!(
                "stacked series {} has {} points, expected {}",
                j,
                series.len(),
                m
            )));
        }
    }
    if m == 0 {
        return Ok(values.iter().map(|_| StackedBand { lower: vec![], upper: vec![] }).collect());
    }

    // Expand rewrites the values; the other strategies only move the base.
    let normalized: Vec<Vec<f64>>;
    let values: &[Vec<f64>] = if offset == StackOffset::Expand {
        normalized = (0..values.len())
            .map(|j| {
                (0..m)
                    .map(|i| {
                        let sum: f64 = values.iter().map(|s| s[i]).sum();
                        if sum.abs() < f64::EPSILON { 0.0 } else { values[j][i] / sum }
                    })
                    .collect()
            })
            .collect();
        &normalized
    } else {
        values
    };

    let baseline = match offset {
        StackOffset::Zero | StackOffset::Expand => vec![0.0; m],
        StackOffset::Silhouette => (0..m)
            .map(|i| -values.iter().map(|s| s[i]).sum::<f64>() / 2.0)
            .collect(),
        StackOffset::Wiggle => wiggle_baseline(values, m),
    };

    let mut bands: Vec<StackedBand> = Vec::with_capacity(values.len());
    let mut running = baseline;
    for series in values {
        let lower = running.clone();
        let upper: Vec<f64> = lower.iter().zip(series).map(|(b, v)| b + v).collect();
        running = upper.clone();
        bands.push(StackedBand { lower, upper });
    }
    Ok(bands)
}

/// Byron–Wattenberg baseline: at each step the baseline moves against the
/// thickness-weighted mean slope of the layers, which minimizes total
/// wiggle.
fn wiggle_baseline(values: &[Vec<f64>], m: usize) -> Vec<f64> {
    let n = values.len();
    let mut baseline = vec![0.0; m];
    let mut y = 0.0;
    baseline[0] = y;
    for i in 1..m {
        let mut s1 = 0.0; // total thickness at x_i
        let mut s2 = 0.0; // weighted slope
        for j in 0..n {
            let sij0 = values[j][i];
            let sij1 = values[j][i - 1];
            // Slope of layer j's midline: half its own delta plus the full
            // deltas of the layers beneath it.
            let mut s3 = (sij0 - sij1) / 2.0;
            for below in values.iter().take(j) {
                s3 += below[i] - below[i - 1];
            }
            s1 += sij0;
            s2 += s3 * sij0;
        }
        if s1.abs() > f64::EPSILON {
            y -= s2 / s1;
        }
        baseline[i] = y;
    }
    baseline
}
