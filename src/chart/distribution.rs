use serde::{Deserialize, Serialize};

use crate::chart::series_color;
use crate::error::{ChartsmithError, Result};
use crate::layout::kde::gaussian_kde;
use crate::render::axis;
use crate::render::curve;
use crate::render::svg;
use crate::scale::{BandScale, LinearScale};
use crate::theme::Theme;

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    400.0
}

fn default_bins() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_overlap() -> f64 {
    0.5
}

/// A labeled sample of numeric values, shared by the grouped
/// distribution charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueGroup {
    pub label: String,
    pub values: Vec<f64>,
}

/// Classic binned histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub values: Vec<f64>,
    #[serde(default = "default_bins")]
    pub bins: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub show_axes: bool,
}

pub fn render_histogram(spec: &HistogramSpec, theme: &Theme) -> Result<String> {
    if spec.values.is_empty() {
        return Err(ChartsmithError::Data("histogram requires at least one value".into()));
    }
    let bins = spec.bins.max(1) as usize;

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in &spec.values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let bin_width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in &spec.values {
        let idx = (((v - lo) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = LinearScale::new((lo, hi), (plot.x, plot.x + plot.width));
    let max_count = *counts.iter().max().unwrap_or(&1) as f64;
    let y = LinearScale::new((0.0, max_count), (plot.y + plot.height, plot.y)).nice(5);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    if spec.show_axes {
        let y_ticks: Vec<(f64, String)> =
            y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
        axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
        let x_ticks: Vec<(f64, String)> =
            x.ticks(8).into_iter().map(|t| (x.apply(t.value), t.label)).collect();
        axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;
    }

    let fill = series_color(spec.color.as_deref(), 0, theme)?;
    let baseline = y.apply(0.0);
    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x0 = x.apply(lo + i as f64 * bin_width);
        let x1 = x.apply(lo + (i + 1) as f64 * bin_width);
        let top = y.apply(count as f64);
        svg::rect(&mut out, x0, top, (x1 - x0 - 1.0).max(1.0), baseline - top, &fill, "none", 0.0, 1.0)?;
    }
    Ok(out)
}

/// Kernel density estimate drawn as a filled area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensitySpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub values: Vec<f64>,
    /// 0 selects the rule-of-thumb bandwidth.
    #[serde(default)]
    pub bandwidth: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub show_axes: bool,
}

pub fn render_density(spec: &DensitySpec, theme: &Theme) -> Result<String> {
    if spec.values.is_empty() {
        return Err(ChartsmithError::Data("density chart requires at least one value".into()));
    }
    let curve = gaussian_kde(&spec.values, spec.bandwidth, 200)?;

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = LinearScale::new((curve.x[0], *curve.x.last().unwrap_or(&1.0)), (plot.x, plot.x + plot.width));
    let y = LinearScale::new((0.0, curve.max_density()), (plot.y + plot.height, plot.y));

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    if spec.show_axes {
        let x_ticks: Vec<(f64, String)> =
            x.ticks(8).into_iter().map(|t| (x.apply(t.value), t.label)).collect();
        axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;
    }

    let color = series_color(spec.color.as_deref(), 0, theme)?;
    let baseline = y.apply(0.0);
    let mut pts: Vec<(f64, f64)> =
        curve.x.iter().zip(&curve.y).map(|(&cx, &cy)| (x.apply(cx), y.apply(cy))).collect();
    // Close the area down to the baseline.
    pts.insert(0, (x.apply(curve.x[0]), baseline));
    pts.push((x.apply(*curve.x.last().unwrap_or(&0.0)), baseline));
    let d = format!("{} Z", curve::polyline_d(&pts));
    svg::path(&mut out, &d, &color, "none", 0.0, 0.55)?;
    Ok(out)
}

/// Five-number summary used by the boxplot.
struct BoxStats {
    q1: f64,
    median: f64,
    q3: f64,
    whisker_lo: f64,
    whisker_hi: f64,
    outliers: Vec<f64>,
}

fn box_stats(values: &[f64]) -> BoxStats {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;
    let whisker_lo = sorted.iter().cloned().find(|v| *v >= lo_fence).unwrap_or(q1);
    let whisker_hi = sorted.iter().cloned().rev().find(|v| *v <= hi_fence).unwrap_or(q3);
    let outliers = sorted.iter().cloned().filter(|v| *v < lo_fence || *v > hi_fence).collect();
    BoxStats { q1, median, q3, whisker_lo, whisker_hi, outliers }
}

/// Linear-interpolation quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let base = pos.floor() as usize;
    let frac = pos - base as f64;
    if base + 1 < sorted.len() {
        sorted[base] + frac * (sorted[base + 1] - sorted[base])
    } else {
        sorted[base]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub groups: Vec<ValueGroup>,
}

pub fn render_boxplot(spec: &BoxplotSpec, theme: &Theme) -> Result<String> {
    if spec.groups.is_empty() || spec.groups.iter().any(|g| g.values.is_empty()) {
        return Err(ChartsmithError::Data("boxplot requires non-empty groups".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = BandScale::new(spec.groups.iter().map(|g| g.label.clone()), (plot.x, plot.x + plot.width))
        .with_padding(0.35, 0.2);
    let y = LinearScale::from_values(
        spec.groups.iter().flat_map(|g| g.values.iter()),
        (plot.y + plot.height, plot.y),
    )
    .nice(5);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    let y_ticks: Vec<(f64, String)> =
        y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
    axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
    let x_ticks: Vec<(f64, String)> =
        x.ticks().iter().map(|t| (x.position(t.value as usize) + x.bandwidth() / 2.0, t.label.clone())).collect();
    axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;

    for (i, g) in spec.groups.iter().enumerate() {
        let stats = box_stats(&g.values);
        let cx = x.center(&g.label);
        let half = x.bandwidth() / 2.0;
        let color = theme.series_color(i);

        // Whisker stems and caps.
        svg::line(&mut out, cx, y.apply(stats.whisker_lo), cx, y.apply(stats.q1), &theme.axis_color, 1.0)?;
        svg::line(&mut out, cx, y.apply(stats.q3), cx, y.apply(stats.whisker_hi), &theme.axis_color, 1.0)?;
        svg::line(&mut out, cx - half / 2.0, y.apply(stats.whisker_lo), cx + half / 2.0, y.apply(stats.whisker_lo), &theme.axis_color, 1.0)?;
        svg::line(&mut out, cx - half / 2.0, y.apply(stats.whisker_hi), cx + half / 2.0, y.apply(stats.whisker_hi), &theme.axis_color, 1.0)?;

        let top = y.apply(stats.q3);
        let bottom = y.apply(stats.q1);
        svg::rect(&mut out, cx - half, top, half * 2.0, bottom - top, &color, &theme.axis_color, 1.0, 0.85)?;
        svg::line(&mut out, cx - half, y.apply(stats.median), cx + half, y.apply(stats.median), "#ffffff", 2.0)?;

        for &o in &stats.outliers {
            svg::circle(&mut out, cx, y.apply(o), 3.0, "none", &color, 1.0, 1.0)?;
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolinSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub groups: Vec<ValueGroup>,
    #[serde(default)]
    pub bandwidth: f64,
}

pub fn render_violin(spec: &ViolinSpec, theme: &Theme) -> Result<String> {
    if spec.groups.is_empty() || spec.groups.iter().any(|g| g.values.is_empty()) {
        return Err(ChartsmithError::Data("violin plot requires non-empty groups".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = BandScale::new(spec.groups.iter().map(|g| g.label.clone()), (plot.x, plot.x + plot.width))
        .with_padding(0.3, 0.15);

    let curves: Vec<_> = spec
        .groups
        .iter()
        .map(|g| gaussian_kde(&g.values, spec.bandwidth, 100))
        .collect::<Result<Vec<_>>>()?;

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut max_density = 0.0f64;
    for c in &curves {
        lo = lo.min(c.x[0]);
        hi = hi.max(*c.x.last().unwrap_or(&0.0));
        max_density = max_density.max(c.max_density());
    }
    let y = LinearScale::new((lo, hi), (plot.y + plot.height, plot.y)).nice(5);
    let half_width = x.bandwidth() / 2.0;
    let width_scale = LinearScale::new((0.0, max_density.max(1e-12)), (0.0, half_width));

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    let y_ticks: Vec<(f64, String)> =
        y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
    axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
    let x_ticks: Vec<(f64, String)> =
        x.ticks().iter().map(|t| (x.position(t.value as usize) + x.bandwidth() / 2.0, t.label.clone())).collect();
    axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;

    for (i, (g, curve)) in spec.groups.iter().zip(&curves).enumerate() {
        let cx = x.center(&g.label);
        // Mirror the density to both sides of the group center.
        let mut pts: Vec<(f64, f64)> = curve
            .x
            .iter()
            .zip(&curve.y)
            .map(|(&vx, &vy)| (cx - width_scale.apply(vy), y.apply(vx)))
            .collect();
        let right: Vec<(f64, f64)> = curve
            .x
            .iter()
            .zip(&curve.y)
            .rev()
            .map(|(&vx, &vy)| (cx + width_scale.apply(vy), y.apply(vx)))
            .collect();
        pts.extend(right);
        svg::polygon(&mut out, &pts, &theme.series_color(i), "none", 0.0, 0.8)?;
    }
    Ok(out)
}

/// Overlapping density rows, one per group, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgelineSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub groups: Vec<ValueGroup>,
    #[serde(default)]
    pub bandwidth: f64,
    /// How far each ridge may spill into the row above, in row heights.
    #[serde(default = "default_overlap")]
    pub overlap: f64,
}

pub fn render_ridgeline(spec: &RidgelineSpec, theme: &Theme) -> Result<String> {
    if spec.groups.is_empty() || spec.groups.iter().any(|g| g.values.is_empty()) {
        return Err(ChartsmithError::Data("ridgeline requires non-empty groups".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let curves: Vec<_> = spec
        .groups
        .iter()
        .map(|g| gaussian_kde(&g.values, spec.bandwidth, 150))
        .collect::<Result<Vec<_>>>()?;

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut max_density = 0.0f64;
    for c in &curves {
        lo = lo.min(c.x[0]);
        hi = hi.max(*c.x.last().unwrap_or(&0.0));
        max_density = max_density.max(c.max_density());
    }
    let x = LinearScale::new((lo, hi), (plot.x, plot.x + plot.width));

    let rows = spec.groups.len();
    let row_height = plot.height / rows as f64;
    let ridge_height = row_height * (1.0 + spec.overlap.clamp(0.0, 2.0));
    let amp = LinearScale::new((0.0, max_density.max(1e-12)), (0.0, ridge_height));

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    let x_ticks: Vec<(f64, String)> =
        x.ticks(8).into_iter().map(|t| (x.apply(t.value), t.label)).collect();
    axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;

    for (i, (g, curve)) in spec.groups.iter().zip(&curves).enumerate() {
        let baseline = plot.y + (i + 1) as f64 * row_height;
        let mut pts: Vec<(f64, f64)> = vec![(x.apply(curve.x[0]), baseline)];
        for (&vx, &vy) in curve.x.iter().zip(&curve.y) {
            pts.push((x.apply(vx), baseline - amp.apply(vy)));
        }
        pts.push((x.apply(*curve.x.last().unwrap_or(&0.0)), baseline));
        let d = format!("{} Z", curve::polyline_d(&pts));
        svg::path(&mut out, &d, &theme.series_color(i), "#ffffff", 1.0, 0.85)?;

        svg::text(
            &mut out,
            plot.x - 8.0,
            baseline - 4.0,
            &g.label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "end",
            "normal",
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, 0.5) - 2.5).abs() < 1e-9);
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-9);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn box_stats_flag_outliers() {
        let mut values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        values.push(100.0);
        let stats = box_stats(&values);
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(stats.whisker_hi <= 19.0);
    }

    #[test]
    fn histogram_bars_cover_all_values() {
        let theme = Theme::default();
        let spec = HistogramSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            values: vec![1.0, 1.1, 1.2, 5.0, 9.0, 9.1],
            bins: 4,
            color: None,
            show_axes: false,
        };
        let out = render_histogram(&spec, &theme).unwrap();
        // Bins 1 and 3 are occupied, 2 may or may not be; at least 2 bars.
        assert!(out.matches("<rect").count() >= 2);
    }

    #[test]
    fn single_value_histogram_does_not_divide_by_zero() {
        let theme = Theme::default();
        let spec = HistogramSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            values: vec![7.0],
            bins: 10,
            color: None,
            show_axes: false,
        };
        let out = render_histogram(&spec, &theme).unwrap();
        assert_eq!(out.matches("<rect").count(), 1);
    }

    #[test]
    fn violin_mirrors_one_polygon_per_group() {
        let theme = Theme::default();
        let spec = ViolinSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            groups: vec![
                ValueGroup { label: "a".into(), values: vec![1.0, 2.0, 2.5, 3.0] },
                ValueGroup { label: "b".into(), values: vec![4.0, 5.0, 5.5] },
            ],
            bandwidth: 0.0,
        };
        let out = render_violin(&spec, &theme).unwrap();
        assert_eq!(out.matches("<polygon").count(), 2);
    }

    #[test]
    fn ridgeline_rows_in_group_order() {
        let theme = Theme::default();
        let spec = RidgelineSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            groups: vec![
                ValueGroup { label: "top".into(), values: vec![1.0, 2.0, 3.0] },
                ValueGroup { label: "bottom".into(), values: vec![1.0, 2.0, 3.0] },
            ],
            bandwidth: 0.0,
            overlap: 0.5,
        };
        let out = render_ridgeline(&spec, &theme).unwrap();
        let top = out.find(">top<").unwrap();
        let bottom = out.find(">bottom<").unwrap();
        assert!(top < bottom);
    }
}
