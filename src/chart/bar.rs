use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::chart::{format_value, series_color};
use crate::data::LabeledValue;
use crate::error::{ChartsmithError, Result};
use crate::render::axis;
use crate::render::svg;
use crate::scale::{BandScale, LinearScale};
use crate::theme::Theme;

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    400.0
}

fn default_true() -> bool {
    true
}

/// Vertical bar chart over labeled values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub data: Vec<LabeledValue>,
    /// Uniform bar color; the palette's first color when absent.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub show_values: bool,
    #[serde(default = "default_true")]
    pub show_axes: bool,
    #[serde(default)]
    pub show_grid: bool,
}

pub fn render_bar(spec: &BarChartSpec, theme: &Theme) -> Result<String> {
    if spec.data.is_empty() {
        return Err(ChartsmithError::Data("bar chart requires at least one data point".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = BandScale::new(spec.data.iter().map(|d| d.label.clone()), (plot.x, plot.x + plot.width))
        .with_padding(0.2, 0.1);

    let max = spec.data.iter().map(|d| d.value).fold(0.0, f64::max);
    let min = spec.data.iter().map(|d| d.value).fold(0.0, f64::min);
    let y = LinearScale::new((min.min(0.0), max.max(0.0)), (plot.y + plot.height, plot.y)).nice(5);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    let y_ticks: Vec<(f64, String)> =
        y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
    if spec.show_grid {
        axis::draw_h_grid(&mut out, &y_ticks, &plot, theme)?;
    }
    if spec.show_axes {
        axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
        let x_ticks: Vec<(f64, String)> =
            x.ticks().iter().map(|t| (x.position(t.value as usize) + x.bandwidth() / 2.0, t.label.clone())).collect();
        axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;
    }

    let fill = series_color(spec.color.as_deref(), 0, theme)?;
    let baseline = y.apply(0.0);
    for item in &spec.data {
        let x0 = x.apply(&item.label);
        let yv = y.apply(item.value);
        let (top, bottom) = if yv < baseline { (yv, baseline) } else { (baseline, yv) };
        svg::rect(&mut out, x0, top, x.bandwidth(), bottom - top, &fill, "none", 0.0, 1.0)?;
        if spec.show_values {
            svg::text(
                &mut out,
                x0 + x.bandwidth() / 2.0,
                top - 5.0,
                &format_value(item.value),
                theme.tick_font_size,
                &theme.font_family,
                &theme.label_color,
                "middle",
                "normal",
            )?;
        }
    }
    Ok(out)
}

/// Lollipop chart: a stem from the baseline topped with a dot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LollipopSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub data: Vec<LabeledValue>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub show_axes: bool,
}

pub fn render_lollipop(spec: &LollipopSpec, theme: &Theme) -> Result<String> {
    if spec.data.is_empty() {
        return Err(ChartsmithError::Data("lollipop chart requires at least one data point".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = BandScale::new(spec.data.iter().map(|d| d.label.clone()), (plot.x, plot.x + plot.width))
        .with_padding(0.5, 0.25);
    let max = spec.data.iter().map(|d| d.value).fold(0.0, f64::max);
    let y = LinearScale::new((0.0, max.max(0.0)), (plot.y + plot.height, plot.y)).nice(5);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    if spec.show_axes {
        let y_ticks: Vec<(f64, String)> =
            y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
        axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
        let x_ticks: Vec<(f64, String)> =
            x.ticks().iter().map(|t| (x.position(t.value as usize) + x.bandwidth() / 2.0, t.label.clone())).collect();
        axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;
    }

    let color = series_color(spec.color.as_deref(), 0, theme)?;
    let baseline = y.apply(0.0);
    for item in &spec.data {
        let cx = x.center(&item.label);
        let cy = y.apply(item.value);
        svg::line(&mut out, cx, baseline, cx, cy, &color, 2.0)?;
        svg::circle(&mut out, cx, cy, 6.0, &color, "none", 0.0, 1.0)?;
    }
    Ok(out)
}

/// Bars arranged radially around the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularBarSpec {
    #[serde(default = "default_square")]
    pub width: f64,
    #[serde(default = "default_square")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub data: Vec<LabeledValue>,
    /// Donut-hole size as a fraction of the outer radius, in [0, 1).
    #[serde(default = "default_inner_ratio")]
    pub inner_ratio: f64,
}

fn default_square() -> f64 {
    600.0
}

fn default_inner_ratio() -> f64 {
    0.25
}

pub fn render_circular_bar(spec: &CircularBarSpec, theme: &Theme) -> Result<String> {
    if spec.data.is_empty() {
        return Err(ChartsmithError::Data("circular bar chart requires at least one data point".into()));
    }

    let cx = spec.width / 2.0;
    let cy = spec.height / 2.0;
    let outer = spec.width.min(spec.height) / 2.0 - 40.0;
    let inner = outer * spec.inner_ratio.clamp(0.0, 0.95);

    // Angle is a band scale over the full turn; radius is linear in value.
    let angle = BandScale::new(spec.data.iter().map(|d| d.label.clone()), (0.0, TAU))
        .with_padding(0.15, 0.0);
    let max = spec.data.iter().map(|d| d.value).fold(0.0, f64::max);
    let radius = LinearScale::new((0.0, max.max(1e-9)), (inner, outer));

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    for (i, item) in spec.data.iter().enumerate() {
        let start = angle.apply(&item.label);
        let end = start + angle.bandwidth();
        let r = radius.apply(item.value);
        let d = svg::annular_sector_d(cx, cy, inner, r, start, end);
        svg::path(&mut out, &d, &theme.series_color(i), "none", 0.0, 1.0)?;

        let mid = (start + end) / 2.0;
        let (lx, ly) = svg::polar(cx, cy, r + 12.0, mid);
        svg::text(
            &mut out,
            lx,
            ly,
            &item.label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "middle",
            "normal",
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Vec<LabeledValue> {
        vec![
            LabeledValue { label: "A".into(), value: 10.0 },
            LabeledValue { label: "B".into(), value: 20.0 },
            LabeledValue { label: "C".into(), value: 15.0 },
        ]
    }

    fn spec() -> BarChartSpec {
        BarChartSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            data: data(),
            color: None,
            show_values: true,
            show_axes: true,
            show_grid: false,
        }
    }

    #[test]
    fn one_rect_per_bar_with_value_labels() {
        let theme = Theme::default();
        let out = render_bar(&spec(), &theme).unwrap();
        // Axis helpers emit no rects, so every <rect is a bar.
        assert_eq!(out.matches("<rect").count(), 3);
        for label in ["10", "20", "15"] {
            assert!(out.contains(&format!(">{}<", label)), "missing value label {}", label);
        }
    }

    #[test]
    fn tallest_bar_matches_largest_value() {
        let theme = Theme::default();
        let out = render_bar(&spec(), &theme).unwrap();
        let mut heights: Vec<f64> = out
            .lines()
            .filter(|l| l.starts_with("<rect"))
            .map(|l| {
                let key = r#"height=""#;
                let start = l.find(key).unwrap() + key.len();
                let rest = &l[start..];
                rest[..rest.find('"').unwrap()].parse::<f64>().unwrap()
            })
            .collect();
        let max = heights.iter().cloned().fold(0.0, f64::max);
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap());
        // Heights scale with 10 : 20 : 15.
        assert!((heights[2] - max).abs() < 1e-9);
        assert!((heights[0] / max - 0.5).abs() < 0.01);
    }

    #[test]
    fn empty_data_is_an_error() {
        let theme = Theme::default();
        let mut s = spec();
        s.data.clear();
        assert!(render_bar(&s, &theme).is_err());
    }

    #[test]
    fn rendering_is_deterministic() {
        let theme = Theme::default();
        assert_eq!(render_bar(&spec(), &theme).unwrap(), render_bar(&spec(), &theme).unwrap());
    }

    #[test]
    fn lollipop_draws_stems_and_dots() {
        let theme = Theme::default();
        let s = LollipopSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            data: data(),
            color: None,
            show_axes: false,
        };
        let out = render_lollipop(&s, &theme).unwrap();
        assert_eq!(out.matches("<line").count(), 3);
        assert_eq!(out.matches("<circle").count(), 3);
    }

    #[test]
    fn circular_bar_emits_one_sector_per_item() {
        let theme = Theme::default();
        let s = CircularBarSpec {
            width: 600.0,
            height: 600.0,
            title: None,
            data: data(),
            inner_ratio: 0.3,
        };
        let out = render_circular_bar(&s, &theme).unwrap();
        assert_eq!(out.matches("<path").count(), 3);
    }
}
