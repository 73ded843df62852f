use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::chart::series_color;
use crate::error::{ChartsmithError, Result};
use crate::render::axis;
use crate::render::svg;
use crate::scale::LinearScale;
use crate::theme::Theme;

fn default_square() -> f64 {
    600.0
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    400.0
}

fn default_rings() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

/// A named row of values, used by both radar and parallel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRow {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub values: Vec<f64>,
}

/// Radar (spider) chart over a fixed set of spokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarSpec {
    #[serde(default = "default_square")]
    pub width: f64,
    #[serde(default = "default_square")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    /// Spoke labels, clockwise from the top.
    pub axes: Vec<String>,
    pub series: Vec<ValueRow>,
    /// Fixed outer value; the data maximum when absent.
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default = "default_rings")]
    pub rings: u32,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

pub fn render_radar(spec: &RadarSpec, theme: &Theme) -> Result<String> {
    if spec.axes.len() < 3 {
        return Err(ChartsmithError::Data("radar chart needs at least three axes".into()));
    }
    if spec.series.is_empty() {
        return Err(ChartsmithError::Data("radar chart requires at least one series".into()));
    }
    for row in &spec.series {
        if row.values.len() != spec.axes.len() {
            return Err(ChartsmithError::Data(format!(
                "series '{}' has {} values but {} axes",
                row.name,
                row.values.len(),
                spec.axes.len()
            )));
        }
        if row.values.iter().any(|v| *v < 0.0) {
            return Err(ChartsmithError::Data(format!(
                "series '{}' has negative values",
                row.name
            )));
        }
    }

    let cx = spec.width / 2.0;
    let cy = spec.height / 2.0 + if spec.title.is_some() { 10.0 } else { 0.0 };
    let radius = spec.width.min(spec.height) / 2.0 - 60.0;

    let data_max = spec
        .series
        .iter()
        .flat_map(|r| r.values.iter().cloned())
        .fold(0.0, f64::max);
    let max = spec.max_value.unwrap_or(data_max).max(1e-9);
    let r_scale = LinearScale::new((0.0, max), (0.0, radius));
    let n = spec.axes.len();
    let angle = |i: usize| TAU * i as f64 / n as f64;

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    // Concentric guide rings, then spokes, then the data polygons.
    let rings = spec.rings.max(1);
    for ring in 1..=rings {
        let rr = radius * ring as f64 / rings as f64;
        let pts: Vec<(f64, f64)> = (0..n).map(|i| svg::polar(cx, cy, rr, angle(i))).collect();
        svg::polygon(&mut out, &pts, "none", &theme.grid_color, theme.grid_stroke_width, 1.0)?;
    }
    for (i, label) in spec.axes.iter().enumerate() {
        let (sx, sy) = svg::polar(cx, cy, radius, angle(i));
        svg::line(&mut out, cx, cy, sx, sy, &theme.grid_color, theme.grid_stroke_width)?;
        let (lx, ly) = svg::polar(cx, cy, radius + 18.0, angle(i));
        svg::text(
            &mut out,
            lx,
            ly + 4.0,
            label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "middle",
            "normal",
        )?;
    }

    for (i, row) in spec.series.iter().enumerate() {
        let color = series_color(row.color.as_deref(), i, theme)?;
        let pts: Vec<(f64, f64)> = row
            .values
            .iter()
            .enumerate()
            .map(|(j, &v)| svg::polar(cx, cy, r_scale.apply(v.min(max)), angle(j)))
            .collect();
        svg::polygon(&mut out, &pts, &color, &color, 2.0, 0.35)?;
    }

    if spec.show_legend && spec.series.len() > 1 {
        let entries: Vec<(String, String)> = spec
            .series
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let color = r.color.clone().unwrap_or_else(|| theme.series_color(i));
                (r.name.clone(), color)
            })
            .collect();
        axis::draw_legend(&mut out, &entries, spec.width - 110.0, 20.0, theme)?;
    }
    Ok(out)
}

/// Parallel coordinates: one vertical axis per dimension, one polyline per
/// row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub dimensions: Vec<String>,
    pub rows: Vec<ValueRow>,
}

pub fn render_parallel(spec: &ParallelSpec, theme: &Theme) -> Result<String> {
    if spec.dimensions.len() < 2 {
        return Err(ChartsmithError::Data("parallel coordinates need at least two dimensions".into()));
    }
    if spec.rows.is_empty() {
        return Err(ChartsmithError::Data("parallel coordinates require at least one row".into()));
    }
    for row in &spec.rows {
        if row.values.len() != spec.dimensions.len() {
            return Err(ChartsmithError::Data(format!(
                "row '{}' has {} values but {} dimensions",
                row.name,
                row.values.len(),
                spec.dimensions.len()
            )));
        }
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let n = spec.dimensions.len();
    let axis_x = |i: usize| plot.x + plot.width * i as f64 / (n - 1) as f64;

    // Each dimension scales independently over its own extent.
    let scales: Vec<LinearScale> = (0..n)
        .map(|d| {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for row in &spec.rows {
                lo = lo.min(row.values[d]);
                hi = hi.max(row.values[d]);
            }
            LinearScale::new((lo, hi), (plot.y + plot.height, plot.y))
        })
        .collect();

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    for (d, label) in spec.dimensions.iter().enumerate() {
        let x = axis_x(d);
        svg::line(&mut out, x, plot.y, x, plot.y + plot.height, &theme.axis_color, theme.axis_stroke_width)?;
        svg::text(
            &mut out,
            x,
            plot.y - 8.0,
            label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "middle",
            "normal",
        )?;
    }

    for (i, row) in spec.rows.iter().enumerate() {
        let color = series_color(row.color.as_deref(), i, theme)?;
        let pts: Vec<(f64, f64)> = row
            .values
            .iter()
            .enumerate()
            .map(|(d, &v)| (axis_x(d), scales[d].apply(v)))
            .collect();
        let d = crate::render::curve::polyline_d(&pts);
        svg::path(&mut out, &d, "none", &color, 1.5, 0.7)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radar_needs_three_axes() {
        let theme = Theme::default();
        let spec = RadarSpec {
            width: 600.0,
            height: 600.0,
            title: None,
            axes: vec!["a".into(), "b".into()],
            series: vec![ValueRow { name: "s".into(), color: None, values: vec![1.0, 2.0] }],
            max_value: None,
            rings: 4,
            show_legend: false,
        };
        assert!(render_radar(&spec, &theme).is_err());
    }

    #[test]
    fn radar_draws_rings_and_series_polygons() {
        let theme = Theme::default();
        let spec = RadarSpec {
            width: 600.0,
            height: 600.0,
            title: None,
            axes: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            series: vec![
                ValueRow { name: "s1".into(), color: None, values: vec![1.0, 2.0, 3.0, 4.0] },
                ValueRow { name: "s2".into(), color: None, values: vec![4.0, 3.0, 2.0, 1.0] },
            ],
            max_value: Some(5.0),
            rings: 4,
            show_legend: false,
        };
        let out = render_radar(&spec, &theme).unwrap();
        // 4 guide rings + 2 data polygons.
        assert_eq!(out.matches("<polygon").count(), 6);
    }

    #[test]
    fn parallel_draws_one_polyline_per_row() {
        let theme = Theme::default();
        let spec = ParallelSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            dimensions: vec!["d1".into(), "d2".into(), "d3".into()],
            rows: vec![
                ValueRow { name: "r1".into(), color: None, values: vec![1.0, 5.0, 3.0] },
                ValueRow { name: "r2".into(), color: None, values: vec![2.0, 1.0, 9.0] },
                ValueRow { name: "r3".into(), color: None, values: vec![3.0, 2.0, 6.0] },
            ],
        };
        let out = render_parallel(&spec, &theme).unwrap();
        assert_eq!(out.matches("<path").count(), 3);
    }

    #[test]
    fn parallel_rejects_ragged_rows() {
        let theme = Theme::default();
        let spec = ParallelSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            dimensions: vec!["d1".into(), "d2".into()],
            rows: vec![ValueRow { name: "r".into(), color: None, values: vec![1.0] }],
        };
        assert!(render_parallel(&spec, &theme).is_err());
    }
}
