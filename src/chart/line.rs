use serde::{Deserialize, Serialize};

use crate::chart::series_color;
use crate::data::{Series, XValue};
use crate::error::{ChartsmithError, Result};
use crate::render::axis;
use crate::render::curve;
use crate::render::svg;
use crate::scale::{BandScale, LinearScale, PositionScale, TimeScale, format_number};
use crate::theme::Theme;
use crate::visual::shape::PointShape;

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    400.0
}

fn default_true() -> bool {
    true
}

fn default_tension() -> f64 {
    0.5
}

/// Multi-series line chart; x may be numeric, temporal, or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChartSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub series: Vec<Series>,
    /// Catmull-Rom smoothing; straight polylines when off.
    #[serde(default)]
    pub smooth: bool,
    #[serde(default = "default_tension")]
    pub tension: f64,
    #[serde(default)]
    pub show_points: bool,
    #[serde(default = "default_true")]
    pub show_axes: bool,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

/// Sniffs the x kind from the first value and builds the matching scale.
///
/// Numbers give a linear scale, RFC 3339 text a time scale, and any other
/// text a band scale over the categories in first-appearance order. Every
/// subsequent x must conform to the sniffed kind.
pub(crate) fn build_x_scale(series: &[Series], range: (f64, f64)) -> Result<PositionScale> {
    let first = series
        .iter()
        .flat_map(|s| s.points.first())
        .next()
        .ok_or_else(|| ChartsmithError::Data("series contain no points".into()))?;

    match &first.x {
        XValue::Number(_) => {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for s in series {
                for p in &s.points {
                    let v = p.x.as_number().ok_or_else(|| {
                        ChartsmithError::Data(format!(
                            "series '{}' mixes numeric and non-numeric x values",
                            s.name
                        ))
                    })?;
                    lo = lo.min(v);
                    hi = hi.max(v);
                }
            }
            Ok(PositionScale::Linear(LinearScale::new((lo, hi), range)))
        }
        XValue::Text(_) if first.x.as_instant().is_some() => {
            let mut instants = Vec::new();
            for s in series {
                for p in &s.points {
                    let instant = p.x.as_instant().ok_or_else(|| {
                        ChartsmithError::Data(format!(
                            "series '{}' mixes temporal and non-temporal x values",
                            s.name
                        ))
                    })?;
                    instants.push(instant);
                }
            }
            Ok(PositionScale::Time(TimeScale::from_instants(&instants, range)?))
        }
        XValue::Text(_) => {
            let mut categories: Vec<String> = Vec::new();
            for s in series {
                for p in &s.points {
                    let label = match &p.x {
                        XValue::Text(t) => t.clone(),
                        XValue::Number(n) => format_number(*n),
                    };
                    if !categories.contains(&label) {
                        categories.push(label);
                    }
                }
            }
            Ok(PositionScale::Band(BandScale::new(categories, range)))
        }
    }
}

/// Shared y scale over every series, zero-anchored and niced.
pub(crate) fn build_y_scale(series: &[Series], range: (f64, f64)) -> LinearScale {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for s in series {
        for y in s.ys() {
            lo = lo.min(y);
            hi = hi.max(y);
        }
    }
    if !lo.is_finite() {
        lo = 0.0;
        hi = 1.0;
    }
    LinearScale::new((lo.min(0.0), hi.max(0.0)), range).nice(5)
}

pub fn render_line(spec: &LineChartSpec, theme: &Theme) -> Result<String> {
    if spec.series.is_empty() || spec.series.iter().all(|s| s.points.is_empty()) {
        return Err(ChartsmithError::Data("line chart requires at least one non-empty series".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = build_x_scale(&spec.series, (plot.x, plot.x + plot.width))?;
    let y = build_y_scale(&spec.series, (plot.y + plot.height, plot.y));

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    let y_ticks: Vec<(f64, String)> =
        y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
    let x_ticks = x.placed_ticks(8);
    if spec.show_grid {
        axis::draw_h_grid(&mut out, &y_ticks, &plot, theme)?;
        axis::draw_v_grid(&mut out, &x_ticks, &plot, theme)?;
    }
    if spec.show_axes {
        axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
        axis::draw_x_axis(&mut out, &x_ticks, &plot, theme)?;
    }

    for (i, s) in spec.series.iter().enumerate() {
        if s.points.is_empty() {
            continue;
        }
        let color = series_color(s.color.as_deref(), i, theme)?;
        let pts: Vec<(f64, f64)> = s.points.iter().map(|p| (x.apply(&p.x), y.apply(p.y))).collect();
        let d = if spec.smooth {
            curve::catmull_rom_d(&pts, spec.tension)
        } else {
            curve::polyline_d(&pts)
        };
        svg::path(&mut out, &d, "none", &color, 2.0, 1.0)?;

        if spec.show_points {
            for (px, py) in &pts {
                PointShape::Circle.emit(&mut out, *px, *py, 3.5, &color)?;
            }
        }
    }

    if spec.show_legend && spec.series.len() > 1 {
        let entries: Vec<(String, String)> = spec
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let color = s.color.clone().unwrap_or_else(|| theme.series_color(i));
                (s.name.clone(), color)
            })
            .collect();
        axis::draw_legend(&mut out, &entries, plot.x + plot.width - 100.0, plot.y + 6.0, theme)?;
    }
    Ok(out)
}

/// Connected scatter: one series drawn as a line with prominent markers
/// and optional point labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedScatterSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub series: Series,
    #[serde(default)]
    pub smooth: bool,
    #[serde(default = "default_tension")]
    pub tension: f64,
    #[serde(default)]
    pub point_labels: Vec<String>,
    #[serde(default = "default_true")]
    pub show_axes: bool,
}

pub fn render_connected_scatter(spec: &ConnectedScatterSpec, theme: &Theme) -> Result<String> {
    if spec.series.points.is_empty() {
        return Err(ChartsmithError::Data("connected scatter requires at least one point".into()));
    }
    if !spec.point_labels.is_empty() && spec.point_labels.len() != spec.series.points.len() {
        return Err(ChartsmithError::Data(format!(
            "{} point labels for {} points",
            spec.point_labels.len(),
            spec.series.points.len()
        )));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let all = std::slice::from_ref(&spec.series);
    let x = build_x_scale(all, (plot.x, plot.x + plot.width))?;
    let y = build_y_scale(all, (plot.y + plot.height, plot.y));

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    if spec.show_axes {
        let y_ticks: Vec<(f64, String)> =
            y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
        axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
        axis::draw_x_axis(&mut out, &x.placed_ticks(8), &plot, theme)?;
    }

    let color = series_color(spec.series.color.as_deref(), 0, theme)?;
    let pts: Vec<(f64, f64)> =
        spec.series.points.iter().map(|p| (x.apply(&p.x), y.apply(p.y))).collect();
    let d = if spec.smooth {
        curve::catmull_rom_d(&pts, spec.tension)
    } else {
        curve::polyline_d(&pts)
    };
    svg::path(&mut out, &d, "none", &color, 1.5, 0.8)?;

    for (i, (px, py)) in pts.iter().enumerate() {
        PointShape::Circle.emit(&mut out, *px, *py, 5.0, &color)?;
        if let Some(label) = spec.point_labels.get(i) {
            svg::text(
                &mut out,
                px + 8.0,
                py - 6.0,
                label,
                theme.tick_font_size,
                &theme.font_family,
                &theme.label_color,
                "start",
                "normal",
            )?;
        }
    }
    Ok(out)
}
