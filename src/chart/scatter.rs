use serde::{Deserialize, Serialize};

use crate::chart::line::{build_x_scale, build_y_scale};
use crate::chart::series_color;
use crate::data::Series;
use crate::error::{ChartsmithError, Result};
use crate::render::axis;
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

fn default_marker_size() -> f64 {
    4.0
}

/// One scatter series: shared point data plus a marker shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    #[serde(flatten)]
    pub series: Series,
    /// circle, square, diamond, triangle, cross, x, or dot.
    #[serde(default)]
    pub shape: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub series: Vec<ScatterSeries>,
    /// Marker size used wherever a point's own size is 0.
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    #[serde(default = "default_true")]
    pub show_axes: bool,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

pub fn render_scatter(spec: &ScatterSpec, theme: &Theme) -> Result<String> {
    if spec.series.is_empty() || spec.series.iter().all(|s| s.series.points.is_empty()) {
        return Err(ChartsmithError::Data("scatter plot requires at least one non-empty series".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let flat: Vec<Series> = spec.series.iter().map(|s| s.series.clone()).collect();
    let x = build_x_scale(&flat, (plot.x, plot.x + plot.width))?;
    let y = build_y_scale(&flat, (plot.y + plot.height, plot.y));

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

    let default_size = if spec.marker_size > 0.0 { spec.marker_size } else { default_marker_size() };
    for (i, s) in spec.series.iter().enumerate() {
        let color = series_color(s.series.color.as_deref(), i, theme)?;
        let shape = s.shape.as_deref().map(PointShape::from).unwrap_or_default();
        for p in &s.series.points {
            let size = if p.size > 0.0 { p.size } else { default_size };
            shape.emit(&mut out, x.apply(&p.x), y.apply(p.y), size, &color)?;
        }
    }

    if spec.show_legend && spec.series.len() > 1 {
        let entries: Vec<(String, String)> = spec
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let color = s.series.color.clone().unwrap_or_else(|| theme.series_color(i));
                (s.series.name.clone(), color)
            })
            .collect();
        axis::draw_legend(&mut out, &entries, plot.x + plot.width - 100.0, plot.y + 6.0, theme)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SeriesPoint, XValue};

    fn spec(shape: Option<&str>) -> ScatterSpec {
        ScatterSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            series: vec![ScatterSeries {
                series: Series {
                    name: "a".into(),
                    color: None,
                    points: vec![
                        SeriesPoint { x: XValue::Number(1.0), y: 2.0, size: 0.0 },
                        SeriesPoint { x: XValue::Number(2.0), y: 4.0, size: 9.0 },
                    ],
                },
                shape: shape.map(String::from),
            }],
            marker_size: 4.0,
            show_axes: false,
            show_grid: false,
            show_legend: false,
        }
    }

    #[test]
    fn circles_by_default_with_size_fallback() {
        let theme = Theme::default();
        let out = render_scatter(&spec(None), &theme).unwrap();
        assert_eq!(out.matches("<circle").count(), 2);
        assert!(out.contains(r#"r="4.00""#));
        assert!(out.contains(r#"r="9.00""#));
    }

    #[test]
    fn named_shapes_are_honored() {
        let theme = Theme::default();
        let out = render_scatter(&spec(Some("diamond")), &theme).unwrap();
        assert_eq!(out.matches("<polygon").count(), 2);
    }

    #[test]
    fn empty_series_is_an_error() {
        let theme = Theme::default();
        let mut s = spec(None);
        s.series[0].series.points.clear();
        assert!(render_scatter(&s, &theme).is_err());
    }
}
