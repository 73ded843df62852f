use serde::{Deserialize, Serialize};

use crate::chart::line::build_x_scale;
use crate::chart::series_color;
use crate::data::{Series, SeriesPoint, XValue};
use crate::error::{ChartsmithError, Result};
use crate::layout::stack::{stack_series, StackOffset};
use crate::render::axis;
use crate::render::svg;
use crate::scale::LinearScale;
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

/// One layer of a stacked chart: a name plus y values aligned with the
/// shared x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackLayer {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedAreaSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    /// Shared x positions for every layer.
    pub x: Vec<XValue>,
    pub series: Vec<StackLayer>,
    #[serde(default = "default_true")]
    pub show_axes: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

pub fn render_stacked_area(spec: &StackedAreaSpec, theme: &Theme) -> Result<String> {
    render_stack(
        spec.width,
        spec.height,
        spec.title.as_deref(),
        &spec.x,
        &spec.series,
        StackOffset::Zero,
        spec.show_axes,
        spec.show_legend,
        theme,
    )
}

/// Streamgraph: stacked series with a flowing baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChartSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub x: Vec<XValue>,
    pub series: Vec<StackLayer>,
    /// wiggle (default), silhouette, expand, or zero.
    #[serde(default = "default_offset")]
    pub offset: String,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

fn default_offset() -> String {
    "wiggle".to_string()
}

pub fn render_streamchart(spec: &StreamChartSpec, theme: &Theme) -> Result<String> {
    render_stack(
        spec.width,
        spec.height,
        spec.title.as_deref(),
        &spec.x,
        &spec.series,
        StackOffset::from_name(&spec.offset),
        false,
        spec.show_legend,
        theme,
    )
}

#[allow(clippy::too_many_arguments)]
fn render_stack(
    width: f64,
    height: f64,
    title: Option<&str>,
    xs: &[XValue],
    layers: &[StackLayer],
    offset: StackOffset,
    show_axes: bool,
    show_legend: bool,
    theme: &Theme,
) -> Result<String> {
    if layers.is_empty() || xs.is_empty() {
        return Err(ChartsmithError::Data("stacked chart requires x positions and at least one series".into()));
    }
    for layer in layers {
        if layer.values.len() != xs.len() {
            return Err(ChartsmithError::Data(format!(
                "series '{}' has {} values but {} x positions",
                layer.name,
                layer.values.len(),
                xs.len()
            )));
        }
        if offset != StackOffset::Silhouette && layer.values.iter().any(|v| *v < 0.0) {
            return Err(ChartsmithError::Data(format!(
                "series '{}' has negative values, which stacking does not support",
                layer.name
            )));
        }
    }

    let plot = axis::plot_area(width, height, title.is_some());
    // The x scale reuses the line chart's kind sniffing over a probe series.
    let probe = Series {
        name: String::new(),
        color: None,
        points: xs.iter().map(|x| SeriesPoint { x: x.clone(), y: 0.0, size: 0.0 }).collect(),
    };
    let x_scale = build_x_scale(std::slice::from_ref(&probe), (plot.x, plot.x + plot.width))?;

    let matrix: Vec<Vec<f64>> = layers.iter().map(|l| l.values.clone()).collect();
    let bands = stack_series(&matrix, offset)?;

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for band in &bands {
        for &v in band.lower.iter().chain(&band.upper) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    let y = LinearScale::new((lo.min(0.0), hi), (plot.y + plot.height, plot.y)).nice(5);

    let mut out = String::new();
    if let Some(t) = title {
        axis::draw_title(&mut out, t, width, theme)?;
    }
    if show_axes {
        let y_ticks: Vec<(f64, String)> =
            y.ticks(5).into_iter().map(|t| (y.apply(t.value), t.label)).collect();
        axis::draw_y_axis(&mut out, &y_ticks, &plot, theme)?;
        axis::draw_x_axis(&mut out, &x_scale.placed_ticks(8), &plot, theme)?;
    }

    let px: Vec<f64> = xs.iter().map(|x| x_scale.apply(x)).collect();
    for (i, (layer, band)) in layers.iter().zip(&bands).enumerate() {
        let color = series_color(layer.color.as_deref(), i, theme)?;
        let mut pts: Vec<(f64, f64)> = Vec::with_capacity(px.len() * 2);
        for (j, &p) in px.iter().enumerate() {
            pts.push((p, y.apply(band.upper[j])));
        }
        for (j, &p) in px.iter().enumerate().rev() {
            pts.push((p, y.apply(band.lower[j])));
        }
        svg::polygon(&mut out, &pts, &color, "none", 0.0, 0.85)?;
    }

    if show_legend && layers.len() > 1 {
        let entries: Vec<(String, String)> = layers
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let color = l.color.clone().unwrap_or_else(|| theme.series_color(i));
                (l.name.clone(), color)
            })
            .collect();
        axis::draw_legend(&mut out, &entries, plot.x + plot.width - 100.0, plot.y + 6.0, theme)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(n: usize) -> Vec<XValue> {
        (0..n).map(|i| XValue::Number(i as f64)).collect()
    }

    fn layers() -> Vec<StackLayer> {
        vec![
            StackLayer { name: "a".into(), color: None, values: vec![1.0, 2.0, 3.0] },
            StackLayer { name: "b".into(), color: None, values: vec![2.0, 1.0, 2.0] },
        ]
    }

    #[test]
    fn one_polygon_per_layer() {
        let theme = Theme::default();
        let spec = StackedAreaSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            x: xs(3),
            series: layers(),
            show_axes: false,
            show_legend: false,
        };
        let out = render_stacked_area(&spec, &theme).unwrap();
        assert_eq!(out.matches("<polygon").count(), 2);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let theme = Theme::default();
        let mut series = layers();
        series[1].values.pop();
        let spec = StackedAreaSpec {
            width: 800.0,
            height: 400.0,
            title: None,
            x: xs(3),
            series,
            show_axes: false,
            show_legend: false,
        };
        assert!(render_stacked_area(&spec, &theme).is_err());
    }

    #[test]
    fn streamchart_accepts_offsets() {
        let theme = Theme::default();
        for offset in ["wiggle", "silhouette", "expand"] {
            let spec = StreamChartSpec {
                width: 800.0,
                height: 400.0,
                title: None,
                x: xs(3),
                series: layers(),
                offset: offset.into(),
                show_legend: false,
            };
            let out = render_streamchart(&spec, &theme).unwrap();
            assert_eq!(out.matches("<polygon").count(), 2, "offset {}", offset);
        }
    }
}
