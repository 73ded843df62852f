use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::chart::series_color;
use crate::data::LabeledValue;
use crate::error::{ChartsmithError, Result};
use crate::render::axis;
use crate::render::svg;
use crate::theme::Theme;

fn default_size() -> f64 {
    600.0
}

fn default_true() -> bool {
    true
}

/// Pie (or donut) chart over labeled values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChartSpec {
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub data: Vec<LabeledValue>,
    /// 0 is a full pie; anything above hollows out a donut.
    #[serde(default)]
    pub donut_ratio: f64,
    #[serde(default = "default_true")]
    pub show_percentages: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

pub fn render_pie(spec: &PieChartSpec, theme: &Theme) -> Result<String> {
    if spec.data.is_empty() {
        return Err(ChartsmithError::Data("pie chart requires at least one data point".into()));
    }
    if spec.data.iter().any(|d| d.value < 0.0) {
        return Err(ChartsmithError::Data("pie chart values must be non-negative".into()));
    }
    let total: f64 = spec.data.iter().map(|d| d.value).sum();
    if total <= 0.0 {
        return Err(ChartsmithError::Data("total value is zero".into()));
    }

    let cx = spec.width / 2.0;
    let cy = spec.height / 2.0 + if spec.title.is_some() { 10.0 } else { 0.0 };
    let outer = (spec.width.min(spec.height) / 2.0 - 50.0).max(10.0);
    let inner = outer * spec.donut_ratio.clamp(0.0, 0.95);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    // Sweeps are proportional to value; together they close the circle.
    let mut start = 0.0;
    for (i, item) in spec.data.iter().enumerate() {
        let sweep = TAU * item.value / total;
        if sweep <= 0.0 {
            continue;
        }
        let end = start + sweep;
        let fill = series_color(None, i, theme)?;
        if sweep >= TAU - 1e-9 {
            // A lone slice closes on itself; the arc degenerates, so draw
            // the full disc directly.
            svg::circle(&mut out, cx, cy, outer, &fill, "#ffffff", 1.0, 1.0)?;
        } else {
            let d = svg::annular_sector_d(cx, cy, inner, outer, start, end);
            svg::path(&mut out, &d, &fill, "#ffffff", 1.0, 1.0)?;
        }

        if spec.show_percentages {
            let mid = (start + end) / 2.0;
            let label_r = (inner + outer) / 2.0;
            let (lx, ly) = svg::polar(cx, cy, label_r, mid);
            let pct = 100.0 * item.value / total;
            svg::text(
                &mut out,
                lx,
                ly + 4.0,
                &format!("{:.1}%", pct),
                theme.tick_font_size,
                &theme.font_family,
                "#ffffff",
                "middle",
                "bold",
            )?;
        }
        start = end;
    }

    if spec.show_legend {
        let entries: Vec<(String, String)> = spec
            .data
            .iter()
            .enumerate()
            .map(|(i, d)| (d.label.clone(), theme.series_color(i)))
            .collect();
        axis::draw_legend(&mut out, &entries, spec.width - 110.0, 20.0, theme)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(values: &[f64]) -> PieChartSpec {
        PieChartSpec {
            width: 600.0,
            height: 600.0,
            title: None,
            data: values
                .iter()
                .enumerate()
                .map(|(i, &v)| LabeledValue { label: format!("s{}", i), value: v })
                .collect(),
            donut_ratio: 0.0,
            show_percentages: true,
            show_legend: false,
        }
    }

    #[test]
    fn zero_total_is_an_error() {
        let theme = Theme::default();
        let err = render_pie(&spec(&[0.0, 0.0]), &theme).unwrap_err();
        assert!(err.to_string().contains("total value is zero"));
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let theme = Theme::default();
        let out = render_pie(&spec(&[25.0, 25.0, 50.0]), &theme).unwrap();
        assert!(out.contains(">25.0%<"));
        assert!(out.contains(">50.0%<"));
    }

    #[test]
    fn one_slice_per_positive_value() {
        let theme = Theme::default();
        let out = render_pie(&spec(&[3.0, 0.0, 7.0]), &theme).unwrap();
        assert_eq!(out.matches("<path").count(), 2);
    }

    #[test]
    fn negative_values_rejected() {
        let theme = Theme::default();
        assert!(render_pie(&spec(&[5.0, -1.0]), &theme).is_err());
    }
}
