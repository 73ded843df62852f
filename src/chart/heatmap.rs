use serde::{Deserialize, Serialize};

use crate::chart::format_value;
use crate::data::Matrix;
use crate::error::{ChartsmithError, Result};
use crate::render::axis;
use crate::render::svg;
use crate::scale::BandScale;
use crate::theme::Theme;
use crate::visual::color::ColorMap;

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    500.0
}

/// Dense matrix heatmap with a continuous colormap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub matrix: Matrix,
    /// viridis, plasma, inferno, magma, cividis, or rdbu.
    #[serde(default)]
    pub colormap: Option<String>,
    #[serde(default)]
    pub show_values: bool,
}

pub fn render_heatmap(spec: &HeatmapSpec, theme: &Theme) -> Result<String> {
    spec.matrix.validate()?;
    if spec.matrix.rows.is_empty() || spec.matrix.cols.is_empty() {
        return Err(ChartsmithError::Data("heatmap matrix is empty".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = BandScale::new(spec.matrix.cols.iter().cloned(), (plot.x, plot.x + plot.width))
        .with_padding(0.05, 0.0);
    let y = BandScale::new(spec.matrix.rows.iter().cloned(), (plot.y, plot.y + plot.height))
        .with_padding(0.05, 0.0);

    let (lo, hi) = spec.matrix.value_extent().unwrap_or((0.0, 1.0));
    let span = if (hi - lo).abs() < f64::EPSILON { 1.0 } else { hi - lo };
    let map = ColorMap::from_name(spec.colormap.as_deref().unwrap_or("viridis"));

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    for (r, row_label) in spec.matrix.rows.iter().enumerate() {
        for (c, col_label) in spec.matrix.cols.iter().enumerate() {
            let v = spec.matrix.values[r][c];
            let fill = map.get_color((v - lo) / span);
            svg::rect(
                &mut out,
                x.apply(col_label),
                y.apply(row_label),
                x.bandwidth(),
                y.bandwidth(),
                &fill,
                "none",
                0.0,
                1.0,
            )?;
            if spec.show_values {
                // Flip label color against dark cells.
                let text_color = if (v - lo) / span > 0.6 { "#111111" } else { "#ffffff" };
                svg::text(
                    &mut out,
                    x.center(col_label),
                    y.center(row_label) + 4.0,
                    &format_value(v),
                    theme.tick_font_size,
                    &theme.font_family,
                    text_color,
                    "middle",
                    "normal",
                )?;
            }
        }
    }

    // Continuous legend: a compact ramp above the top-right corner of the
    // grid. One gradient per call, so the id counter starts at zero.
    let ramp_width = 110.0_f64.min(plot.width);
    let ramp_x = plot.x + plot.width - ramp_width;
    let ramp_y = plot.y - 14.0;
    let stops: Vec<(f64, String)> =
        (0..=4).map(|i| (i as f64 / 4.0, map.get_color(i as f64 / 4.0))).collect();
    svg::gradient_rect(&mut out, ramp_x, ramp_y, ramp_width, 8.0, &stops, "ramp-0")?;
    svg::text(
        &mut out,
        ramp_x - 4.0,
        ramp_y + 7.0,
        &format_value(lo),
        theme.tick_font_size,
        &theme.font_family,
        &theme.label_color,
        "end",
        "normal",
    )?;
    svg::text(
        &mut out,
        ramp_x + ramp_width + 4.0,
        ramp_y + 7.0,
        &format_value(hi),
        theme.tick_font_size,
        &theme.font_family,
        &theme.label_color,
        "start",
        "normal",
    )?;

    // Row/column labels sit outside the cell grid.
    for col_label in &spec.matrix.cols {
        svg::text(
            &mut out,
            x.center(col_label),
            plot.y + plot.height + 16.0,
            col_label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "middle",
            "normal",
        )?;
    }
    for row_label in &spec.matrix.rows {
        svg::text(
            &mut out,
            plot.x - 8.0,
            y.center(row_label) + 4.0,
            row_label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "end",
            "normal",
        )?;
    }
    Ok(out)
}

/// Correlogram: pairwise correlations in [-1, 1] shown as sized, diverging
/// colored discs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelogramSpec {
    #[serde(default = "default_height")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub matrix: Matrix,
}

pub fn render_correlogram(spec: &CorrelogramSpec, theme: &Theme) -> Result<String> {
    spec.matrix.validate()?;
    let n = spec.matrix.rows.len();
    if n == 0 {
        return Err(ChartsmithError::Data("correlogram matrix is empty".into()));
    }
    if spec.matrix.cols.len() != n {
        return Err(ChartsmithError::Data("correlogram matrix must be square".into()));
    }
    for row in &spec.matrix.values {
        for &v in row {
            if !(-1.0..=1.0).contains(&v) {
                return Err(ChartsmithError::Data(format!(
                    "correlation {} outside [-1, 1]",
                    v
                )));
            }
        }
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let x = BandScale::new(spec.matrix.cols.iter().cloned(), (plot.x, plot.x + plot.width));
    let y = BandScale::new(spec.matrix.rows.iter().cloned(), (plot.y, plot.y + plot.height));
    let max_r = (x.bandwidth().min(y.bandwidth()) / 2.0 - 2.0).max(2.0);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    for (r, row_label) in spec.matrix.rows.iter().enumerate() {
        for (c, col_label) in spec.matrix.cols.iter().enumerate() {
            let v = spec.matrix.values[r][c];
            let cx = x.center(col_label);
            let cy = y.center(row_label);
            if r == c {
                svg::text(
                    &mut out,
                    cx,
                    cy + 4.0,
                    row_label,
                    theme.tick_font_size,
                    &theme.font_family,
                    &theme.label_color,
                    "middle",
                    "bold",
                )?;
                continue;
            }
            // Map [-1, 1] onto the diverging ramp, radius onto |r|.
            let fill = ColorMap::RdBu.get_color((v + 1.0) / 2.0);
            svg::circle(&mut out, cx, cy, max_r * v.abs(), &fill, "none", 0.0, 1.0)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Matrix {
        Matrix {
            rows: vec!["r1".into(), "r2".into()],
            cols: vec!["c1".into(), "c2".into(), "c3".into()],
            values: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        }
    }

    #[test]
    fn one_rect_per_cell() {
        let theme = Theme::default();
        let spec = HeatmapSpec {
            width: 800.0,
            height: 500.0,
            title: None,
            matrix: matrix(),
            colormap: None,
            show_values: false,
        };
        let out = render_heatmap(&spec, &theme).unwrap();
        // Cell rects carry an opacity attribute; the legend ramp does not.
        let cells = out.lines().filter(|l| l.starts_with("<rect") && l.contains("opacity=")).count();
        assert_eq!(cells, 6);
        assert!(out.contains("linearGradient"));
        assert!(out.contains(r#"url(#ramp-0)"#));
    }

    #[test]
    fn extreme_cells_get_ramp_endpoints() {
        let theme = Theme::default();
        let spec = HeatmapSpec {
            width: 800.0,
            height: 500.0,
            title: None,
            matrix: matrix(),
            colormap: Some("viridis".into()),
            show_values: false,
        };
        let out = render_heatmap(&spec, &theme).unwrap();
        assert!(out.contains("#440154"));
        assert!(out.contains("#fde725"));
    }

    #[test]
    fn correlogram_rejects_out_of_range() {
        let theme = Theme::default();
        let spec = CorrelogramSpec {
            width: 500.0,
            height: 500.0,
            title: None,
            matrix: Matrix {
                rows: vec!["a".into(), "b".into()],
                cols: vec!["a".into(), "b".into()],
                values: vec![vec![1.0, 2.0], vec![0.5, 1.0]],
            },
        };
        assert!(render_correlogram(&spec, &theme).is_err());
    }

    #[test]
    fn correlogram_draws_discs_off_diagonal() {
        let theme = Theme::default();
        let spec = CorrelogramSpec {
            width: 500.0,
            height: 500.0,
            title: None,
            matrix: Matrix {
                rows: vec!["a".into(), "b".into()],
                cols: vec!["a".into(), "b".into()],
                values: vec![vec![1.0, -0.6], vec![-0.6, 1.0]],
            },
        };
        let out = render_correlogram(&spec, &theme).unwrap();
        assert_eq!(out.matches("<circle").count(), 2);
    }
}
