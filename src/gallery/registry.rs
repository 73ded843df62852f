//! The fixed, named gallery configurations.
//!
//! Each gallery pairs built-in sample data with a handful of variants of
//! one chart family, so a single `generate_gallery` call shows the family's
//! range. The registry is built once at first use and never mutated.

use std::sync::OnceLock;

use ahash::AHashMap;

use crate::chart::area::{render_stacked_area, render_streamchart, StackLayer, StackedAreaSpec, StreamChartSpec};
use crate::chart::bar::{render_bar, render_circular_bar, render_lollipop, BarChartSpec, CircularBarSpec, LollipopSpec};
use crate::chart::line::{render_line, LineChartSpec};
use crate::chart::pie::{render_pie, PieChartSpec};
use crate::chart::radar::{render_parallel, render_radar, ParallelSpec, RadarSpec, ValueRow};
use crate::chart::scatter::{render_scatter, ScatterSeries, ScatterSpec};
use crate::data::{LabeledValue, Series, SeriesPoint, XValue};
use crate::error::{ChartsmithError, Result};
use crate::gallery::{CellContext, GalleryConfig, GalleryLayout, Variant};

/// Looks up a gallery by name.
pub fn find(name: &str) -> Result<&'static GalleryConfig> {
    let reg = registry();
    reg.index
        .get(name)
        .map(|&i| &reg.configs[i])
        .ok_or_else(|| ChartsmithError::Data(format!("unknown gallery '{}'", name)))
}

/// Names of all registered galleries, in registration order.
pub fn names() -> Vec<&'static str> {
    registry().configs.iter().map(|c| c.name).collect()
}

struct Registry {
    configs: Vec<GalleryConfig>,
    index: AHashMap<&'static str, usize>,
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let configs = vec![
            bar_gallery(),
            line_gallery(),
            pie_gallery(),
            scatter_gallery(),
            area_gallery(),
            radar_gallery(),
        ];
        let mut index = AHashMap::with_capacity(configs.len());
        for (i, c) in configs.iter().enumerate() {
            index.insert(c.name, i);
        }
        Registry { configs, index }
    })
}

// --- Sample data -------------------------------------------------------

fn sample_values() -> Vec<LabeledValue> {
    [("North", 42.0), ("East", 28.0), ("South", 35.0), ("West", 19.0), ("Central", 24.0)]
        .iter()
        .map(|(l, v)| LabeledValue { label: l.to_string(), value: *v })
        .collect()
}

fn sample_series(name: &str, ys: &[f64]) -> Series {
    Series {
        name: name.into(),
        color: None,
        points: ys
            .iter()
            .enumerate()
            .map(|(i, &y)| SeriesPoint { x: XValue::Number(i as f64), y, size: 0.0 })
            .collect(),
    }
}

fn sample_layers() -> Vec<StackLayer> {
    vec![
        StackLayer { name: "alpha".into(), color: None, values: vec![3.0, 5.0, 4.0, 6.0, 5.0, 7.0] },
        StackLayer { name: "beta".into(), color: None, values: vec![2.0, 2.5, 3.5, 3.0, 4.0, 3.5] },
        StackLayer { name: "gamma".into(), color: None, values: vec![1.0, 1.5, 2.0, 2.5, 2.0, 3.0] },
    ]
}

fn sample_xs() -> Vec<XValue> {
    (0..6).map(|i| XValue::Number(i as f64)).collect()
}

// --- Gallery configs ---------------------------------------------------

fn bar_gallery() -> GalleryConfig {
    GalleryConfig {
        name: "bar",
        title: "Bar Chart Gallery",
        layout: GalleryLayout::Grid { cols: 2, rows: 2, cell_width: 420.0, cell_height: 320.0 },
        variants: vec![
            Variant::new(
                "Classic",
                |ctx: &CellContext| BarChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    data: sample_values(),
                    color: None,
                    show_values: true,
                    show_axes: true,
                    show_grid: false,
                },
                render_bar,
            ),
            Variant::new(
                "With grid",
                |ctx: &CellContext| BarChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    data: sample_values(),
                    color: Some("#4393c3".into()),
                    show_values: false,
                    show_axes: true,
                    show_grid: true,
                },
                render_bar,
            ),
            Variant::new(
                "Lollipop",
                |ctx: &CellContext| LollipopSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    data: sample_values(),
                    color: None,
                    show_axes: true,
                },
                render_lollipop,
            ),
            Variant::new(
                "Circular",
                |ctx: &CellContext| CircularBarSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    data: sample_values(),
                    inner_ratio: 0.25,
                },
                render_circular_bar,
            ),
        ],
    }
}

fn line_gallery() -> GalleryConfig {
    let ys_a = [3.0, 5.0, 4.5, 7.0, 6.0, 8.5];
    let ys_b = [2.0, 2.5, 4.0, 3.5, 5.5, 5.0];
    GalleryConfig {
        name: "line",
        title: "Line Chart Gallery",
        layout: GalleryLayout::SingleRow { cell_width: 420.0, cell_height: 320.0 },
        variants: vec![
            Variant::new(
                "Straight",
                move |ctx: &CellContext| LineChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    series: vec![sample_series("a", &ys_a), sample_series("b", &ys_b)],
                    smooth: false,
                    tension: 0.5,
                    show_points: false,
                    show_axes: true,
                    show_grid: false,
                    show_legend: true,
                },
                render_line,
            ),
            Variant::new(
                "Smooth",
                move |ctx: &CellContext| LineChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    series: vec![sample_series("a", &ys_a), sample_series("b", &ys_b)],
                    smooth: true,
                    tension: 0.7,
                    show_points: false,
                    show_axes: true,
                    show_grid: false,
                    show_legend: false,
                },
                render_line,
            ),
            Variant::new(
                "Markers",
                move |ctx: &CellContext| LineChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    series: vec![sample_series("a", &ys_a)],
                    smooth: false,
                    tension: 0.5,
                    show_points: true,
                    show_axes: true,
                    show_grid: true,
                    show_legend: false,
                },
                render_line,
            ),
        ],
    }
}

fn pie_gallery() -> GalleryConfig {
    GalleryConfig {
        name: "pie",
        title: "Pie Chart Gallery",
        layout: GalleryLayout::SingleRow { cell_width: 380.0, cell_height: 340.0 },
        variants: vec![
            Variant::new(
                "Pie",
                |ctx: &CellContext| PieChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    data: sample_values(),
                    donut_ratio: 0.0,
                    show_percentages: true,
                    show_legend: false,
                },
                render_pie,
            ),
            Variant::new(
                "Donut",
                |ctx: &CellContext| PieChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    data: sample_values(),
                    donut_ratio: 0.55,
                    show_percentages: true,
                    show_legend: false,
                },
                render_pie,
            ),
        ],
    }
}

fn scatter_gallery() -> GalleryConfig {
    let points: Vec<(f64, f64)> = vec![
        (1.0, 2.1),
        (2.0, 3.4),
        (3.0, 2.8),
        (4.0, 5.2),
        (5.0, 4.4),
        (6.0, 6.1),
        (7.0, 5.6),
        (8.0, 7.3),
    ];
    let make_series = move |shape: Option<&'static str>| {
        let pts = points.clone();
        move |ctx: &CellContext| ScatterSpec {
            width: ctx.width,
            height: ctx.height,
            title: None,
            series: vec![ScatterSeries {
                series: Series {
                    name: "sample".into(),
                    color: None,
                    points: pts
                        .iter()
                        .map(|&(x, y)| SeriesPoint { x: XValue::Number(x), y, size: 0.0 })
                        .collect(),
                },
                shape: shape.map(String::from),
            }],
            marker_size: 5.0,
            show_axes: true,
            show_grid: false,
            show_legend: false,
        }
    };
    GalleryConfig {
        name: "scatter",
        title: "Scatter Plot Gallery",
        layout: GalleryLayout::SingleRow { cell_width: 420.0, cell_height: 320.0 },
        variants: vec![
            Variant::new("Circles", make_series(None), render_scatter),
            Variant::new("Diamonds", make_series(Some("diamond")), render_scatter),
            Variant::new("Crosses", make_series(Some("cross")), render_scatter),
        ],
    }
}

fn area_gallery() -> GalleryConfig {
    GalleryConfig {
        name: "area",
        title: "Stacked Area Gallery",
        layout: GalleryLayout::VerticalStack { cell_width: 640.0, cell_height: 260.0, spacing: 16.0 },
        variants: vec![
            Variant::new(
                "Stacked",
                |ctx: &CellContext| StackedAreaSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    x: sample_xs(),
                    series: sample_layers(),
                    show_axes: true,
                    show_legend: true,
                },
                render_stacked_area,
            ),
            Variant::new(
                "Stream",
                |ctx: &CellContext| StreamChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    x: sample_xs(),
                    series: sample_layers(),
                    offset: "wiggle".into(),
                    show_legend: false,
                },
                render_streamchart,
            ),
            Variant::new(
                "Silhouette",
                |ctx: &CellContext| StreamChartSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    x: sample_xs(),
                    series: sample_layers(),
                    offset: "silhouette".into(),
                    show_legend: false,
                },
                render_streamchart,
            ),
        ],
    }
}

fn radar_gallery() -> GalleryConfig {
    let axes: Vec<String> =
        ["speed", "range", "comfort", "safety", "price"].iter().map(|s| s.to_string()).collect();
    let rows = vec![
        ValueRow { name: "model A".into(), color: None, values: vec![4.0, 3.0, 5.0, 4.0, 2.0] },
        ValueRow { name: "model B".into(), color: None, values: vec![3.0, 5.0, 3.0, 4.5, 4.0] },
    ];
    let axes_for_radar = axes.clone();
    let rows_for_radar = rows.clone();
    let rows_for_parallel = rows;
    GalleryConfig {
        name: "radar",
        title: "Radar Gallery",
        layout: GalleryLayout::SingleRow { cell_width: 420.0, cell_height: 360.0 },
        variants: vec![
            Variant::new(
                "Spider",
                move |ctx: &CellContext| RadarSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    axes: axes_for_radar.clone(),
                    series: rows_for_radar.clone(),
                    max_value: Some(5.0),
                    rings: 5,
                    show_legend: true,
                },
                render_radar,
            ),
            Variant::new(
                "Parallel axes",
                move |ctx: &CellContext| ParallelSpec {
                    width: ctx.width,
                    height: ctx.height,
                    title: None,
                    dimensions: axes.clone(),
                    rows: rows_for_parallel.clone(),
                },
                render_parallel,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::render_gallery;
    use crate::theme::Theme;

    #[test]
    fn known_names_resolve() {
        for name in ["bar", "line", "pie", "scatter", "area", "radar"] {
            assert!(find(name).is_ok(), "gallery {} missing", name);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = find("nope").unwrap_err();
        assert!(err.to_string().contains("unknown gallery"));
    }

    #[test]
    fn every_gallery_renders() {
        let theme = Theme::default();
        for name in names() {
            let config = find(name).unwrap();
            let out = render_gallery(config, &theme).unwrap();
            assert!(out.starts_with("<svg"), "gallery {} has no svg root", name);
            assert!(out.contains(config.title));
        }
    }

    #[test]
    fn bar_gallery_matches_its_layout_dimensions() {
        let config = find("bar").unwrap();
        let dims = config.layout.dimensions(config.variants.len());
        let theme = Theme::default();
        let out = render_gallery(config, &theme).unwrap();
        assert!(out.contains(&format!(r#"width="{:.0}""#, dims.width)));
        assert!(out.contains(&format!(r#"height="{:.0}""#, dims.height)));
    }
}
