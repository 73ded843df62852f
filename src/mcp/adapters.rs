//! Per-tool adapters: the boundary between coerced JSON arguments and the
//! renderers' typed specs.
//!
//! Each adapter decodes its spec with serde (dimensional defaults live on
//! the spec types), applies the configured resource limits, invokes the
//! renderer, and wraps the fragment into a complete SVG document.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::chart::area::{render_stacked_area, render_streamchart, StackedAreaSpec, StreamChartSpec};
use crate::chart::bar::{render_bar, render_circular_bar, render_lollipop, BarChartSpec, CircularBarSpec, LollipopSpec};
use crate::chart::distribution::{
    render_boxplot, render_density, render_histogram, render_ridgeline, render_violin,
    BoxplotSpec, DensitySpec, HistogramSpec, RidgelineSpec, ViolinSpec,
};
use crate::chart::finance::{render_candlestick, render_ohlc, CandlestickSpec, OhlcSpec};
use crate::chart::flow::{render_chord, render_sankey, ChordSpec, SankeySpec};
use crate::chart::heatmap::{render_correlogram, render_heatmap, CorrelogramSpec, HeatmapSpec};
use crate::chart::hierarchy::{
    render_circle_packing, render_dendrogram, render_icicle, render_sunburst, render_treemap,
    CirclePackingSpec, DendrogramSpec, IcicleSpec, SunburstSpec, TreemapSpec,
};
use crate::chart::line::{render_connected_scatter, render_line, ConnectedScatterSpec, LineChartSpec};
use crate::chart::pie::{render_pie, PieChartSpec};
use crate::chart::radar::{render_parallel, render_radar, ParallelSpec, RadarSpec};
use crate::chart::scatter::{render_scatter, ScatterSpec};
use crate::chart::wordcloud::{render_wordcloud, WordCloudSpec};
use crate::data::TreeNode;
use crate::error::{ChartsmithError, Result};
use crate::gallery::{registry, render_gallery};
use crate::mcp::server::config;
use crate::render::svg::wrap_svg;
use crate::theme::Theme;

/// The uniform shape every tool handler takes.
pub type ToolHandler = fn(Value, &Theme) -> Result<String>;

fn spec_from<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| ChartsmithError::InvalidArguments {
        path: "/".to_string(),
        reason: e.to_string(),
    })
}

fn check_tree_depth(root: &TreeNode) -> Result<()> {
    let limit = config().max_tree_depth;
    if root.depth() > limit {
        return Err(ChartsmithError::ResourceLimit(format!(
            "tree depth {} exceeds the limit of {}",
            root.depth(),
            limit
        )));
    }
    Ok(())
}

fn check_samples(count: usize) -> Result<()> {
    let limit = config().max_samples;
    if count > limit {
        return Err(ChartsmithError::ResourceLimit(format!(
            "{} samples exceed the limit of {}",
            count, limit
        )));
    }
    Ok(())
}

fn check_matrix_cells(count: usize) -> Result<()> {
    let limit = config().max_matrix_cells;
    if count > limit {
        return Err(ChartsmithError::ResourceLimit(format!(
            "{} matrix cells exceed the limit of {}",
            count, limit
        )));
    }
    Ok(())
}

pub fn bar_chart(args: Value, theme: &Theme) -> Result<String> {
    let spec: BarChartSpec = spec_from(args)?;
    let body = render_bar(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn pie_chart(args: Value, theme: &Theme) -> Result<String> {
    let spec: PieChartSpec = spec_from(args)?;
    let body = render_pie(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn line_chart(args: Value, theme: &Theme) -> Result<String> {
    let spec: LineChartSpec = spec_from(args)?;
    let body = render_line(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn scatter_plot(args: Value, theme: &Theme) -> Result<String> {
    let spec: ScatterSpec = spec_from(args)?;
    let body = render_scatter(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn heatmap(args: Value, theme: &Theme) -> Result<String> {
    let spec: HeatmapSpec = spec_from(args)?;
    check_matrix_cells(spec.matrix.cell_count())?;
    let body = render_heatmap(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn treemap(args: Value, theme: &Theme) -> Result<String> {
    let spec: TreemapSpec = spec_from(args)?;
    check_tree_depth(&spec.root)?;
    let body = render_treemap(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn sunburst(args: Value, theme: &Theme) -> Result<String> {
    let spec: SunburstSpec = spec_from(args)?;
    check_tree_depth(&spec.root)?;
    let body = render_sunburst(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn circle_packing(args: Value, theme: &Theme) -> Result<String> {
    let spec: CirclePackingSpec = spec_from(args)?;
    check_tree_depth(&spec.root)?;
    let body = render_circle_packing(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn icicle(args: Value, theme: &Theme) -> Result<String> {
    let spec: IcicleSpec = spec_from(args)?;
    check_tree_depth(&spec.root)?;
    let body = render_icicle(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn boxplot(args: Value, theme: &Theme) -> Result<String> {
    let spec: BoxplotSpec = spec_from(args)?;
    check_samples(spec.groups.iter().map(|g| g.values.len()).sum())?;
    let body = render_boxplot(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn violin(args: Value, theme: &Theme) -> Result<String> {
    let spec: ViolinSpec = spec_from(args)?;
    check_samples(spec.groups.iter().map(|g| g.values.len()).sum())?;
    let body = render_violin(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn histogram(args: Value, theme: &Theme) -> Result<String> {
    let spec: HistogramSpec = spec_from(args)?;
    check_samples(spec.values.len())?;
    let body = render_histogram(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn ridgeline(args: Value, theme: &Theme) -> Result<String> {
    let spec: RidgelineSpec = spec_from(args)?;
    check_samples(spec.groups.iter().map(|g| g.values.len()).sum())?;
    let body = render_ridgeline(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn candlestick(args: Value, theme: &Theme) -> Result<String> {
    let spec: CandlestickSpec = spec_from(args)?;
    let body = render_candlestick(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn ohlc(args: Value, theme: &Theme) -> Result<String> {
    let spec: OhlcSpec = spec_from(args)?;
    let body = render_ohlc(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn lollipop(args: Value, theme: &Theme) -> Result<String> {
    let spec: LollipopSpec = spec_from(args)?;
    let body = render_lollipop(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn density(args: Value, theme: &Theme) -> Result<String> {
    let spec: DensitySpec = spec_from(args)?;
    check_samples(spec.values.len())?;
    let body = render_density(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn connected_scatter(args: Value, theme: &Theme) -> Result<String> {
    let spec: ConnectedScatterSpec = spec_from(args)?;
    let body = render_connected_scatter(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn stacked_area(args: Value, theme: &Theme) -> Result<String> {
    let spec: StackedAreaSpec = spec_from(args)?;
    let body = render_stacked_area(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn streamchart(args: Value, theme: &Theme) -> Result<String> {
    let spec: StreamChartSpec = spec_from(args)?;
    let body = render_streamchart(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn correlogram(args: Value, theme: &Theme) -> Result<String> {
    let spec: CorrelogramSpec = spec_from(args)?;
    check_matrix_cells(spec.matrix.cell_count())?;
    let body = render_correlogram(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn radar(args: Value, theme: &Theme) -> Result<String> {
    let spec: RadarSpec = spec_from(args)?;
    let body = render_radar(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn parallel(args: Value, theme: &Theme) -> Result<String> {
    let spec: ParallelSpec = spec_from(args)?;
    let body = render_parallel(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn wordcloud(args: Value, theme: &Theme) -> Result<String> {
    let spec: WordCloudSpec = spec_from(args)?;
    let body = render_wordcloud(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn sankey(args: Value, theme: &Theme) -> Result<String> {
    let spec: SankeySpec = spec_from(args)?;
    let body = render_sankey(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn chord(args: Value, theme: &Theme) -> Result<String> {
    let spec: ChordSpec = spec_from(args)?;
    check_matrix_cells(spec.matrix.cell_count())?;
    let body = render_chord(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn circular_bar(args: Value, theme: &Theme) -> Result<String> {
    let spec: CircularBarSpec = spec_from(args)?;
    let body = render_circular_bar(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

pub fn dendrogram(args: Value, theme: &Theme) -> Result<String> {
    let spec: DendrogramSpec = spec_from(args)?;
    check_tree_depth(&spec.root)?;
    let body = render_dendrogram(&spec, theme)?;
    Ok(wrap_svg(spec.width, spec.height, &theme.background, &body))
}

/// `generate_gallery` looks the config up by name; the gallery engine
/// already emits a complete document.
pub fn generate_gallery(args: Value, theme: &Theme) -> Result<String> {
    let gallery_type = args
        .get("gallery_type")
        .and_then(Value::as_str)
        .ok_or_else(|| ChartsmithError::InvalidArguments {
            path: "/gallery_type".to_string(),
            reason: "missing required property".to_string(),
        })?;
    let cfg = registry::find(gallery_type)?;
    render_gallery(cfg, theme)
}
