use serde::{Deserialize, Serialize};

use crate::data::Matrix;
use crate::error::{ChartsmithError, Result};
use crate::layout::chord::chord_layout;
use crate::layout::sankey::{sankey_layout, SankeyLink};
use crate::render::axis;
use crate::render::curve;
use crate::render::svg;
use crate::theme::Theme;

fn default_width() -> f64 {
    900.0
}

fn default_height() -> f64 {
    500.0
}

fn default_square() -> f64 {
    600.0
}

fn default_node_width() -> f64 {
    18.0
}

fn default_node_padding() -> f64 {
    12.0
}

fn default_iterations() -> usize {
    32
}

fn default_pad_angle() -> f64 {
    0.04
}

/// One flow between named endpoints, as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeySpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub nodes: Vec<String>,
    pub links: Vec<FlowLink>,
    #[serde(default = "default_node_width")]
    pub node_width: f64,
    #[serde(default = "default_node_padding")]
    pub node_padding: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

pub fn render_sankey(spec: &SankeySpec, theme: &Theme) -> Result<String> {
    if spec.links.is_empty() {
        return Err(ChartsmithError::Data("sankey requires at least one link".into()));
    }

    let top = if spec.title.is_some() { 48.0 } else { 10.0 };
    let inner_width = spec.width - 160.0; // label gutters on both sides
    let inner_height = spec.height - top - 10.0;

    let links: Vec<SankeyLink> = spec
        .links
        .iter()
        .map(|l| SankeyLink { source: l.source.clone(), target: l.target.clone(), value: l.value })
        .collect();
    let layout = sankey_layout(
        &spec.nodes,
        &links,
        inner_width,
        inner_height,
        spec.node_width,
        spec.node_padding,
        spec.iterations,
    )?;

    let ox = 80.0;
    let oy = top;

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    // Ribbons first so nodes sit on top of their flow ends.
    for link in &layout.links {
        let source = &layout.nodes[link.source];
        let target = &layout.nodes[link.target];
        let d = curve::ribbon_d(
            ox + source.x + layout.node_width,
            oy + link.source_y,
            oy + link.source_y + link.width,
            ox + target.x,
            oy + link.target_y,
            oy + link.target_y + link.width,
        );
        let color = theme.series_color(link.source);
        svg::path(&mut out, &d, &color, "none", 0.0, 0.4)?;
    }

    let max_layer = layout.nodes.iter().map(|n| n.layer).max().unwrap_or(0);
    for (i, node) in layout.nodes.iter().enumerate() {
        svg::rect(
            &mut out,
            ox + node.x,
            oy + node.y,
            layout.node_width,
            node.height.max(1.0),
            &theme.series_color(i),
            "none",
            0.0,
            1.0,
        )?;
        // Last-layer labels go to the left of the node, others to the right.
        let (lx, anchor) = if node.layer == max_layer {
            (ox + node.x - 6.0, "end")
        } else {
            (ox + node.x + layout.node_width + 6.0, "start")
        };
        svg::text(
            &mut out,
            lx,
            oy + node.y + node.height.max(1.0) / 2.0 + 4.0,
            &node.id,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            anchor,
            "normal",
        )?;
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSpec {
    #[serde(default = "default_square")]
    pub width: f64,
    #[serde(default = "default_square")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    /// Entity labels; must match the matrix dimension.
    pub labels: Vec<String>,
    pub matrix: Matrix,
    #[serde(default = "default_pad_angle")]
    pub pad_angle: f64,
}

pub fn render_chord(spec: &ChordSpec, theme: &Theme) -> Result<String> {
    spec.matrix.validate()?;
    if spec.labels.len() != spec.matrix.rows.len() || spec.matrix.rows.len() != spec.matrix.cols.len() {
        return Err(ChartsmithError::Data(
            "chord labels and matrix dimensions must agree".into(),
        ));
    }

    let (groups, ribbons) = chord_layout(&spec.matrix.values, spec.pad_angle)?;

    let cx = spec.width / 2.0;
    let cy = spec.height / 2.0 + if spec.title.is_some() { 10.0 } else { 0.0 };
    let outer = spec.width.min(spec.height) / 2.0 - 40.0;
    let inner = outer - 14.0;

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    for group in &groups {
        let d = svg::annular_sector_d(cx, cy, inner, outer, group.start_angle, group.end_angle);
        svg::path(&mut out, &d, &theme.series_color(group.index), "none", 0.0, 1.0)?;

        let mid = (group.start_angle + group.end_angle) / 2.0;
        let (lx, ly) = svg::polar(cx, cy, outer + 14.0, mid);
        svg::text(
            &mut out,
            lx,
            ly + 4.0,
            &spec.labels[group.index],
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "middle",
            "normal",
        )?;
    }

    // Quadratic ribbons pulled through the circle center.
    for ribbon in &ribbons {
        let (s0x, s0y) = svg::polar(cx, cy, inner, ribbon.source.start_angle);
        let (s1x, s1y) = svg::polar(cx, cy, inner, ribbon.source.end_angle);
        let (t0x, t0y) = svg::polar(cx, cy, inner, ribbon.target.start_angle);
        let (t1x, t1y) = svg::polar(cx, cy, inner, ribbon.target.end_angle);
        let large_s = if ribbon.source.end_angle - ribbon.source.start_angle > std::f64::consts::PI { 1 } else { 0 };
        let large_t = if ribbon.target.end_angle - ribbon.target.start_angle > std::f64::consts::PI { 1 } else { 0 };
        let d = format!(
            "M {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2} Z",
            s0x, s0y, inner, inner, large_s, s1x, s1y, cx, cy, t0x, t0y, inner, inner, large_t,
            t1x, t1y, cx, cy, s0x, s0y
        );
        svg::path(&mut out, &d, &theme.series_color(ribbon.source.index), "none", 0.0, 0.45)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sankey_renders_nodes_and_ribbons() {
        let theme = Theme::default();
        let spec = SankeySpec {
            width: 900.0,
            height: 500.0,
            title: None,
            nodes: vec!["coal".into(), "power".into(), "homes".into()],
            links: vec![
                FlowLink { source: "coal".into(), target: "power".into(), value: 10.0 },
                FlowLink { source: "power".into(), target: "homes".into(), value: 10.0 },
            ],
            node_width: 18.0,
            node_padding: 12.0,
            iterations: 16,
        };
        let out = render_sankey(&spec, &theme).unwrap();
        assert_eq!(out.matches("<rect").count(), 3);
        assert_eq!(out.matches("<path").count(), 2);
    }

    #[test]
    fn sankey_unknown_endpoint_surfaces_reason() {
        let theme = Theme::default();
        let spec = SankeySpec {
            width: 900.0,
            height: 500.0,
            title: None,
            nodes: vec!["a".into()],
            links: vec![FlowLink { source: "a".into(), target: "missing".into(), value: 1.0 }],
            node_width: 18.0,
            node_padding: 12.0,
            iterations: 4,
        };
        let err = render_sankey(&spec, &theme).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn chord_draws_arcs_and_ribbons() {
        let theme = Theme::default();
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let spec = ChordSpec {
            width: 600.0,
            height: 600.0,
            title: None,
            labels: labels.clone(),
            matrix: Matrix {
                rows: labels.clone(),
                cols: labels,
                values: vec![
                    vec![0.0, 2.0, 1.0],
                    vec![1.0, 0.0, 1.0],
                    vec![2.0, 1.0, 0.0],
                ],
            },
            pad_angle: 0.04,
        };
        let out = render_chord(&spec, &theme).unwrap();
        // 3 group arcs + 7 non-zero cells as ribbons.
        assert_eq!(out.matches("<path").count(), 10);
    }
}
