use serde::{Deserialize, Serialize};

use crate::data::TreeNode;
use crate::error::{ChartsmithError, Result};
use crate::layout::dendrogram::dendrogram_layout;
use crate::layout::pack::circle_pack;
use crate::layout::partition::{icicle_rects, sunburst_segments};
use crate::layout::treemap::squarified;
use crate::layout::Rect;
use crate::render::axis;
use crate::render::svg;
use crate::theme::Theme;
use crate::visual::color::interpolate_hsl;

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    500.0
}

fn default_square() -> f64 {
    600.0
}

fn default_padding() -> f64 {
    2.0
}

fn default_inner_ratio() -> f64 {
    0.2
}

fn default_true() -> bool {
    true
}

fn validated_root(root: &TreeNode, chart: &str) -> Result<()> {
    root.validate()?;
    if root.total() <= 0.0 {
        return Err(ChartsmithError::Data(format!("{} requires a tree with positive total value", chart)));
    }
    Ok(())
}

/// Squarified treemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub root: TreeNode,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_true")]
    pub show_labels: bool,
}

pub fn render_treemap(spec: &TreemapSpec, theme: &Theme) -> Result<String> {
    validated_root(&spec.root, "treemap")?;

    let top = if spec.title.is_some() { 40.0 } else { 0.0 };
    let bounds = Rect::new(0.0, top, spec.width, spec.height - top);
    let tiles = squarified(&spec.root, bounds, spec.padding);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    // Deeper tiles lighten toward white so nesting reads at a glance.
    for tile in tiles.iter().filter(|t| t.is_leaf) {
        let base = theme.series_color(tile.depth.saturating_sub(1));
        let fill = interpolate_hsl(&base, "#ffffff", (tile.depth.saturating_sub(1) as f64 * 0.15).min(0.6))?;
        svg::rect(
            &mut out,
            tile.rect.x,
            tile.rect.y,
            tile.rect.width,
            tile.rect.height,
            &fill,
            "#ffffff",
            1.0,
            1.0,
        )?;
        if spec.show_labels && tile.rect.width > 40.0 && tile.rect.height > 18.0 {
            svg::text(
                &mut out,
                tile.rect.x + 4.0,
                tile.rect.y + 14.0,
                &tile.label,
                theme.tick_font_size,
                &theme.font_family,
                "#ffffff",
                "start",
                "normal",
            )?;
        }
    }
    Ok(out)
}

/// Sunburst: radial partition with a configurable donut hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstSpec {
    #[serde(default = "default_square")]
    pub width: f64,
    #[serde(default = "default_square")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub root: TreeNode,
    /// Donut-hole size as a fraction of the radius, in [0, 1).
    #[serde(default = "default_inner_ratio")]
    pub inner_ratio: f64,
}

pub fn render_sunburst(spec: &SunburstSpec, theme: &Theme) -> Result<String> {
    validated_root(&spec.root, "sunburst")?;

    let cx = spec.width / 2.0;
    let cy = spec.height / 2.0;
    let outer = spec.width.min(spec.height) / 2.0 - 20.0;
    let inner = outer * spec.inner_ratio.clamp(0.0, 0.95);
    let depth = spec.root.depth().saturating_sub(1).max(1);
    let dr = (outer - inner) / depth as f64;

    let segments = sunburst_segments(&spec.root);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    for seg in &segments {
        let r0 = inner + (seg.depth - 1) as f64 * dr;
        let r1 = r0 + dr;
        let base = theme.series_color(seg.branch);
        let fill = interpolate_hsl(&base, "#ffffff", ((seg.depth - 1) as f64 * 0.2).min(0.6))?;
        let d = svg::annular_sector_d(cx, cy, r0, r1, seg.start_angle, seg.end_angle);
        svg::path(&mut out, &d, &fill, "#ffffff", 1.0, 1.0)?;
    }
    Ok(out)
}

/// Icicle: the rectangular cousin of the sunburst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcicleSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub root: TreeNode,
}

pub fn render_icicle(spec: &IcicleSpec, theme: &Theme) -> Result<String> {
    validated_root(&spec.root, "icicle")?;

    let top = if spec.title.is_some() { 40.0 } else { 0.0 };
    let rows = spec.root.depth();
    let row_height = (spec.height - top) / rows as f64;
    let rects = icicle_rects(&spec.root);

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    for r in &rects {
        let fill = if r.depth == 0 {
            "#cccccc".to_string()
        } else {
            let base = theme.series_color(r.branch);
            interpolate_hsl(&base, "#ffffff", ((r.depth - 1) as f64 * 0.2).min(0.6))?
        };
        let x = r.x0 * spec.width;
        let w = (r.x1 - r.x0) * spec.width;
        let y = top + r.depth as f64 * row_height;
        svg::rect(&mut out, x, y, w, row_height, &fill, "#ffffff", 1.0, 1.0)?;
        if w > 40.0 {
            svg::text(
                &mut out,
                x + 4.0,
                y + row_height / 2.0 + 4.0,
                &r.label,
                theme.tick_font_size,
                &theme.font_family,
                "#333333",
                "start",
                "normal",
            )?;
        }
    }
    Ok(out)
}

/// Nested circle packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePackingSpec {
    #[serde(default = "default_square")]
    pub width: f64,
    #[serde(default = "default_square")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub root: TreeNode,
    #[serde(default = "default_padding")]
    pub padding: f64,
}

pub fn render_circle_packing(spec: &CirclePackingSpec, theme: &Theme) -> Result<String> {
    validated_root(&spec.root, "circle packing")?;

    let diameter = spec.width.min(spec.height) - 20.0;
    let circles = circle_pack(&spec.root, diameter, spec.padding);
    let dx = (spec.width - diameter) / 2.0;
    let dy = (spec.height - diameter) / 2.0;

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    for c in &circles {
        if c.is_leaf {
            let fill = theme.series_color(c.depth.saturating_sub(1));
            svg::circle(&mut out, c.x + dx, c.y + dy, c.r, &fill, "none", 0.0, 0.9)?;
            if c.r > 18.0 {
                svg::text(
                    &mut out,
                    c.x + dx,
                    c.y + dy + 4.0,
                    &c.label,
                    theme.tick_font_size,
                    &theme.font_family,
                    "#ffffff",
                    "middle",
                    "normal",
                )?;
            }
        } else {
            // Containers draw as outlines so the nesting stays visible.
            svg::circle(&mut out, c.x + dx, c.y + dy, c.r, "none", "#999999", 1.0, 1.0)?;
        }
    }
    Ok(out)
}

/// Dendrogram with leaves along the bottom and merges rising upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DendrogramSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub root: TreeNode,
}

pub fn render_dendrogram(spec: &DendrogramSpec, theme: &Theme) -> Result<String> {
    if spec.root.total() <= 0.0 && spec.root.is_leaf() {
        return Err(ChartsmithError::Data("dendrogram requires a non-empty tree".into()));
    }

    let plot = axis::plot_area(spec.width, spec.height, spec.title.is_some());
    let (points, links) = dendrogram_layout(&spec.root);
    if points.is_empty() {
        return Err(ChartsmithError::Data("dendrogram requires a non-empty tree".into()));
    }

    let px = |x: f64| plot.x + x * plot.width;
    // height 0 (leaves) at the bottom, the root merge at the top.
    let py = |h: f64| plot.y + (1.0 - h) * plot.height;

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    // Elbow connectors: up from the child, across to the parent.
    for link in &links {
        let parent = &points[link.parent];
        let child = &points[link.child];
        let d = format!(
            "M {:.2} {:.2} V {:.2} H {:.2}",
            px(child.x),
            py(child.height),
            py(parent.height),
            px(parent.x)
        );
        svg::path(&mut out, &d, "none", &theme.axis_color, 1.5, 1.0)?;
    }

    for p in &points {
        if p.is_leaf {
            svg::rotated_text(
                &mut out,
                px(p.x),
                py(0.0) + 14.0,
                45.0,
                &p.label,
                theme.tick_font_size,
                &theme.font_family,
                &theme.label_color,
                "start",
            )?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> TreeNode {
        TreeNode {
            label: "root".into(),
            value: 0.0,
            children: vec![
                TreeNode { label: "a".into(), value: 50.0, children: vec![] },
                TreeNode { label: "b".into(), value: 30.0, children: vec![] },
                TreeNode { label: "c".into(), value: 20.0, children: vec![] },
            ],
        }
    }

    #[test]
    fn treemap_emits_one_rect_per_leaf() {
        let theme = Theme::default();
        let spec = TreemapSpec {
            width: 600.0,
            height: 400.0,
            title: None,
            root: tree(),
            padding: 0.0,
            show_labels: false,
        };
        let out = render_treemap(&spec, &theme).unwrap();
        assert_eq!(out.matches("<rect").count(), 3);
    }

    #[test]
    fn treemap_rejects_zero_total() {
        let theme = Theme::default();
        let spec = TreemapSpec {
            width: 600.0,
            height: 400.0,
            title: None,
            root: TreeNode { label: "root".into(), value: 0.0, children: vec![] },
            padding: 0.0,
            show_labels: false,
        };
        assert!(render_treemap(&spec, &theme).is_err());
    }

    #[test]
    fn sunburst_emits_one_sector_per_node() {
        let theme = Theme::default();
        let spec = SunburstSpec {
            width: 600.0,
            height: 600.0,
            title: None,
            root: tree(),
            inner_ratio: 0.2,
        };
        let out = render_sunburst(&spec, &theme).unwrap();
        assert_eq!(out.matches("<path").count(), 3);
    }

    #[test]
    fn circle_packing_draws_leaves_filled() {
        let theme = Theme::default();
        let spec = CirclePackingSpec {
            width: 600.0,
            height: 600.0,
            title: None,
            root: tree(),
            padding: 2.0,
        };
        let out = render_circle_packing(&spec, &theme).unwrap();
        // Root outline plus three leaf discs.
        assert_eq!(out.matches("<circle").count(), 4);
    }

    #[test]
    fn dendrogram_links_every_child() {
        let theme = Theme::default();
        let spec = DendrogramSpec {
            width: 800.0,
            height: 500.0,
            title: None,
            root: tree(),
        };
        let out = render_dendrogram(&spec, &theme).unwrap();
        assert_eq!(out.matches("<path").count(), 3);
    }
}
