use std::f64::consts::TAU;

use crate::data::TreeNode;

/// One annular sector of a sunburst.
#[derive(Debug, Clone)]
pub struct ArcSegment {
    pub label: String,
    pub value: f64,
    /// 1 for children of the root; the root itself occupies no angle.
    pub depth: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub is_leaf: bool,
    /// Index of the top-level ancestor, used for consistent coloring.
    pub branch: usize,
}

/// Angular partition of a tree: each node's sweep is proportional to its
/// value relative to its siblings; depth maps to a radial band.
pub fn sunburst_segments(root: &TreeNode) -> Vec<ArcSegment> {
    let mut out = Vec::new();
    let total = root.total();
    if total <= 0.0 {
        return out;
    }
    let mut start = 0.0;
    for (branch, child) in root.children.iter().enumerate() {
        let value = child.total();
        if value <= 0.0 {
            continue;
        }
        let sweep = TAU * value / total;
        descend_arc(child, start, start + sweep, 1, branch, &mut out);
        start += sweep;
    }
    out
}

fn descend_arc(
    node: &TreeNode,
    start: f64,
    end: f64,
    depth: usize,
    branch: usize,
    out: &mut Vec<ArcSegment>,
) {
    let value = node.total();
    out.push(ArcSegment {
        label: node.label.clone(),
        value,
        depth,
        start_angle: start,
        end_angle: end,
        is_leaf: node.is_leaf(),
        branch,
    });
    if node.is_leaf() || value <= 0.0 {
        return;
    }
    let mut cursor = start;
    for child in &node.children {
        let child_value = child.total();
        if child_value <= 0.0 {
            continue;
        }
        let sweep = (end - start) * child_value / value;
        descend_arc(child, cursor, cursor + sweep, depth + 1, branch, out);
        cursor += sweep;
    }
}

/// One band of an icicle: a horizontal span in [0, 1] at an integer depth.
#[derive(Debug, Clone)]
pub struct IcicleRect {
    pub label: String,
    pub value: f64,
    pub depth: usize,
    pub x0: f64,
    pub x1: f64,
    pub is_leaf: bool,
    pub branch: usize,
}

/// Rectangular partition of a tree; the x spans are normalized to [0, 1]
/// and the renderer maps depth rows to pixel bands. The root occupies the
/// full top band.
pub fn icicle_rects(root: &TreeNode) -> Vec<IcicleRect> {
    let mut out = Vec::new();
    let total = root.total();
    if total <= 0.0 {
        return out;
    }
    out.push(IcicleRect {
        label: root.label.clone(),
        value: total,
        depth: 0,
        x0: 0.0,
        x1: 1.0,
        is_leaf: root.is_leaf(),
        branch: 0,
    });
    let mut cursor = 0.0;
    for (branch, child) in root.children.iter().enumerate() {
        let value = child.total();
        if value <= 0.0 {
            continue;
        }
        let span = value / total;
        descend_rect(child, cursor, cursor + span, 1, branch, &mut out);
        cursor += span;
    }
    out
}

fn descend_rect(
    node: &TreeNode,
    x0: f64,
    x1: f64,
    depth: usize,
    branch: usize,
    out: &mut Vec<IcicleRect>,
) {
    let value = node.total();
    out.push(IcicleRect {
        label: node.label.clone(),
        value,
        depth,
        x0,
        x1,
        is_leaf: node.is_leaf(),
        branch,
    });
    if node.is_leaf() || value <= 0.0 {
        return;
    }
    let mut cursor = x0;
    for child in &node.children {
        let child_value = child.total();
        if child_value <= 0.0 {
            continue;
        }
        let span = (x1 - x0) * child_value / value;
        descend_rect(child, cursor, cursor + span, depth + 1, branch, out);
        cursor += span;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, value: f64) -> TreeNode {
        TreeNode { label: label.into(), value, children: vec![] }
    }

    #[test]
    fn first_level_sweeps_sum_to_full_circle() {
        let root = TreeNode {
            label: "root".into(),
            value: 0.0,
            children: vec![leaf("a", 1.0), leaf("b", 2.0), leaf("c", 1.0)],
        };
        let segments = sunburst_segments(&root);
        let sweep: f64 = segments
            .iter()
            .filter(|s| s.depth == 1)
            .map(|s| s.end_angle - s.start_angle)
            .sum();
        assert!((sweep - TAU).abs() < 1e-9);
    }

    #[test]
    fn child_sweep_nested_within_parent() {
        let root = TreeNode {
            label: "root".into(),
            value: 0.0,
            children: vec![
                TreeNode {
                    label: "g".into(),
                    value: 0.0,
                    children: vec![leaf("x", 1.0), leaf("y", 3.0)],
                },
                leaf("z", 4.0),
            ],
        };
        let segments = sunburst_segments(&root);
        let g = segments.iter().find(|s| s.label == "g").unwrap();
        let y = segments.iter().find(|s| s.label == "y").unwrap();
        assert!(y.start_angle >= g.start_angle - 1e-9 && y.end_angle <= g.end_angle + 1e-9);
        // y is 3/4 of g's span.
        let ratio = (y.end_angle - y.start_angle) / (g.end_angle - g.start_angle);
        assert!((ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn icicle_spans_partition_unit_interval() {
        let root = TreeNode {
            label: "root".into(),
            value: 0.0,
            children: vec![leaf("a", 5.0), leaf("b", 5.0)],
        };
        let rects = icicle_rects(&root);
        let level1: Vec<_> = rects.iter().filter(|r| r.depth == 1).collect();
        assert_eq!(level1.len(), 2);
        assert!((level1[0].x1 - 0.5).abs() < 1e-9);
        assert!((level1[1].x1 - 1.0).abs() < 1e-9);
    }
}
