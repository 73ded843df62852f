use crate::data::TreeNode;
use crate::layout::Rect;

/// One positioned node of a squarified treemap.
#[derive(Debug, Clone)]
pub struct TreemapRect {
    pub label: String,
    pub value: f64,
    pub depth: usize,
    pub rect: Rect,
    pub is_leaf: bool,
}

/// Lays out a tree as a squarified treemap inside `bounds`.
///
/// At each level the children are sorted by value descending, then greedily
/// grouped into strips against the shorter side so that the worst aspect
/// ratio in the strip is minimized; a strip is finalized as soon as adding
/// the next child would worsen that ratio. Every leaf's area is
/// proportional to its value; siblings tile their parent exactly, less the
/// explicit padding applied when recursing.
pub fn squarified(root: &TreeNode, bounds: Rect, padding: f64) -> Vec<TreemapRect> {
    let mut out = Vec::new();
    let total = root.total();
    if total <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return out;
    }
    out.push(TreemapRect {
        label: root.label.clone(),
        value: total,
        depth: 0,
        rect: bounds,
        is_leaf: root.is_leaf(),
    });
    layout_children(root, bounds, 1, padding, &mut out);
    out
}

fn layout_children(node: &TreeNode, rect: Rect, depth: usize, padding: f64, out: &mut Vec<TreemapRect>) {
    if node.is_leaf() {
        return;
    }
    // Zero-valued children occupy no area and are skipped.
    let mut items: Vec<(&TreeNode, f64)> = node
        .children
        .iter()
        .map(|c| (c, c.total()))
        .filter(|(_, v)| *v > 0.0)
        .collect();
    if items.is_empty() {
        return;
    }
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let total: f64 = items.iter().map(|(_, v)| v).sum();
    squarify_strip(&items, rect, total, depth, padding, out);
}

/// Recursively splits `items` into strips with the best aspect ratios.
fn squarify_strip(
    items: &[(&TreeNode, f64)],
    rect: Rect,
    total: f64,
    depth: usize,
    padding: f64,
    out: &mut Vec<TreemapRect>,
) {
    if items.is_empty() || total <= 0.0 || rect.area() <= 0.0 {
        return;
    }

    let shorter = rect.width.min(rect.height);
    let area_per_value = rect.area() / total;

    // Find the strip size that minimizes the worst aspect ratio; stop as
    // soon as adding one more item makes it worse.
    let mut best_count = 1;
    let mut best_aspect = f64::MAX;
    let mut strip_sum = 0.0;
    for count in 1..=items.len() {
        strip_sum += items[count - 1].1;
        let thickness = strip_sum * area_per_value / shorter;
        let mut worst: f64 = 0.0;
        for (_, v) in &items[..count] {
            let length = v * area_per_value / thickness;
            worst = worst.max((thickness / length).max(length / thickness));
        }
        if worst <= best_aspect {
            best_aspect = worst;
            best_count = count;
        } else {
            break;
        }
    }

    let strip: &[(&TreeNode, f64)] = &items[..best_count];
    let strip_total: f64 = strip.iter().map(|(_, v)| v).sum();
    let thickness = strip_total * area_per_value / shorter;

    // Lay the strip against the shorter side and place each item.
    let mut offset = 0.0;
    for (child, value) in strip {
        let length = value * area_per_value / thickness;
        let child_rect = if rect.width >= rect.height {
            Rect::new(rect.x, rect.y + offset, thickness, length)
        } else {
            Rect::new(rect.x + offset, rect.y, length, thickness)
        };
        offset += length;

        out.push(TreemapRect {
            label: child.label.clone(),
            value: *value,
            depth,
            rect: child_rect,
            is_leaf: child.is_leaf(),
        });
        if !child.is_leaf() {
            layout_children(child, child_rect.inset(padding), depth + 1, padding, out);
        }
    }

    // Shrink the rectangle by the strip's depth and continue with the rest.
    let rest = &items[best_count..];
    if !rest.is_empty() {
        let rest_total = total - strip_total;
        let rest_rect = if rect.width >= rect.height {
            Rect::new(rect.x + thickness, rect.y, rect.width - thickness, rect.height)
        } else {
            Rect::new(rect.x, rect.y + thickness, rect.width, rect.height - thickness)
        };
        squarify_strip(rest, rest_rect, rest_total, depth, padding, out);
    }
}
