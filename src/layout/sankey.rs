use ahash::AHashMap;

use crate::error::{ChartsmithError, Result};

/// One flow between two named nodes, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// A node positioned by the layout.
#[derive(Debug, Clone)]
pub struct SankeyNodeLayout {
    pub id: String,
    pub layer: usize,
    pub x: f64,
    pub y: f64,
    pub height: f64,
    /// max(sum of incoming, sum of outgoing) flow.
    pub total: f64,
}

/// A link with its stacked endpoint offsets resolved.
#[derive(Debug, Clone)]
pub struct SankeyLinkLayout {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    /// Top of the ribbon at the source node's right edge.
    pub source_y: f64,
    /// Top of the ribbon at the target node's left edge.
    pub target_y: f64,
    /// Ribbon thickness in pixels.
    pub width: f64,
}

#[derive(Debug, Clone)]
pub struct SankeyLayout {
    pub nodes: Vec<SankeyNodeLayout>,
    pub links: Vec<SankeyLinkLayout>,
    pub node_width: f64,
}

const RELAX_EPSILON: f64 = 0.5;

/// Computes a layered Sankey layout.
///
/// Nodes are assigned to layers by longest path from the sources, with pure
/// sinks right-aligned. Vertical positions come from iterative barycenter
/// relaxation; relaxation stops when the mean movement drops under half a
/// pixel or the iteration cap is reached. Flow conservation (in == out for
/// interior nodes) is asserted and violations are a layout error.
pub fn sankey_layout(
    node_ids: &[String],
    links: &[SankeyLink],
    width: f64,
    height: f64,
    node_width: f64,
    node_padding: f64,
    iterations: usize,
) -> Result<SankeyLayout> {
    if node_ids.is_empty() {
        return Err(ChartsmithError::Data("sankey requires at least one node".into()));
    }
    let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(node_ids.len());
    for (i, id) in node_ids.iter().enumerate() {
        if index.insert(id.as_str(), i).is_some() {
            return Err(ChartsmithError::Data(format!("duplicate sankey node '{}'", id)));
        }
    }

    let n = node_ids.len();
    let mut resolved: Vec<(usize, usize, f64)> = Vec::with_capacity(links.len());
    for link in links {
        let s = *index.get(link.source.as_str()).ok_or_else(|| {
            ChartsmithError::Data(format!("unknown sankey source '{}'", link.source))
        })?;
        let t = *index.get(link.target.as_str()).ok_or_else(|| {
            ChartsmithError::Data(format!("unknown sankey target '{}'", link.target))
        })?;
        if s == t {
            return Err(ChartsmithError::Data(format!("self link on '{}'", link.source)));
        }
        if link.value < 0.0 {
            return Err(ChartsmithError::Data(format!(
                "negative flow {} on '{}' -> '{}'",
                link.value, link.source, link.target
            )));
        }
        resolved.push((s, t, link.value));
    }

    let mut inflow = vec![0.0; n];
    let mut outflow = vec![0.0; n];
    for &(s, t, v) in &resolved {
        outflow[s] += v;
        inflow[t] += v;
    }
    for i in 0..n {
        if inflow[i] > 0.0 && outflow[i] > 0.0 {
            let scale = inflow[i].abs().max(outflow[i].abs());
            if (inflow[i] - outflow[i]).abs() > scale * 1e-6 {
                return Err(ChartsmithError::Layout(format!(
                    "node '{}' violates flow conservation: in {} out {}",
                    node_ids[i], inflow[i], outflow[i]
                )));
            }
        }
    }

    let layers = assign_layers(n, &resolved, node_ids)?;
    let max_layer = layers.iter().copied().max().unwrap_or(0);

    // Horizontal placement: layers spread evenly over the width.
    let layer_step = if max_layer == 0 {
        0.0
    } else {
        (width - node_width) / max_layer as f64
    };

    let totals: Vec<f64> = (0..n).map(|i| inflow[i].max(outflow[i])).collect();
    if totals.iter().all(|&t| t <= 0.0) {
        return Err(ChartsmithError::Data("sankey has no positive flow".into()));
    }

    // Vertical scale: the tightest layer decides pixels-per-unit.
    let mut ky = f64::INFINITY;
    for layer in 0..=max_layer {
        let members: Vec<usize> = (0..n).filter(|&i| layers[i] == layer).collect();
        let layer_total: f64 = members.iter().map(|&i| totals[i]).sum();
        if layer_total > 0.0 {
            let usable = height - (members.len().saturating_sub(1)) as f64 * node_padding;
            ky = ky.min((usable / layer_total).max(0.0));
        }
    }
    if !ky.is_finite() {
        ky = 1.0;
    }

    let mut nodes: Vec<SankeyNodeLayout> = (0..n)
        .map(|i| SankeyNodeLayout {
            id: node_ids[i].clone(),
            layer: layers[i],
            x: layers[i] as f64 * layer_step,
            y: 0.0,
            height: totals[i] * ky,
            total: totals[i],
        })
        .collect();

    // Initial stacking per layer in declaration order.
    for layer in 0..=max_layer {
        let mut y = 0.0;
        for i in 0..n {
            if layers[i] == layer {
                nodes[i].y = y;
                y += nodes[i].height + node_padding;
            }
        }
    }

    relax(&mut nodes, &resolved, layers.as_slice(), max_layer, height, node_padding, iterations);

    // Stack link endpoints: outgoing sorted by target y, incoming by source y.
    let mut link_layouts: Vec<SankeyLinkLayout> = resolved
        .iter()
        .map(|&(s, t, v)| SankeyLinkLayout {
            source: s,
            target: t,
            value: v,
            source_y: 0.0,
            target_y: 0.0,
            width: v * ky,
        })
        .collect();

    for node in 0..n {
        let mut outgoing: Vec<usize> = (0..link_layouts.len())
            .filter(|&l| link_layouts[l].source == node)
            .collect();
        outgoing.sort_by(|&a, &b| {
            let ya = nodes[link_layouts[a].target].y;
            let yb = nodes[link_layouts[b].target].y;
            ya.partial_cmp(&yb).unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut y = nodes[node].y;
        for l in outgoing {
            link_layouts[l].source_y = y;
            y += link_layouts[l].width;
        }

        let mut incoming: Vec<usize> = (0..link_layouts.len())
            .filter(|&l| link_layouts[l].target == node)
            .collect();
        incoming.sort_by(|&a, &b| {
            let ya = nodes[link_layouts[a].source].y;
            let yb = nodes[link_layouts[b].source].y;
            ya.partial_cmp(&yb).unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut y = nodes[node].y;
        for l in incoming {
            link_layouts[l].target_y = y;
            y += link_layouts[l].width;
        }
    }

    Ok(SankeyLayout { nodes, links: link_layouts, node_width })
}

/// Longest path from the sources; pure sinks are pushed to the last layer.
fn assign_layers(n: usize, links: &[(usize, usize, f64)], node_ids: &[String]) -> Result<Vec<usize>> {
    let mut layers = vec![0usize; n];
    let mut changed = true;
    let mut rounds = 0;
    while changed {
        changed = false;
        rounds += 1;
        if rounds > n + 1 {
            return Err(ChartsmithError::Layout(format!(
                "cycle detected in sankey links near '{}'",
                node_ids.first().map(String::as_str).unwrap_or("?")
            )));
        }
        for &(s, t, _) in links {
            if layers[t] < layers[s] + 1 {
                layers[t] = layers[s] + 1;
                changed = true;
            }
        }
    }
    let max_layer = layers.iter().copied().max().unwrap_or(0);
    let has_outgoing: Vec<bool> = (0..n)
        .map(|i| links.iter().any(|&(s, _, _)| s == i))
        .collect();
    for i in 0..n {
        if !has_outgoing[i] {
            layers[i] = max_layer;
        }
    }
    Ok(layers)
}

fn relax(
    nodes: &mut [SankeyNodeLayout],
    links: &[(usize, usize, f64)],
    layers: &[usize],
    max_layer: usize,
    height: f64,
    node_padding: f64,
    iterations: usize,
) {
    let n = nodes.len();
    for _ in 0..iterations {
        let mut movement = 0.0;
        let mut moved = 0usize;

        // Left to right: pull each node toward its weighted source centers.
        for layer in 1..=max_layer {
            for i in 0..n {
                if layers[i] != layer {
                    continue;
                }
                let mut weight = 0.0;
                let mut sum = 0.0;
                for &(s, t, v) in links {
                    if t == i {
                        sum += (nodes[s].y + nodes[s].height / 2.0) * v;
                        weight += v;
                    }
                }
                if weight > 0.0 {
                    let target = sum / weight - nodes[i].height / 2.0;
                    movement += (target - nodes[i].y).abs();
                    moved += 1;
                    nodes[i].y = target;
                }
            }
            resolve_collisions(nodes, layers, layer, height, node_padding);
        }

        // Right to left: pull toward weighted target centers.
        for layer in (0..max_layer).rev() {
            for i in 0..n {
                if layers[i] != layer {
                    continue;
                }
                let mut weight = 0.0;
                let mut sum = 0.0;
                for &(s, t, v) in links {
                    if s == i {
                        sum += (nodes[t].y + nodes[t].height / 2.0) * v;
                        weight += v;
                    }
                }
                if weight > 0.0 {
                    let target = sum / weight - nodes[i].height / 2.0;
                    movement += (target - nodes[i].y).abs();
                    moved += 1;
                    nodes[i].y = target;
                }
            }
            resolve_collisions(nodes, layers, layer, height, node_padding);
        }

        if moved > 0 && movement / (moved as f64) < RELAX_EPSILON {
            break;
        }
    }
}

/// Pushes overlapping nodes apart within a layer and clamps to the canvas.
fn resolve_collisions(
    nodes: &mut [SankeyNodeLayout],
    layers: &[usize],
    layer: usize,
    height: f64,
    node_padding: f64,
) {
    let mut members: Vec<usize> = (0..nodes.len()).filter(|&i| layers[i] == layer).collect();
    members.sort_by(|&a, &b| nodes[a].y.partial_cmp(&nodes[b].y).unwrap_or(std::cmp::Ordering::Equal));

    // Sweep down, then sweep up from the bottom edge.
    let mut y = 0.0;
    for &i in &members {
        if nodes[i].y < y {
            nodes[i].y = y;
        }
        y = nodes[i].y + nodes[i].height + node_padding;
    }
    let mut bottom = height;
    for &i in members.iter().rev() {
        if nodes[i].y + nodes[i].height > bottom {
            nodes[i].y = bottom - nodes[i].height;
        }
        bottom = nodes[i].y - node_padding;
    }
}
