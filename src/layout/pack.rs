use crate::data::TreeNode;

/// A circle positioned by the packing layout, in absolute coordinates.
#[derive(Debug, Clone)]
pub struct PackedCircle {
    pub label: String,
    pub value: f64,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub is_leaf: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Circle {
    x: f64,
    y: f64,
    r: f64,
}

/// Hierarchical circle packing inside a `diameter`-wide square.
///
/// Leaves get radii proportional to the square root of their value (area ∝
/// value); siblings are packed with front-chain incremental packing and
/// enclosed in the smallest circle containing them all; the enclosure
/// becomes the parent's circle and the process repeats outward. No two
/// sibling circles overlap.
pub fn circle_pack(root: &TreeNode, diameter: f64, padding: f64) -> Vec<PackedCircle> {
    if root.total() <= 0.0 || diameter <= 0.0 {
        return Vec::new();
    }
    let mut rel = build(root, padding);
    let scale = if rel.circle.r > 0.0 { diameter / 2.0 / rel.circle.r } else { 1.0 };
    rel.circle.x = 0.0;
    rel.circle.y = 0.0;

    let mut out = Vec::new();
    flatten(&rel, diameter / 2.0, diameter / 2.0, scale, 0, &mut out);
    out
}

struct RelNode {
    label: String,
    value: f64,
    is_leaf: bool,
    /// Position relative to the parent's center, radius in value space.
    circle: Circle,
    children: Vec<RelNode>,
}

fn build(node: &TreeNode, padding: f64) -> RelNode {
    if node.is_leaf() {
        return RelNode {
            label: node.label.clone(),
            value: node.value,
            is_leaf: true,
            circle: Circle { x: 0.0, y: 0.0, r: node.value.max(0.0).sqrt() },
            children: Vec::new(),
        };
    }

    let mut children: Vec<RelNode> = node
        .children
        .iter()
        .filter(|c| c.total() > 0.0)
        .map(|c| build(c, padding))
        .collect();

    // Pack with the padding baked into each radius, then deflate.
    let mut circles: Vec<Circle> = children
        .iter()
        .map(|c| Circle { x: 0.0, y: 0.0, r: c.circle.r + padding })
        .collect();
    pack_siblings(&mut circles);
    let enclosure = enclose(&circles);
    for (child, packed) in children.iter_mut().zip(&circles) {
        child.circle.x = packed.x - enclosure.x;
        child.circle.y = packed.y - enclosure.y;
    }

    RelNode {
        label: node.label.clone(),
        value: node.total(),
        is_leaf: false,
        circle: Circle { x: 0.0, y: 0.0, r: enclosure.r + padding },
        children,
    }
}

fn flatten(node: &RelNode, cx: f64, cy: f64, scale: f64, depth: usize, out: &mut Vec<PackedCircle>) {
    out.push(PackedCircle {
        label: node.label.clone(),
        value: node.value,
        depth,
        x: cx,
        y: cy,
        r: node.circle.r * scale,
        is_leaf: node.is_leaf,
    });
    for child in &node.children {
        flatten(
            child,
            cx + child.circle.x * scale,
            cy + child.circle.y * scale,
            scale,
            depth + 1,
            out,
        );
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Positions `c` tangent to both `a` and `b`, on the outside of the chain.
fn place(b: &Circle, a: &Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r) * (a.r + c.r);
        let b2 = (b.r + c.r) * (b.r + c.r);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + a.r + c.r;
        c.y = a.y;
    }
}

/// Distance-from-origin score of the chain segment starting at `node`,
/// weighted toward the tangent midpoint of the pair.
fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = &circles[node];
    let b = &circles[next[node]];
    let ab = a.r + b.r;
    if ab <= 0.0 {
        return f64::MAX;
    }
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Front-chain incremental packing of sibling circles around the origin.
///
/// New circles are placed tangent to the chain pair nearest the centroid;
/// when the candidate overlaps another front circle the chain is unrolled
/// past the offender and the placement retried.
fn pack_siblings(circles: &mut [Circle]) {
    let n = circles.len();
    if n == 0 {
        return;
    }
    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return;
    }
    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return;
    }
    let (head, tail) = circles.split_at_mut(2);
    place(&head[1], &head[0], &mut tail[0]);

    // Circular doubly-linked front chain over circle indices; the three
    // seeds chain as a -> b -> c -> a.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b, c) = (0usize, 1usize, 2usize);
    next[a] = b;
    prev[b] = a;
    next[b] = c;
    prev[c] = b;
    next[c] = a;
    prev[a] = c;

    let mut i = 3;
    while i < n {
        let (before, rest) = circles.split_at_mut(i);
        let cnew = &mut rest[0];
        place(&before[a], &before[b], cnew);

        // Walk the front both ways looking for an intersection.
        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        let mut retry = false;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[i]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    retry = true;
                    break;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[i]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    retry = true;
                    break;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }
        if retry {
            continue;
        }

        // Insert the new circle between a and b, then advance to the chain
        // pair closest to the origin.
        prev[i] = a;
        next[i] = b;
        next[a] = i;
        prev[b] = i;
        b = i;

        let mut best = a;
        let mut best_score = score(circles, &next, a);
        let mut cursor = next[i];
        while cursor != i {
            let s = score(circles, &next, cursor);
            if s < best_score {
                best = cursor;
                best_score = s;
            }
            cursor = next[cursor];
        }
        a = best;
        b = next[a];
        i += 1;
    }
}

/// Smallest circle enclosing all of `circles` (deterministic Welzl-style
/// basis extension; no shuffling, so identical inputs give identical
/// output).
fn enclose(circles: &[Circle]) -> Circle {
    let mut basis: Vec<Circle> = Vec::new();
    let mut e: Option<Circle> = None;
    let mut i = 0;
    while i < circles.len() {
        let p = circles[i];
        match &e {
            Some(enc) if encloses_weak(enc, &p) => i += 1,
            _ => {
                basis = extend_basis(&basis, p);
                e = Some(enclose_basis(&basis));
                i = 0;
            }
        }
    }
    e.unwrap_or(Circle { x: 0.0, y: 0.0, r: 0.0 })
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn extend_basis(basis: &[Circle], p: Circle) -> Vec<Circle> {
    if encloses_weak_all(&p, basis) {
        return vec![p];
    }
    // One existing circle plus p may suffice.
    for &a in basis {
        if encloses_not(&p, &a)
            && encloses_weak_all(&enclose_basis2(&a, &p), basis)
        {
            return vec![a, p];
        }
    }
    // Otherwise some pair plus p forms the new basis.
    for i in 0..basis.len() {
        for j in (i + 1)..basis.len() {
            let (a, b) = (basis[i], basis[j]);
            if encloses_not(&enclose_basis2(&a, &b), &p)
                && encloses_not(&enclose_basis2(&a, &p), &b)
                && encloses_not(&enclose_basis2(&b, &p), &a)
                && encloses_weak_all(&enclose_basis3(&a, &b, &p), basis)
            {
                return vec![a, b, p];
            }
        }
    }
    // Unreachable for consistent geometry.
    vec![p]
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis.len() {
        1 => basis[0],
        2 => enclose_basis2(&basis[0], &basis[1]),
        _ => enclose_basis3(&basis[0], &basis[1], &basis[2]),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    if l < 1e-12 {
        return if a.r >= b.r { *a } else { *b };
    }
    Circle {
        x: (a.x + b.x + x21 / l * r21) / 2.0,
        y: (a.y + b.y + y21 / l * r21) / 2.0,
        r: (l + a.r + b.r) / 2.0,
    }
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let a2 = a.x - b.x;
    let a3 = a.x - c.x;
    let b2 = a.y - b.y;
    let b3 = a.y - c.y;
    let c2 = b.r - a.r;
    let c3 = c.r - a.r;
    let d1 = a.x * a.x + a.y * a.y - a.r * a.r;
    let d2 = d1 - b.x * b.x - b.y * b.y + b.r * b.r;
    let d3 = d1 - c.x * c.x - c.y * c.y + c.r * c.r;
    let ab = a3 * b2 - a2 * b3;
    if ab.abs() < 1e-12 {
        return enclose_basis2(a, c);
    }
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - a.x;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - a.y;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (a.r + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - a.r * a.r;
    let r = if qa.abs() > 1e-6 {
        -(qb + (qb * qb - 4.0 * qa * qc).max(0.0).sqrt()) / (2.0 * qa)
    } else {
        -qc / qb
    };
    Circle { x: a.x + xa + xb * r, y: a.y + ya + yb * r, r }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, value: f64) -> TreeNode {
        TreeNode { label: label.into(), value, children: vec![] }
    }

    #[test]
    fn siblings_do_not_overlap() {
        let root = TreeNode {
            label: "root".into(),
            value: 0.0,
            children: (1..=12).map(|i| leaf(&format!("n{}", i), i as f64)).collect(),
        };
        let packed = circle_pack(&root, 500.0, 2.0);
        let leaves: Vec<_> = packed.iter().filter(|c| c.is_leaf).collect();
        assert_eq!(leaves.len(), 12);
        for i in 0..leaves.len() {
            for j in (i + 1)..leaves.len() {
                let dx = leaves[i].x - leaves[j].x;
                let dy = leaves[i].y - leaves[j].y;
                let dist = (dx * dx + dy * dy).sqrt();
                assert!(
                    dist + 1e-6 >= leaves[i].r + leaves[j].r,
                    "{} and {} overlap: dist {} radii {} {}",
                    leaves[i].label,
                    leaves[j].label,
                    dist,
                    leaves[i].r,
                    leaves[j].r
                );
            }
        }
    }

    #[test]
    fn children_stay_inside_parent() {
        let root = TreeNode {
            label: "root".into(),
            value: 0.0,
            children: vec![
                TreeNode {
                    label: "g".into(),
                    value: 0.0,
                    children: vec![leaf("x", 4.0), leaf("y", 9.0)],
                },
                leaf("z", 16.0),
            ],
        };
        let packed = circle_pack(&root, 400.0, 1.0);
        let g = packed.iter().find(|c| c.label == "g").unwrap();
        for name in ["x", "y"] {
            let c = packed.iter().find(|c| c.label == name).unwrap();
            let dist = ((c.x - g.x).powi(2) + (c.y - g.y).powi(2)).sqrt();
            assert!(dist + c.r <= g.r + 1e-6, "{} escapes its parent", name);
        }
    }

    #[test]
    fn areas_scale_with_value() {
        let root = TreeNode {
            label: "root".into(),
            value: 0.0,
            children: vec![leaf("small", 1.0), leaf("big", 4.0)],
        };
        let packed = circle_pack(&root, 300.0, 0.0);
        let small = packed.iter().find(|c| c.label == "small").unwrap();
        let big = packed.iter().find(|c| c.label == "big").unwrap();
        assert!((big.r / small.r - 2.0).abs() < 1e-6);
    }

    #[test]
    fn empty_tree_packs_nothing() {
        let root = TreeNode { label: "root".into(), value: 0.0, children: vec![] };
        assert!(circle_pack(&root, 100.0, 0.0).is_empty());
    }
}
