//! Path construction for polylines and Catmull-Rom smoothing.

use std::fmt::Write;

/// Builds a straight polyline `d` attribute through `points`.
pub fn polyline_d(points: &[(f64, f64)]) -> String {
    let mut d = String::with_capacity(points.len() * 16);
    for (i, (x, y)) in points.iter().enumerate() {
        if i == 0 {
            let _ = write!(d, "M {:.2} {:.2}", x, y);
        } else {
            let _ = write!(d, " L {:.2} {:.2}", x, y);
        }
    }
    d
}

/// Builds a smooth path through `points` using a Catmull-Rom spline
/// converted to cubic Bézier segments.
///
/// `tension` in [0, 1] controls how strongly the spline follows the chord;
/// 0 degenerates to straight segments.
pub fn catmull_rom_d(points: &[(f64, f64)], tension: f64) -> String {
    if points.len() < 3 {
        return polyline_d(points);
    }
    let t = tension.clamp(0.0, 1.0);
    let mut d = String::with_capacity(points.len() * 48);
    let _ = write!(d, "M {:.2} {:.2}", points[0].0, points[0].1);

    for i in 0..points.len() - 1 {
        // Clamp the neighborhood at the ends.
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < points.len() { points[i + 2] } else { points[i + 1] };

        let c1 = (p1.0 + (p2.0 - p0.0) * t / 6.0, p1.1 + (p2.1 - p0.1) * t / 6.0);
        let c2 = (p2.0 - (p3.0 - p1.0) * t / 6.0, p2.1 - (p3.1 - p1.1) * t / 6.0);

        let _ = write!(
            d,
            " C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
            c1.0, c1.1, c2.0, c2.1, p2.0, p2.1
        );
    }
    d
}

/// Cubic Bézier ribbon between two vertical edges, used by Sankey flows.
/// Control points sit at the horizontal midpoint.
pub fn ribbon_d(x0: f64, y0_top: f64, y0_bottom: f64, x1: f64, y1_top: f64, y1_bottom: f64) -> String {
    let mid = (x0 + x1) / 2.0;
    format!(
        "M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} L {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} Z",
        x0, y0_top, mid, y0_top, mid, y1_top, x1, y1_top, x1, y1_bottom, mid, y1_bottom, mid,
        y0_bottom, x0, y0_bottom
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_fall_back_to_polyline() {
        let d = catmull_rom_d(&[(0.0, 0.0), (10.0, 10.0)], 1.0);
        assert_eq!(d, "M 0.00 0.00 L 10.00 10.00");
    }

    #[test]
    fn zero_tension_controls_sit_on_endpoints() {
        let d = catmull_rom_d(&[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)], 0.0);
        // With t = 0 every control point collapses onto the endpoints.
        assert!(d.contains("C 0.00 0.00 10.00 5.00 10.00 5.00"));
    }

    #[test]
    fn smooth_path_passes_through_data_points() {
        let pts = [(0.0, 0.0), (10.0, 5.0), (20.0, 1.0), (30.0, 8.0)];
        let d = catmull_rom_d(&pts, 0.8);
        for (x, y) in pts {
            assert!(d.contains(&format!("{:.2} {:.2}", x, y)));
        }
    }
}
