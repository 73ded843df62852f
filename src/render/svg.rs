//! Low-level SVG element writers.
//!
//! Every function appends one element to a `String` buffer with fixed
//! `{:.2}` numeric precision, so identical inputs always produce identical
//! bytes. Text content is escaped; attribute values are produced only from
//! validated colors and numbers.

use std::fmt::Write;

/// Wraps a fragment into a complete standalone SVG document.
pub fn wrap_svg(width: f64, height: f64, background: &str, body: &str) -> String {
    let mut svg = String::with_capacity(body.len() + 256);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        width, height, width, height
    );
    let _ = writeln!(
        svg,
        r#"<rect x="0" y="0" width="{:.0}" height="{:.0}" fill="{}" />"#,
        width, height, background
    );
    svg.push_str(body);
    svg.push_str("</svg>");
    svg
}

pub fn rect(
    svg: &mut String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill: &str,
    stroke: &str,
    stroke_width: f64,
    opacity: f64,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="{:.2}" opacity="{:.2}" />"#,
        x, y, width, height, fill, stroke, stroke_width, opacity
    )
}

pub fn circle(
    svg: &mut String,
    cx: f64,
    cy: f64,
    r: f64,
    fill: &str,
    stroke: &str,
    stroke_width: f64,
    opacity: f64,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{:.2}" opacity="{:.2}" />"#,
        cx, cy, r, fill, stroke, stroke_width, opacity
    )
}

pub fn line(
    svg: &mut String,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    stroke: &str,
    stroke_width: f64,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" />"#,
        x1, y1, x2, y2, stroke, stroke_width
    )
}

/// Draws a path from a prebuilt `d` attribute.
pub fn path(
    svg: &mut String,
    d: &str,
    fill: &str,
    stroke: &str,
    stroke_width: f64,
    opacity: f64,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<path d="{}" fill="{}" stroke="{}" stroke-width="{:.2}" opacity="{:.2}" stroke-linejoin="round" stroke-linecap="round" />"#,
        d, fill, stroke, stroke_width, opacity
    )
}

pub fn polygon(
    svg: &mut String,
    points: &[(f64, f64)],
    fill: &str,
    stroke: &str,
    stroke_width: f64,
    opacity: f64,
) -> std::fmt::Result {
    let mut pts = String::with_capacity(points.len() * 14);
    for (i, (px, py)) in points.iter().enumerate() {
        if i > 0 {
            pts.push(' ');
        }
        write!(pts, "{:.2},{:.2}", px, py)?;
    }
    writeln!(
        svg,
        r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="{:.2}" opacity="{:.2}" />"#,
        pts, fill, stroke, stroke_width, opacity
    )
}

#[allow(clippy::too_many_arguments)]
pub fn text(
    svg: &mut String,
    x: f64,
    y: f64,
    content: &str,
    font_size: u32,
    font_family: &str,
    fill: &str,
    anchor: &str,
    weight: &str,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" font-size="{}" font-family="{}" fill="{}" text-anchor="{}" font-weight="{}">{}</text>"#,
        x,
        y,
        font_size,
        font_family,
        fill,
        anchor,
        weight,
        html_escape::encode_text(content)
    )
}

/// Text rotated around its anchor point, for slanted tick labels and
/// radial layouts.
#[allow(clippy::too_many_arguments)]
pub fn rotated_text(
    svg: &mut String,
    x: f64,
    y: f64,
    angle_deg: f64,
    content: &str,
    font_size: u32,
    font_family: &str,
    fill: &str,
    anchor: &str,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" font-size="{}" font-family="{}" fill="{}" text-anchor="{}" transform="rotate({:.2} {:.2} {:.2})">{}</text>"#,
        x,
        y,
        font_size,
        font_family,
        fill,
        anchor,
        angle_deg,
        x,
        y,
        html_escape::encode_text(content)
    )
}

/// Rectangle filled with a linear gradient running left to right.
///
/// `id` must be unique within the enclosing document; callers derive it
/// from a per-call counter so identical calls stay byte-identical.
#[allow(clippy::too_many_arguments)]
pub fn gradient_rect(
    svg: &mut String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    stops: &[(f64, String)],
    id: &str,
) -> std::fmt::Result {
    writeln!(
        svg,
        r#"<defs><linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="0%">"#,
        id
    )?;
    for (offset, color) in stops {
        writeln!(svg, r#"<stop offset="{:.1}%" stop-color="{}"/>"#, offset * 100.0, color)?;
    }
    writeln!(svg, "</linearGradient></defs>")?;
    writeln!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="url(#{})"/>"#,
        x, y, width, height, id
    )
}

pub fn group_open(svg: &mut String, translate_x: f64, translate_y: f64) -> std::fmt::Result {
    writeln!(svg, r#"<g transform="translate({:.2} {:.2})">"#, translate_x, translate_y)
}

pub fn group_close(svg: &mut String) -> std::fmt::Result {
    writeln!(svg, "</g>")
}

/// Builds the `d` attribute for an annular sector between `r_inner` and
/// `r_outer`, from `start_angle` to `end_angle` (radians, clockwise from
/// 12 o'clock).
pub fn annular_sector_d(
    cx: f64,
    cy: f64,
    r_inner: f64,
    r_outer: f64,
    start_angle: f64,
    end_angle: f64,
) -> String {
    let (sx_o, sy_o) = polar(cx, cy, r_outer, start_angle);
    let (ex_o, ey_o) = polar(cx, cy, r_outer, end_angle);
    let (sx_i, sy_i) = polar(cx, cy, r_inner, end_angle);
    let (ex_i, ey_i) = polar(cx, cy, r_inner, start_angle);
    let large = if end_angle - start_angle > std::f64::consts::PI { 1 } else { 0 };
    if r_inner <= 0.0 {
        format!(
            "M {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} L {:.2} {:.2} Z",
            sx_o, sy_o, r_outer, r_outer, large, ex_o, ey_o, cx, cy
        )
    } else {
        format!(
            "M {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 0 {:.2} {:.2} Z",
            sx_o, sy_o, r_outer, r_outer, large, ex_o, ey_o, sx_i, sy_i, r_inner, r_inner, large,
            ex_i, ey_i
        )
    }
}

/// Converts a clockwise-from-north angle to a point on the circle.
pub fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.sin(), cy - r * angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_is_escaped() {
        let mut svg = String::new();
        text(&mut svg, 0.0, 0.0, "a < b & c", 12, "sans-serif", "#000", "start", "normal").unwrap();
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn wrap_produces_complete_document() {
        let doc = wrap_svg(100.0, 50.0, "#fff", "<circle/>");
        assert!(doc.starts_with("<svg xmlns"));
        assert!(doc.ends_with("</svg>"));
        assert!(doc.contains(r#"width="100""#));
    }

    #[test]
    fn polar_points_north_at_zero() {
        let (x, y) = polar(0.0, 0.0, 10.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!((y + 10.0).abs() < 1e-9);
    }
}
