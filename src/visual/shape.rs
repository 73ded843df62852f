use std::fmt::Write;

/// Represents the marker shapes available to scatter-family charts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointShape {
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    X,
    Dot,
}

impl PointShape {
    /// Emits the SVG element(s) for one marker centered at (x, y) with the
    /// given radius-like size.
    pub fn emit(&self, svg: &mut String, x: f64, y: f64, size: f64, fill: &str) -> std::fmt::Result {
        match self {
            PointShape::Circle => writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" />"#,
                x, y, size, fill
            ),
            PointShape::Dot => writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" />"#,
                x,
                y,
                (size * 0.4).max(1.0),
                fill
            ),
            PointShape::Square => writeln!(
                svg,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" />"#,
                x - size,
                y - size,
                size * 2.0,
                size * 2.0,
                fill
            ),
            PointShape::Diamond => writeln!(
                svg,
                r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{}" />"#,
                x,
                y - size,
                x + size,
                y,
                x,
                y + size,
                x - size,
                y,
                fill
            ),
            PointShape::Triangle => writeln!(
                svg,
                r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{}" />"#,
                x,
                y - size,
                x + size,
                y + size,
                x - size,
                y + size,
                fill
            ),
            PointShape::Cross => {
                let arm = size * 0.35;
                writeln!(
                    svg,
                    r#"<path d="M {:.2} {:.2} H {:.2} V {:.2} H {:.2} V {:.2} H {:.2} V {:.2} H {:.2} V {:.2} H {:.2} V {:.2} H {:.2} Z" fill="{}" />"#,
                    x - arm,
                    y - size,
                    x + arm,
                    y - arm,
                    x + size,
                    y + arm,
                    x + arm,
                    y + size,
                    x - arm,
                    y + arm,
                    x - size,
                    y - arm,
                    x - arm,
                    fill
                )
            }
            PointShape::X => {
                writeln!(
                    svg,
                    r#"<path d="M {:.2} {:.2} L {:.2} {:.2} M {:.2} {:.2} L {:.2} {:.2}" stroke="{}" stroke-width="{:.2}" stroke-linecap="round" fill="none" />"#,
                    x - size,
                    y - size,
                    x + size,
                    y + size,
                    x - size,
                    y + size,
                    x + size,
                    y - size,
                    fill,
                    (size * 0.4).max(1.0)
                )
            }
        }
    }
}

impl From<&str> for PointShape {
    /// Converts a string like "circle" or "diamond" into a `PointShape`,
    /// defaulting to Circle for unrecognized input.
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "circle" => PointShape::Circle,
            "square" => PointShape::Square,
            "diamond" => PointShape::Diamond,
            "triangle" => PointShape::Triangle,
            "cross" => PointShape::Cross,
            "x" => PointShape::X,
            "dot" => PointShape::Dot,
            _ => PointShape::Circle,
        }
    }
}

impl From<String> for PointShape {
    fn from(s: String) -> Self {
        PointShape::from(s.as_str())
    }
}

impl Default for PointShape {
    fn default() -> Self {
        PointShape::Circle
    }
}
