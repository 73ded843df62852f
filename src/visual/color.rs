// Continuous colormap stop tables follow the standard matplotlib releases
// (https://hauselin.github.io/colorpalettejs/).

use crate::error::{ChartsmithError, Result};

/// Continuous color mapping schemes for numerical data.
///
/// The perceptually uniform maps (Viridis, Plasma, Inferno, Magma, Cividis)
/// are the defaults for heat-style charts; RdBu is the diverging map used
/// where values straddle zero (correlograms).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMap {
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    RdBu,
}

impl ColorMap {
    /// Resolves a user-supplied name, falling back to Viridis.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "plasma" => ColorMap::Plasma,
            "inferno" => ColorMap::Inferno,
            "magma" => ColorMap::Magma,
            "cividis" => ColorMap::Cividis,
            "rdbu" | "diverging" => ColorMap::RdBu,
            _ => ColorMap::Viridis,
        }
    }

    /// Returns a hex color for a value in [0, 1]; out-of-range values clamp.
    pub fn get_color(&self, value: f64) -> String {
        let v = value.clamp(0.0, 1.0);
        match self {
            ColorMap::Viridis => interpolate_color_stops(
                &[
                    (0.00000, 0x44, 0x01, 0x54),
                    (0.06667, 0x48, 0x1a, 0x6c),
                    (0.13333, 0x47, 0x2f, 0x7d),
                    (0.20000, 0x41, 0x44, 0x87),
                    (0.26667, 0x39, 0x56, 0x8c),
                    (0.33333, 0x31, 0x68, 0x8e),
                    (0.40000, 0x2a, 0x78, 0x8e),
                    (0.46667, 0x23, 0x88, 0x8e),
                    (0.53333, 0x1f, 0x98, 0x8b),
                    (0.60000, 0x22, 0xa8, 0x84),
                    (0.66667, 0x35, 0xb7, 0x79),
                    (0.73333, 0x54, 0xc5, 0x68),
                    (0.80000, 0x7a, 0xd1, 0x51),
                    (0.86667, 0xa5, 0xdb, 0x36),
                    (0.93333, 0xd2, 0xe2, 0x1b),
                    (1.00000, 0xfd, 0xe7, 0x25),
                ],
                v,
            ),
            ColorMap::Plasma => interpolate_color_stops(
                &[
                    (0.00000, 0x0d, 0x08, 0x87),
                    (0.06667, 0x33, 0x05, 0x97),
                    (0.13333, 0x50, 0x02, 0xa2),
                    (0.20000, 0x6a, 0x00, 0xa8),
                    (0.26667, 0x84, 0x05, 0xa7),
                    (0.33333, 0x9c, 0x17, 0x9e),
                    (0.40000, 0xb1, 0x2a, 0x90),
                    (0.46667, 0xc3, 0x3d, 0x80),
                    (0.53333, 0xd3, 0x51, 0x71),
                    (0.60000, 0xe1, 0x64, 0x62),
                    (0.66667, 0xed, 0x79, 0x53),
                    (0.73333, 0xf6, 0x8f, 0x44),
                    (0.80000, 0xfc, 0xa6, 0x36),
                    (0.86667, 0xfe, 0xc0, 0x29),
                    (0.93333, 0xf9, 0xdc, 0x24),
                    (1.00000, 0xf0, 0xf9, 0x21),
                ],
                v,
            ),
            ColorMap::Inferno => interpolate_color_stops(
                &[
                    (0.00000, 0x00, 0x00, 0x04),
                    (0.13333, 0x24, 0x0c, 0x4f),
                    (0.26667, 0x5d, 0x12, 0x6e),
                    (0.40000, 0x93, 0x26, 0x67),
                    (0.53333, 0xc7, 0x3e, 0x4c),
                    (0.66667, 0xed, 0x69, 0x25),
                    (0.80000, 0xfc, 0xa5, 0x0a),
                    (0.93333, 0xf2, 0xe6, 0x61),
                    (1.00000, 0xfc, 0xff, 0xa4),
                ],
                v,
            ),
            ColorMap::Magma => interpolate_color_stops(
                &[
                    (0.00000, 0x00, 0x00, 0x04),
                    (0.13333, 0x20, 0x11, 0x4b),
                    (0.26667, 0x57, 0x15, 0x7e),
                    (0.40000, 0x8c, 0x29, 0x81),
                    (0.53333, 0xc4, 0x3c, 0x75),
                    (0.66667, 0xf1, 0x60, 0x5d),
                    (0.80000, 0xfe, 0x9f, 0x6d),
                    (0.93333, 0xfd, 0xde, 0xa0),
                    (1.00000, 0xfc, 0xfd, 0xbf),
                ],
                v,
            ),
            ColorMap::Cividis => interpolate_color_stops(
                &[
                    (0.00000, 0x00, 0x20, 0x51),
                    (0.13333, 0x14, 0x38, 0x6d),
                    (0.26667, 0x42, 0x50, 0x6e),
                    (0.40000, 0x69, 0x69, 0x70),
                    (0.53333, 0x86, 0x82, 0x76),
                    (0.66667, 0xa4, 0x9d, 0x78),
                    (0.80000, 0xca, 0xba, 0x6a),
                    (0.93333, 0xf2, 0xd9, 0x50),
                    (1.00000, 0xfd, 0xea, 0x45),
                ],
                v,
            ),
            // ColorBrewer RdBu, red at 0 through white to blue at 1.
            ColorMap::RdBu => interpolate_color_stops(
                &[
                    (0.0, 0x67, 0x00, 0x1f),
                    (0.1, 0xb2, 0x18, 0x2b),
                    (0.2, 0xd6, 0x60, 0x4d),
                    (0.3, 0xf4, 0xa5, 0x82),
                    (0.4, 0xfd, 0xdb, 0xc7),
                    (0.5, 0xf7, 0xf7, 0xf7),
                    (0.6, 0xd1, 0xe5, 0xf0),
                    (0.7, 0x92, 0xc5, 0xde),
                    (0.8, 0x43, 0x93, 0xc3),
                    (0.9, 0x21, 0x66, 0xac),
                    (1.0, 0x05, 0x30, 0x61),
                ],
                v,
            ),
        }
    }
}

/// Piecewise-linear RGB interpolation over ordered color stops.
///
/// This is the single shared implementation; every ramp in the crate goes
/// through it.
fn interpolate_color_stops(stops: &[(f64, u8, u8, u8)], value: f64) -> String {
    for window in stops.windows(2) {
        let (p0, r0, g0, b0) = window[0];
        let (p1, r1, g1, b1) = window[1];
        if value >= p0 && value <= p1 {
            let t = if (p1 - p0).abs() < 1e-12 { 0.0 } else { (value - p0) / (p1 - p0) };
            let r = (r0 as f64 + t * (r1 as f64 - r0 as f64)).round() as u8;
            let g = (g0 as f64 + t * (g1 as f64 - g0 as f64)).round() as u8;
            let b = (b0 as f64 + t * (b1 as f64 - b0 as f64)).round() as u8;
            return format!("#{:02x}{:02x}{:02x}", r, g, b);
        }
    }
    if value <= stops[0].0 {
        let (_, r, g, b) = stops[0];
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        let (_, r, g, b) = stops[stops.len() - 1];
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Discrete color palettes for categorical data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorPalette {
    Tab10,
    Set2,
}

impl ColorPalette {
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            ColorPalette::Tab10 => &[
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
                "#7f7f7f", "#bcbd22", "#17becf",
            ],
            ColorPalette::Set2 => &[
                "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494",
                "#b3b3b3",
            ],
        }
    }

    /// Color by index, wrapping modulo the palette size.
    pub fn get_color(&self, index: usize) -> String {
        let colors = self.colors();
        colors[index % colors.len()].to_string()
    }

    pub fn owned_colors(&self) -> Vec<String> {
        self.colors().iter().map(|c| c.to_string()).collect()
    }
}

/// Parses a user-supplied CSS color (hex, `hsl(...)`, `rgb(...)`, or a
/// named color) into a normalized `#rrggbb` string.
pub fn parse_color(input: &str) -> Result<String> {
    let color = csscolorparser::parse(input)
        .map_err(|e| ChartsmithError::Data(format!("invalid color '{}': {}", input, e)))?;
    let [r, g, b, _a] = color.to_rgba8();
    Ok(format!("#{:02x}{:02x}{:02x}", r, g, b))
}

/// Interpolates two colors in HSL space, taking the short way around the
/// hue circle.
pub fn interpolate_hsl(from: &str, to: &str, t: f64) -> Result<String> {
    let t = t.clamp(0.0, 1.0);
    let a = csscolorparser::parse(from)
        .map_err(|e| ChartsmithError::Data(format!("invalid color '{}': {}", from, e)))?;
    let b = csscolorparser::parse(to)
        .map_err(|e| ChartsmithError::Data(format!("invalid color '{}': {}", to, e)))?;
    let [ar, ag, ab, _] = a.to_rgba8();
    let [br, bg, bb, _] = b.to_rgba8();
    let (h0, s0, l0) = rgb_to_hsl(ar, ag, ab);
    let (h1, s1, l1) = rgb_to_hsl(br, bg, bb);

    let mut dh = h1 - h0;
    if dh > 180.0 {
        dh -= 360.0;
    } else if dh < -180.0 {
        dh += 360.0;
    }
    let h = (h0 + dh * t).rem_euclid(360.0);
    let s = s0 + (s1 - s0) * t;
    let l = l0 + (l1 - l0) * t;
    Ok(hsl_to_rgb(h, s, l))
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if (max - min).abs() < 1e-12 {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if (max - r).abs() < 1e-12 {
        ((g - b) / d).rem_euclid(6.0)
    } else if (max - g).abs() < 1e-12 {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

/// Converts HSL back to a hex RGB string.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> String {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let r = ((r + m) * 255.0).round() as u8;
    let g = ((g + m) * 255.0).round() as u8;
    let b = ((b + m) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints() {
        assert_eq!(ColorMap::Viridis.get_color(0.0), "#440154");
        assert_eq!(ColorMap::Viridis.get_color(1.0), "#fde725");
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(ColorMap::Plasma.get_color(-3.0), ColorMap::Plasma.get_color(0.0));
        assert_eq!(ColorMap::Plasma.get_color(9.0), ColorMap::Plasma.get_color(1.0));
    }

    #[test]
    fn diverging_midpoint_is_neutral() {
        assert_eq!(ColorMap::RdBu.get_color(0.5), "#f7f7f7");
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(ColorPalette::Tab10.get_color(0), ColorPalette::Tab10.get_color(10));
    }

    #[test]
    fn parse_normalizes_hex_and_hsl() {
        assert_eq!(parse_color("#FF0000").unwrap(), "#ff0000");
        assert_eq!(parse_color("hsl(120, 100%, 50%)").unwrap(), "#00ff00");
        assert!(parse_color("not-a-color").is_err());
    }

    #[test]
    fn hsl_interpolation_endpoints() {
        assert_eq!(interpolate_hsl("#ff0000", "#0000ff", 0.0).unwrap(), "#ff0000");
        assert_eq!(interpolate_hsl("#ff0000", "#0000ff", 1.0).unwrap(), "#0000ff");
    }
}
