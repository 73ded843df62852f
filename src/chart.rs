//! Chart specs and renderers.
//!
//! Every chart type has a typed spec (serde round-trippable) and a renderer
//! `fn render(&Spec, &Theme) -> Result<String>` producing an SVG fragment.
//! Fragments never include the `<svg>` wrapper; the adapter or gallery adds
//! it. Renderers validate their data up front and return a data error with
//! the offending reason instead of panicking.

pub mod area;
pub mod bar;
pub mod distribution;
pub mod finance;
pub mod flow;
pub mod heatmap;
pub mod hierarchy;
pub mod line;
pub mod pie;
pub mod radar;
pub mod scatter;
pub mod wordcloud;

use crate::error::Result;
use crate::theme::Theme;
use crate::visual::color::parse_color;

/// Resolves a mark's fill: an explicit spec color wins, otherwise the
/// theme palette assigns by index.
pub(crate) fn series_color(explicit: Option<&str>, index: usize, theme: &Theme) -> Result<String> {
    match explicit {
        Some(c) => parse_color(c),
        None => Ok(theme.series_color(index)),
    }
}

/// Compact value label: integers lose the decimal point, fractions keep
/// two places.
pub(crate) fn format_value(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
