pub mod band;
pub mod linear;
pub mod ordinal;
pub mod time;

pub use self::band::BandScale;
pub use self::linear::LinearScale;
pub use self::ordinal::OrdinalScale;
pub use self::time::TimeScale;

use crate::data::XValue;

/// Represents an individual tick on an axis.
#[derive(Debug, Clone)]
pub struct Tick {
    /// The value in data space (a number, a category index, or unix seconds).
    pub value: f64,
    /// The human-readable string representation (e.g. "100", "2026-01").
    pub label: String,
}

/// The positional scale variants, as a tagged sum.
///
/// Renderers that know their axis kind use the concrete scales directly; the
/// sum exists for charts whose x kind is decided at the adapter boundary by
/// sniffing the first x value (number → Linear, RFC 3339 text → Time, other
/// text → Band). Callers dispatch through this type and never match on a
/// concrete variant themselves.
#[derive(Debug, Clone)]
pub enum PositionScale {
    Linear(LinearScale),
    Band(BandScale),
    Time(TimeScale),
}

impl PositionScale {
    /// Maps an x value to a pixel coordinate.
    ///
    /// A value of the wrong kind for the underlying scale maps to the range
    /// start, mirroring the band scale's unknown-category rule.
    pub fn apply(&self, x: &XValue) -> f64 {
        match self {
            PositionScale::Linear(s) => match x.as_number() {
                Some(v) => s.apply(v),
                None => s.range().0,
            },
            PositionScale::Band(s) => match x {
                XValue::Text(t) => s.center(t),
                XValue::Number(n) => s.center(&format_number(*n)),
            },
            PositionScale::Time(s) => match x.as_instant() {
                Some(t) => s.apply(t),
                None => s.range().0,
            },
        }
    }

    /// Ticks already mapped to pixel positions, ready for an axis renderer.
    pub fn placed_ticks(&self, count: usize) -> Vec<(f64, String)> {
        match self {
            PositionScale::Linear(s) => s
                .ticks(count)
                .into_iter()
                .map(|t| (s.apply(t.value), t.label))
                .collect(),
            PositionScale::Band(s) => s
                .ticks()
                .into_iter()
                .map(|t| (s.position(t.value as usize) + s.bandwidth() / 2.0, t.label))
                .collect(),
            PositionScale::Time(s) => s
                .ticks(count)
                .into_iter()
                .map(|t| (s.apply_seconds(t.value), t.label))
                .collect(),
        }
    }

    pub fn range(&self) -> (f64, f64) {
        match self {
            PositionScale::Linear(s) => s.range(),
            PositionScale::Band(s) => s.range(),
            PositionScale::Time(s) => s.range(),
        }
    }
}

/// Canonical text form of a numeric category label.
pub(crate) fn format_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
