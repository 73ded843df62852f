use crate::scale::Tick;

/// A scale that maps a continuous data domain onto a pixel range.
///
/// The `LinearScale` is the workhorse of quantitative positioning. The same
/// construction serves both axis orientations: a y axis simply passes a
/// descending range like `(height, 0.0)`.
#[derive(Debug, Clone)]
pub struct LinearScale {
    /// The input data boundaries: (min_value, max_value).
    domain: (f64, f64),
    /// The output visual boundaries: (start_pixel, end_pixel).
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Builds a scale over the extent of `values`, defaulting to (0, 1) for
    /// an empty slice so callers never divide by zero.
    pub fn from_values<'a>(values: impl Iterator<Item = &'a f64>, range: (f64, f64)) -> Self {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if !lo.is_finite() || !hi.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        Self { domain: (lo, hi), range }
    }

    /// Maps a data value to a pixel coordinate.
    ///
    /// Formula: `range.0 + (v - d0) / (d1 - d0) * (range.1 - range.0)`.
    /// A zero-width domain maps everything to the range start.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < f64::EPSILON {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Maps a pixel coordinate back to a data value.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.abs() < f64::EPSILON {
            return d0;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Widens both domain endpoints to multiples of a nice power-of-ten step
    /// (1, 2, or 5 times 10^k) chosen so roughly `count` ticks fit.
    pub fn nice(mut self, count: usize) -> Self {
        let step = nice_step(self.domain.1 - self.domain.0, count);
        if step > 0.0 {
            self.domain.0 = (self.domain.0 / step).floor() * step;
            self.domain.1 = (self.domain.1 / step).ceil() * step;
        }
        self
    }

    /// Generates human-readable tick marks inside the domain.
    ///
    /// Label precision follows the magnitude of the step, so a step of 0.1
    /// yields one decimal place and a step of 10 yields none.
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let (min, max) = self.domain;
        let step = nice_step(max - min, count);
        if step <= 0.0 {
            return vec![Tick { value: min, label: format_tick(min, 0) }];
        }

        let precision = (-(step.log10().floor()) as i32).max(0) as usize;
        let tolerance = step * 1e-9;
        let start = (min / step).ceil() * step;

        let mut ticks = Vec::new();
        let mut curr = start;
        let mut iterations = 0;
        while curr <= max + tolerance && iterations < 1000 {
            let clean = if curr.abs() < 1e-12 { 0.0 } else { curr };
            ticks.push(Tick { value: clean, label: format_tick(clean, precision) });
            curr += step;
            iterations += 1;
        }
        ticks
    }
}

/// Picks a "nice" step (1, 2, or 5 times a power of ten) for the given span
/// and target tick count.
fn nice_step(span: f64, count: usize) -> f64 {
    let span = span.abs();
    if span < 1e-12 {
        return 0.0;
    }
    let rough = span / (count.max(2) as f64);
    let exp = 10f64.powf(rough.log10().floor());
    let f = rough / exp;
    let nice = if f < 1.5 {
        1.0
    } else if f < 3.0 {
        2.0
    } else if f < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * exp
}

fn format_tick(value: f64, precision: usize) -> String {
    format!("{:.1$}", value, precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_to_range() {
        let s = LinearScale::new((0.0, 100.0), (40.0, 760.0));
        assert!((s.apply(0.0) - 40.0).abs() < 1e-9);
        assert!((s.apply(100.0) - 760.0).abs() < 1e-9);
        assert!((s.apply(50.0) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn invert_round_trips() {
        let s = LinearScale::new((-5.0, 20.0), (0.0, 500.0));
        for v in [-5.0, -1.25, 0.0, 7.5, 20.0] {
            assert!((s.invert(s.apply(v)) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_width_domain_maps_to_range_start() {
        let s = LinearScale::new((3.0, 3.0), (10.0, 90.0));
        assert_eq!(s.apply(3.0), 10.0);
        assert_eq!(s.apply(1000.0), 10.0);
    }

    #[test]
    fn nice_expands_to_round_numbers() {
        let s = LinearScale::new((0.13, 9.87), (0.0, 1.0)).nice(5);
        let (d0, d1) = s.domain();
        assert_eq!(d0, 0.0);
        assert_eq!(d1, 10.0);
    }

    #[test]
    fn ticks_are_evenly_spaced_and_inside() {
        let s = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert!(ticks.len() >= 4);
        for pair in ticks.windows(2) {
            assert!((pair[1].value - pair[0].value - 20.0).abs() < 1e-9);
        }
        assert!(ticks.first().unwrap().value >= 0.0);
        assert!(ticks.last().unwrap().value <= 100.0);
    }
}
