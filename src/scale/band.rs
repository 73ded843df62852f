use ahash::AHashMap;

use crate::scale::Tick;

/// A scale for categorical data where each category occupies an equal-width
/// band of the range.
///
/// Given `n` categories, inner/outer padding ratios and an alignment in
/// [0, 1], the geometry solves to:
///
/// ```text
/// step      = |range| / (n - inner + 2 * outer)
/// bandwidth = step * (1 - inner)
/// start     = range.0 + (|range| - step * (n - inner)) * align
/// ```
///
/// `apply` returns the left (or top) edge of a category's band. For a
/// reversed range the step is negative and bands fill from `range.1` toward
/// `range.0`; `apply(cat) + bandwidth()` still lies inside the range.
#[derive(Debug, Clone)]
pub struct BandScale {
    /// Unique categories in first-occurrence order.
    domain: Vec<String>,
    /// O(1) category -> index lookup.
    index: AHashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    // Derived geometry, rebuilt whenever a parameter changes.
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl BandScale {
    /// Creates a band scale over `categories`. Duplicates are dropped; the
    /// first occurrence wins.
    pub fn new<I, S>(categories: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut domain = Vec::new();
        let mut index = AHashMap::new();
        for cat in categories {
            let cat = cat.into();
            if !index.contains_key(&cat) {
                index.insert(cat.clone(), domain.len());
                domain.push(cat);
            }
        }
        let mut scale = Self {
            domain,
            index,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
            step: 0.0,
            bandwidth: 0.0,
            start: range.0,
        };
        scale.rebuild();
        scale
    }

    /// Sets inner and outer padding ratios, both clamped to [0, 1].
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.clamp(0.0, 1.0);
        self.rebuild();
        self
    }

    /// Sets the alignment of leftover outer space, clamped to [0, 1].
    pub fn with_align(mut self, align: f64) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self.rebuild();
        self
    }

    /// Clamps the start and bandwidth to whole pixels.
    pub fn rounded(mut self) -> Self {
        self.round = true;
        self.rebuild();
        self
    }

    fn rebuild(&mut self) {
        let n = self.domain.len();
        if n == 0 {
            self.step = 0.0;
            self.bandwidth = 0.0;
            self.start = self.range.0;
            return;
        }
        let span = self.range.1 - self.range.0;
        let denom = (n as f64 - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        let mut step = span / denom;
        if self.round {
            step = step.signum() * step.abs().floor();
        }
        let mut start = self.range.0 + (span - step * (n as f64 - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.signum() * bandwidth.abs().round();
        }
        self.step = step;
        self.bandwidth = bandwidth;
        self.start = start;
    }

    /// Left (or top) edge of the band for `category`.
    ///
    /// An unknown category maps to the range start with no error; callers
    /// that care can check [`BandScale::contains`] first.
    pub fn apply(&self, category: &str) -> f64 {
        match self.index.get(category) {
            Some(&i) => self.position(i),
            None => self.range.0,
        }
    }

    /// Band edge by category index.
    pub fn position(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }

    /// Midpoint of the band, where tick labels and point marks sit.
    pub fn center(&self, category: &str) -> f64 {
        self.apply(category) + self.bandwidth / 2.0
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn contains(&self, category: &str) -> bool {
        self.index.contains_key(category)
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// One tick per category; the value is the category index.
    pub fn ticks(&self) -> Vec<Tick> {
        self.domain
            .iter()
            .enumerate()
            .map(|(i, label)| Tick { value: i as f64, label: label.clone() })
            .collect()
    }
}
