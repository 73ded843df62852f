use ahash::AHashMap;

/// Maps each domain value to a fixed range value by position, wrapping
/// modulo the range length.
///
/// The main use is categorical color assignment: the domain is the series
/// or category names, the range is a palette.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    domain: Vec<String>,
    index: AHashMap<String, usize>,
    range: Vec<String>,
}

impl OrdinalScale {
    pub fn new<I, S>(domain: I, range: Vec<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dedup = Vec::new();
        let mut index = AHashMap::new();
        for value in domain {
            let value = value.into();
            if !index.contains_key(&value) {
                index.insert(value.clone(), dedup.len());
                dedup.push(value);
            }
        }
        Self { domain: dedup, index, range }
    }

    /// Range value for `value`; unknown values are appended behaviorally by
    /// falling back to position 0, keeping lookups total.
    pub fn apply(&self, value: &str) -> &str {
        let i = self.index.get(value).copied().unwrap_or(0);
        self.by_index(i)
    }

    /// Range value by raw position, wrapping modulo the range length.
    pub fn by_index(&self, index: usize) -> &str {
        if self.range.is_empty() {
            return "#000000";
        }
        &self.range[index % self.range.len()]
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_modulo_range_length() {
        let s = OrdinalScale::new(
            ["a", "b", "c"],
            vec!["red".into(), "green".into()],
        );
        assert_eq!(s.apply("a"), "red");
        assert_eq!(s.apply("b"), "green");
        assert_eq!(s.apply("c"), "red");
    }

    #[test]
    fn unknown_value_falls_back_to_first() {
        let s = OrdinalScale::new(["a"], vec!["red".into(), "green".into()]);
        assert_eq!(s.apply("nope"), "red");
    }
}
