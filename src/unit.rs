use crate::error::{ChartsmithError, Result};

/// Unit tag carried by a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Device pixels, the base unit every range resolves to.
    Px,
    /// Percentage of a parent length, resolved at render time.
    Percent,
    /// Multiples of the current font size.
    Em,
}

/// A numeric magnitude paired with a unit tag.
///
/// Percent-based layouts (gallery grids) express positions as `Length`s
/// resolved against the parent at the last moment, which avoids the
/// accumulation drift of precomputed pixel offsets. Arithmetic between two
/// lengths requires a common unit; mixed units are a configuration error
/// surfaced at render time, not a panic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub fn percent(value: f64) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    pub fn em(value: f64) -> Self {
        Self { value, unit: LengthUnit::Em }
    }

    /// Resolves this length to device pixels.
    ///
    /// `parent_px` anchors percentages; `font_px` anchors em units.
    pub fn resolve(&self, parent_px: f64, font_px: f64) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Percent => parent_px * self.value / 100.0,
            LengthUnit::Em => font_px * self.value,
        }
    }

    /// Adds two lengths, requiring a shared unit.
    pub fn checked_add(&self, other: &Length) -> Result<Length> {
        if self.unit != other.unit {
            return Err(ChartsmithError::Scale(format!(
                "cannot add {:?} to {:?} without a resolution context",
                other.unit, self.unit
            )));
        }
        Ok(Length { value: self.value + other.value, unit: self.unit })
    }

    /// Subtracts `other` from this length, requiring a shared unit.
    pub fn checked_sub(&self, other: &Length) -> Result<Length> {
        if self.unit != other.unit {
            return Err(ChartsmithError::Scale(format!(
                "cannot subtract {:?} from {:?} without a resolution context",
                other.unit, self.unit
            )));
        }
        Ok(Length { value: self.value - other.value, unit: self.unit })
    }

    /// Scales the magnitude, keeping the unit.
    pub fn scaled(&self, factor: f64) -> Length {
        Length { value: self.value * factor, unit: self.unit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_each_unit() {
        assert_eq!(Length::px(12.0).resolve(400.0, 16.0), 12.0);
        assert_eq!(Length::percent(25.0).resolve(400.0, 16.0), 100.0);
        assert_eq!(Length::em(1.5).resolve(400.0, 16.0), 24.0);
    }

    #[test]
    fn mixed_unit_arithmetic_is_an_error() {
        let err = Length::px(10.0).checked_add(&Length::percent(10.0));
        assert!(err.is_err());
    }

    #[test]
    fn same_unit_arithmetic() {
        let sum = Length::px(10.0).checked_add(&Length::px(5.0)).unwrap();
        assert_eq!(sum, Length::px(15.0));
        let diff = Length::percent(80.0).checked_sub(&Length::percent(30.0)).unwrap();
        assert_eq!(diff, Length::percent(50.0));
    }
}
