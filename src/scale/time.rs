use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, Time, UtcOffset};

use crate::error::{ChartsmithError, Result};
use crate::scale::Tick;

/// A linear scale whose domain is temporal instants.
///
/// Positions are linear in unix seconds; ticks snap to human boundaries
/// (minute, hour, day, month, year) with the interval chosen from the
/// target count. All tick math happens in UTC.
#[derive(Debug, Clone)]
pub struct TimeScale {
    domain: (OffsetDateTime, OffsetDateTime),
    range: (f64, f64),
}

/// The tick stepping units, finest first.
#[derive(Debug, Clone, Copy)]
enum TickInterval {
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Months(u8),
    Years(i32),
}

impl TickInterval {
    fn approx_seconds(self) -> f64 {
        match self {
            TickInterval::Minutes(m) => m as f64 * 60.0,
            TickInterval::Hours(h) => h as f64 * 3600.0,
            TickInterval::Days(d) => d as f64 * 86_400.0,
            TickInterval::Months(m) => m as f64 * 30.0 * 86_400.0,
            TickInterval::Years(y) => y as f64 * 365.0 * 86_400.0,
        }
    }
}

impl TimeScale {
    pub fn new(domain: (OffsetDateTime, OffsetDateTime), range: (f64, f64)) -> Self {
        Self {
            domain: (domain.0.to_offset(UtcOffset::UTC), domain.1.to_offset(UtcOffset::UTC)),
            range,
        }
    }

    /// Builds a scale over the extent of `instants`.
    pub fn from_instants(instants: &[OffsetDateTime], range: (f64, f64)) -> Result<Self> {
        let first = instants
            .first()
            .ok_or_else(|| ChartsmithError::Scale("time scale needs at least one instant".into()))?;
        let mut lo = *first;
        let mut hi = *first;
        for &t in instants {
            if t < lo {
                lo = t;
            }
            if t > hi {
                hi = t;
            }
        }
        Ok(Self::new((lo, hi), range))
    }

    /// Maps an instant to a pixel coordinate. A zero-width domain maps
    /// everything to the range start.
    pub fn apply(&self, value: OffsetDateTime) -> f64 {
        self.apply_seconds(value.unix_timestamp() as f64)
    }

    /// Maps raw unix seconds, the form ticks carry their values in.
    pub fn apply_seconds(&self, secs: f64) -> f64 {
        let d0 = self.domain.0.unix_timestamp() as f64;
        let d1 = self.domain.1.unix_timestamp() as f64;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span.abs() < f64::EPSILON {
            return r0;
        }
        r0 + (secs - d0) / span * (r1 - r0)
    }

    /// Maps a pixel coordinate back to an instant.
    pub fn invert(&self, px: f64) -> OffsetDateTime {
        let d0 = self.domain.0.unix_timestamp() as f64;
        let d1 = self.domain.1.unix_timestamp() as f64;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.abs() < f64::EPSILON {
            return self.domain.0;
        }
        let secs = d0 + (px - r0) / span * (d1 - d0);
        OffsetDateTime::from_unix_timestamp(secs as i64).unwrap_or(self.domain.0)
    }

    pub fn domain(&self) -> (OffsetDateTime, OffsetDateTime) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Ticks snapped to the chosen human boundary, labeled per the interval.
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let span = (self.domain.1 - self.domain.0).whole_seconds().abs() as f64;
        if span < 1.0 {
            return vec![Tick {
                value: self.domain.0.unix_timestamp() as f64,
                label: format_instant(self.domain.0, TickInterval::Minutes(1)),
            }];
        }
        let interval = choose_interval(span, count.max(2));

        let mut cursor = floor_to(self.domain.0, interval);
        while cursor < self.domain.0 {
            cursor = advance(cursor, interval);
        }

        let mut ticks = Vec::new();
        let mut iterations = 0;
        while cursor <= self.domain.1 && iterations < 1000 {
            ticks.push(Tick {
                value: cursor.unix_timestamp() as f64,
                label: format_instant(cursor, interval),
            });
            cursor = advance(cursor, interval);
            iterations += 1;
        }
        ticks
    }
}

/// Finest interval whose tick count stays near the target.
fn choose_interval(span_seconds: f64, count: usize) -> TickInterval {
    const CANDIDATES: [TickInterval; 16] = [
        TickInterval::Minutes(1),
        TickInterval::Minutes(5),
        TickInterval::Minutes(15),
        TickInterval::Minutes(30),
        TickInterval::Hours(1),
        TickInterval::Hours(3),
        TickInterval::Hours(6),
        TickInterval::Hours(12),
        TickInterval::Days(1),
        TickInterval::Days(2),
        TickInterval::Days(7),
        TickInterval::Days(14),
        TickInterval::Months(1),
        TickInterval::Months(3),
        TickInterval::Months(6),
        TickInterval::Years(1),
    ];
    let limit = count as f64 * 1.5;
    for candidate in CANDIDATES {
        if span_seconds / candidate.approx_seconds() <= limit {
            return candidate;
        }
    }
    // Very wide domains step in multi-year units.
    let years = (span_seconds / (365.0 * 86_400.0) / count as f64).ceil() as i32;
    TickInterval::Years(years.max(1))
}

fn floor_to(t: OffsetDateTime, interval: TickInterval) -> OffsetDateTime {
    let date = t.date();
    match interval {
        TickInterval::Minutes(m) => {
            let minute = t.minute() - t.minute() % m as u8;
            t.replace_time(Time::from_hms(t.hour(), minute, 0).expect("valid hms"))
        }
        TickInterval::Hours(h) => {
            let hour = t.hour() - t.hour() % h as u8;
            t.replace_time(Time::from_hms(hour, 0, 0).expect("valid hms"))
        }
        TickInterval::Days(_) => t.replace_time(Time::MIDNIGHT),
        TickInterval::Months(m) => {
            let month0 = (date.month() as u8 - 1) - (date.month() as u8 - 1) % m;
            let month = Month::try_from(month0 + 1).expect("valid month");
            let date = Date::from_calendar_date(date.year(), month, 1).expect("valid date");
            t.replace_date(date).replace_time(Time::MIDNIGHT)
        }
        TickInterval::Years(y) => {
            let year = date.year() - date.year().rem_euclid(y);
            let date = Date::from_calendar_date(year, Month::January, 1).expect("valid date");
            t.replace_date(date).replace_time(Time::MIDNIGHT)
        }
    }
}

fn advance(t: OffsetDateTime, interval: TickInterval) -> OffsetDateTime {
    match interval {
        TickInterval::Minutes(m) => t + time::Duration::minutes(m),
        TickInterval::Hours(h) => t + time::Duration::hours(h),
        TickInterval::Days(d) => t + time::Duration::days(d),
        TickInterval::Months(m) => {
            let mut year = t.year();
            let mut month0 = t.month() as u8 - 1 + m;
            while month0 >= 12 {
                month0 -= 12;
                year += 1;
            }
            let month = Month::try_from(month0 + 1).expect("valid month");
            let date = Date::from_calendar_date(year, month, 1).expect("valid date");
            t.replace_date(date)
        }
        TickInterval::Years(y) => {
            let date = Date::from_calendar_date(t.year() + y, Month::January, 1)
                .expect("valid date");
            t.replace_date(date)
        }
    }
}

fn format_instant(t: OffsetDateTime, interval: TickInterval) -> String {
    let result = match interval {
        TickInterval::Minutes(_) | TickInterval::Hours(_) => {
            t.format(format_description!("[hour]:[minute]"))
        }
        TickInterval::Days(_) => t.format(format_description!("[year]-[month]-[day]")),
        TickInterval::Months(_) => t.format(format_description!("[year]-[month]")),
        TickInterval::Years(_) => t.format(format_description!("[year]")),
    };
    result.unwrap_or_else(|_| t.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn endpoints_map_to_range() {
        let s = TimeScale::new(
            (datetime!(2024-01-01 00:00 UTC), datetime!(2024-12-31 00:00 UTC)),
            (0.0, 730.0),
        );
        assert_eq!(s.apply(datetime!(2024-01-01 00:00 UTC)), 0.0);
        assert_eq!(s.apply(datetime!(2024-12-31 00:00 UTC)), 730.0);
    }

    #[test]
    fn day_span_ticks_at_hours() {
        let s = TimeScale::new(
            (datetime!(2024-06-10 00:00 UTC), datetime!(2024-06-10 23:59 UTC)),
            (0.0, 100.0),
        );
        let ticks = s.ticks(6);
        assert!(!ticks.is_empty());
        assert!(ticks[0].label.contains(':'));
    }

    #[test]
    fn year_span_ticks_at_month_starts() {
        let s = TimeScale::new(
            (datetime!(2024-01-15 00:00 UTC), datetime!(2024-11-20 00:00 UTC)),
            (0.0, 100.0),
        );
        let ticks = s.ticks(10);
        for t in &ticks {
            let instant = OffsetDateTime::from_unix_timestamp(t.value as i64).unwrap();
            assert_eq!(instant.day(), 1);
            assert_eq!(instant.hour(), 0);
        }
        // First tick is the first month boundary at or after the domain start.
        assert_eq!(ticks[0].label, "2024-02");
    }

    #[test]
    fn multi_year_span_labels_years() {
        let s = TimeScale::new(
            (datetime!(2015-03-01 00:00 UTC), datetime!(2024-03-01 00:00 UTC)),
            (0.0, 100.0),
        );
        let ticks = s.ticks(8);
        assert!(ticks.iter().all(|t| t.label.len() == 4));
    }

    #[test]
    fn invert_round_trips_to_the_second() {
        let s = TimeScale::new(
            (datetime!(2024-01-01 00:00 UTC), datetime!(2024-01-02 00:00 UTC)),
            (0.0, 864.0),
        );
        let t = datetime!(2024-01-01 12:00 UTC);
        assert_eq!(s.invert(s.apply(t)), t);
    }
}
