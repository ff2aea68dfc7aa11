/// Digital clock: date and time strings sampled from the wall clock
use chrono::{DateTime, Local, TimeZone};

/// Date format, e.g. `07-03-2025`
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// 12-hour time format, e.g. `09:41:05 PM`
pub const TIME_FORMAT: &str = "%I:%M:%S %p";

/// One formatted reading of the clock
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClockSample {
    pub date: String,
    pub time: String,
}

impl ClockSample {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
        }
    }
}

/// Publishes a fresh `ClockSample` on every tick.
///
/// Each tick reads the wall clock again instead of counting seconds, so
/// missed or late ticks never accumulate drift.
#[derive(Debug, Default)]
pub struct ClockTicker {
    latest: ClockSample,
}

impl ClockTicker {
    /// Ticker already showing the current time
    pub fn new() -> Self {
        let mut ticker = Self::default();
        ticker.tick();
        ticker
    }

    /// Sample the local wall clock
    pub fn tick(&mut self) -> &ClockSample {
        self.tick_at(&Local::now())
    }

    /// Sample a given instant
    pub fn tick_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> &ClockSample
    where
        Tz::Offset: std::fmt::Display,
    {
        self.latest = ClockSample::at(now);
        tracing::trace!("clock tick {} {}", self.latest.date, self.latest.time);
        &self.latest
    }

    pub fn latest(&self) -> &ClockSample {
        &self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDateTime, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    fn is_date(s: &str) -> bool {
        let b = s.as_bytes();
        b.len() == 10
            && b[2] == b'-'
            && b[5] == b'-'
            && b.iter()
                .enumerate()
                .all(|(i, c)| i == 2 || i == 5 || c.is_ascii_digit())
    }

    fn is_time(s: &str) -> bool {
        let (clock, meridiem) = s.split_at(8);
        let b = clock.as_bytes();
        (meridiem == " AM" || meridiem == " PM")
            && b[2] == b':'
            && b[5] == b':'
            && b.iter()
                .enumerate()
                .all(|(i, c)| i == 2 || i == 5 || c.is_ascii_digit())
    }

    #[test]
    fn test_afternoon_format() {
        let sample = ClockSample::at(&utc("2025-03-07 21:41:05"));
        assert_eq!(sample.date, "07-03-2025");
        assert_eq!(sample.time, "09:41:05 PM");
    }

    #[test]
    fn test_midnight_is_twelve_am() {
        let sample = ClockSample::at(&utc("2024-12-31 00:00:09"));
        assert_eq!(sample.date, "31-12-2024");
        assert_eq!(sample.time, "12:00:09 AM");
    }

    #[test]
    fn test_offset_is_applied() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = utc("2025-01-01 23:30:00").with_timezone(&plus_two);
        let sample = ClockSample::at(&now);
        assert_eq!(sample.date, "02-01-2025");
        assert_eq!(sample.time, "01:30:00 AM");
    }

    #[test]
    fn test_different_instants_give_different_samples() {
        let mut ticker = ClockTicker::default();
        let first = ticker.tick_at(&utc("2025-06-01 10:00:00")).clone();
        let second = ticker.tick_at(&utc("2025-06-01 10:00:01")).clone();

        assert_ne!(first, second);
        for sample in [&first, &second] {
            assert!(is_date(&sample.date), "bad date {}", sample.date);
            assert!(is_time(&sample.time), "bad time {}", sample.time);
        }
    }

    #[test]
    fn test_new_ticker_is_populated() {
        let ticker = ClockTicker::new();
        assert!(is_date(&ticker.latest().date));
        assert!(is_time(&ticker.latest().time));
    }
}
