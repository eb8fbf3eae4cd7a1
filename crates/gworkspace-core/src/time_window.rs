//! Time-Window Helper
//!
//! Day and week boundaries for `today` and `week`, computed in a time zone
//! from a given "now" and rendered as RFC 3339 for the Calendar API.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

const GAP_STEP_MINUTES: i64 = 15;
const GAP_SEARCH_STEPS: usize = 4 * 24;

/// Boundary instants around a fixed "now"
#[derive(Debug, Clone)]
pub struct TimeWindow<Tz: TimeZone> {
    now: DateTime<Tz>,
}

impl TimeWindow<chrono::Local> {
    /// Window around the current instant in the process's local time zone.
    pub fn now() -> Self {
        Self::at(&chrono::Local::now())
    }
}

impl<Tz> TimeWindow<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn at(now: &DateTime<Tz>) -> Self {
        Self { now: now.clone() }
    }

    /// 00:00:00 of the current day
    pub fn start_of_day(&self) -> DateTime<Tz> {
        self.midnight(self.now.date_naive())
    }

    /// 23:59:59.999 of the current day
    pub fn end_of_day(&self) -> DateTime<Tz> {
        self.end_of(self.now.date_naive())
    }

    /// 23:59:59.999 of the upcoming Sunday; today when today is Sunday
    pub fn end_of_week(&self) -> DateTime<Tz> {
        let today = self.now.date_naive();
        let days_to_sunday = (7 - today.weekday().num_days_from_sunday()) % 7;
        self.end_of(today + Duration::days(i64::from(days_to_sunday)))
    }

    /// `[start of day, end of day]`
    pub fn today(&self) -> (String, String) {
        (self.start_of_day().to_rfc3339(), self.end_of_day().to_rfc3339())
    }

    /// `[start of day, end of week]`
    pub fn week(&self) -> (String, String) {
        (self.start_of_day().to_rfc3339(), self.end_of_week().to_rfc3339())
    }

    /// The instant itself, as a lower bound for upcoming-event queries
    pub fn instant(&self) -> String {
        self.now.to_rfc3339()
    }

    fn midnight(&self, date: NaiveDate) -> DateTime<Tz> {
        self.local_instant(date.and_time(chrono::NaiveTime::MIN))
    }

    fn end_of(&self, date: NaiveDate) -> DateTime<Tz> {
        self.midnight(date + Duration::days(1)) - Duration::milliseconds(1)
    }

    /// Resolve a wall-clock time. Inside a DST gap, the first valid time after it.
    fn local_instant(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        let tz = self.now.timezone();
        let mut candidate = naive;
        for _ in 0..=GAP_SEARCH_STEPS {
            match tz.from_local_datetime(&candidate) {
                LocalResult::Single(dt) => return dt,
                LocalResult::Ambiguous(earliest, _) => return earliest,
                LocalResult::None => candidate += Duration::minutes(GAP_STEP_MINUTES),
            }
        }
        tz.from_utc_datetime(&naive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(rfc3339: &str) -> TimeWindow<FixedOffset> {
        TimeWindow::at(&DateTime::parse_from_rfc3339(rfc3339).unwrap())
    }

    #[test]
    fn test_today_bounds() {
        let window = at("2026-10-14T15:42:10+02:00");
        let (start, end) = window.today();
        assert_eq!(start, "2026-10-14T00:00:00+02:00");
        assert_eq!(end, "2026-10-14T23:59:59.999+02:00");
    }

    #[test]
    fn test_wednesday_week_ends_on_following_sunday() {
        let window = at("2026-10-14T08:00:00-05:00");
        let (start, end) = window.week();
        assert_eq!(start, "2026-10-14T00:00:00-05:00");
        assert_eq!(end, "2026-10-18T23:59:59.999-05:00");
    }

    #[test]
    fn test_sunday_week_ends_same_day() {
        let window = at("2026-10-18T22:30:00+00:00");
        assert_eq!(window.end_of_week(), window.end_of_day());
        assert_eq!(window.week().1, "2026-10-18T23:59:59.999+00:00");
    }

    #[test]
    fn test_saturday_week_ends_next_day() {
        let window = at("2026-10-17T00:00:00+09:00");
        assert_eq!(window.week().1, "2026-10-18T23:59:59.999+09:00");
    }

    #[test]
    fn test_midnight_in_dst_gap_stays_on_the_same_day() {
        use chrono::Timelike;
        use chrono_tz::America::Santiago;

        // Chile springs forward at local midnight, so 2026-09-06 00:00 does not exist
        let now = Santiago.with_ymd_and_hms(2026, 9, 6, 12, 0, 0).unwrap();
        let window = TimeWindow::at(&now);

        let start = window.start_of_day();
        assert_eq!(start.date_naive(), now.date_naive());
        assert!(start <= now);
        assert_eq!(start.hour(), 1);

        let previous = TimeWindow::at(&Santiago.with_ymd_and_hms(2026, 9, 5, 12, 0, 0).unwrap());
        assert_eq!(previous.end_of_day() + Duration::milliseconds(1), start);
    }

    #[test]
    fn test_local_window_is_ordered() {
        let window = TimeWindow::now();
        assert!(window.start_of_day() <= window.end_of_day());
        assert!(window.end_of_day() <= window.end_of_week());
    }
}
