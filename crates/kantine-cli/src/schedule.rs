//! When a run should post to Slack.
//!
//! The job is started by an external timer several times a day; only the
//! run closest to the configured local post time posts.

use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use kantine_core::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostWindow {
    pub time: NaiveTime,
    pub tz: Tz,
    pub window_minutes: u32,
}

impl PostWindow {
    /// Build from `HH:MM`, an IANA zone name and a window size in minutes.
    pub fn parse(time: &str, tz: &str, window_minutes: u32) -> anyhow::Result<Self> {
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .with_context(|| format!("invalid post time {time:?}, expected HH:MM"))?;
        let tz: Tz = tz
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid time zone {tz:?}: {e}"))?;
        Ok(Self {
            time,
            tz,
            window_minutes,
        })
    }

    /// The serving day at `now` in the window's zone; `None` at weekends.
    pub fn weekday(&self, now: DateTime<Utc>) -> Option<Weekday> {
        Weekday::from_chrono(now.with_timezone(&self.tz).weekday())
    }

    /// ISO week number at `now` in the window's zone.
    pub fn iso_week(&self, now: DateTime<Utc>) -> u32 {
        now.with_timezone(&self.tz).iso_week().week()
    }

    /// True on weekdays when local `now` is strictly within the window around the post time.
    ///
    /// Compared by minute of day, so seconds are ignored.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.tz);
        if Weekday::from_chrono(local.weekday()).is_none() {
            return false;
        }
        let minutes = i64::from(local.hour() * 60 + local.minute());
        let target = i64::from(self.time.hour() * 60 + self.time.minute());
        (minutes - target).abs() < i64::from(self.window_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn oslo_ten() -> PostWindow {
        PostWindow::parse("10:00", "Europe/Oslo", 15).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn window_is_local_time() {
        let window = oslo_ten();
        // Tuesday 2026-03-03, Oslo is UTC+1.
        assert!(window.contains(utc(2026, 3, 3, 9, 0)));
        assert!(window.contains(utc(2026, 3, 3, 8, 46)));
        assert!(window.contains(utc(2026, 3, 3, 9, 14)));
        assert!(!window.contains(utc(2026, 3, 3, 10, 0)));
        // Summer time, UTC+2.
        assert!(window.contains(utc(2026, 6, 9, 8, 5)));
        assert!(!window.contains(utc(2026, 6, 9, 9, 5)));
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let window = oslo_ten();
        assert!(!window.contains(utc(2026, 3, 3, 9, 15)));
        assert!(!window.contains(utc(2026, 3, 3, 8, 45)));
    }

    #[test]
    fn never_at_weekends() {
        let window = oslo_ten();
        // Saturday 2026-03-07 and Sunday 2026-03-08 at 10:00 local.
        assert!(!window.contains(utc(2026, 3, 7, 9, 0)));
        assert!(!window.contains(utc(2026, 3, 8, 9, 0)));
        assert_eq!(window.weekday(utc(2026, 3, 7, 9, 0)), None);
    }

    #[test]
    fn weekday_follows_local_date() {
        let window = oslo_ten();
        // 23:30 UTC on Monday is already Tuesday in Oslo.
        assert_eq!(window.weekday(utc(2026, 3, 2, 23, 30)), Some(Weekday::Tirsdag));
        // Sunday 23:30 UTC is Monday 00:30 in Oslo.
        assert_eq!(window.weekday(utc(2026, 3, 8, 23, 30)), Some(Weekday::Mandag));
        assert_eq!(window.iso_week(utc(2026, 3, 8, 23, 30)), 11);
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(PostWindow::parse("25:00", "Europe/Oslo", 15).is_err());
        assert!(PostWindow::parse("10", "Europe/Oslo", 15).is_err());
        assert!(PostWindow::parse("10:00", "Mars/Olympus", 15).is_err());
    }
}
