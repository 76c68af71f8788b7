use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlannerError;

pub const MINUTES_PER_DAY: i32 = 24 * 60;
/// Last addressable minute of a day (23:59).
pub const LAST_MINUTE: i32 = MINUTES_PER_DAY - 1;

/// A wall-clock time within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// Build from minutes since midnight, clamped to 00:00..=23:59.
    pub fn from_minutes_clamped(minutes: i32) -> Self {
        let m = minutes.clamp(0, LAST_MINUTE);
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> i32 {
        self.hour as i32 * 60 + self.minute as i32
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = PlannerError;

    /// Accepts `H:MM` or `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::InvalidTimeFormat(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A start offset and a length on the day timeline, both in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineSpan {
    pub start_minutes: i32,
    pub duration_minutes: i32,
}

impl TimelineSpan {
    /// Span between two times on the same day. `None` when `end` precedes `start`.
    pub fn between(start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        let duration = end.minutes_since_midnight() - start.minutes_since_midnight();
        (duration >= 0).then_some(Self {
            start_minutes: start.minutes_since_midnight(),
            duration_minutes: duration,
        })
    }

    pub fn end_minutes(&self) -> i32 {
        self.start_minutes + self.duration_minutes
    }

    pub fn start_time(&self) -> TimeOfDay {
        TimeOfDay::from_minutes_clamped(self.start_minutes)
    }

    pub fn end_time(&self) -> TimeOfDay {
        TimeOfDay::from_minutes_clamped(self.end_minutes())
    }

    /// Starts at or after midnight and ends no later than 23:59.
    pub fn fits_in_day(&self) -> bool {
        self.start_minutes >= 0 && self.duration_minutes >= 0 && self.end_minutes() <= LAST_MINUTE
    }

    /// Overlap of two half-open ranges, if any.
    pub fn overlap(&self, other: &TimelineSpan) -> Option<TimelineSpan> {
        let start = self.start_minutes.max(other.start_minutes);
        let end = self.end_minutes().min(other.end_minutes());
        (start < end).then_some(TimelineSpan {
            start_minutes: start,
            duration_minutes: end - start,
        })
    }
}

impl fmt::Display for TimelineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_time(), self.end_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_hours() {
        assert_eq!("09:05".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 5).unwrap());
        assert_eq!("9:05".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 5).unwrap());
        assert_eq!(" 23:59 ".parse::<TimeOfDay>().unwrap().to_string(), "23:59");
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "24:00", "12:60", "12", "12:5", "ab:cd", "1:2:3", "-1:00", "123:00"] {
            assert!(
                matches!(bad.parse::<TimeOfDay>(), Err(PlannerError::InvalidTimeFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn span_rejects_inverted_range() {
        let nine = TimeOfDay::new(9, 0).unwrap();
        let ten = TimeOfDay::new(10, 0).unwrap();
        assert!(TimelineSpan::between(ten, nine).is_none());
        let span = TimelineSpan::between(nine, ten).unwrap();
        assert_eq!(span.duration_minutes, 60);
        assert_eq!(span.to_string(), "09:00 - 10:00");
    }

    #[test]
    fn overlap_is_half_open() {
        let a = TimelineSpan { start_minutes: 60, duration_minutes: 60 };
        let b = TimelineSpan { start_minutes: 120, duration_minutes: 30 };
        assert!(a.overlap(&b).is_none());
        let c = TimelineSpan { start_minutes: 90, duration_minutes: 60 };
        assert_eq!(
            a.overlap(&c),
            Some(TimelineSpan { start_minutes: 90, duration_minutes: 30 })
        );
    }

    #[test]
    fn serializes_as_string() {
        let t = TimeOfDay::new(7, 30).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"07:30\"");
        let back: TimeOfDay = serde_json::from_str("\"07:30\"").unwrap();
        assert_eq!(back, t);
    }
}
