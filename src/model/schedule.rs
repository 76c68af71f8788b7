use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::model::time::{TimeOfDay, TimelineSpan};

/// Where a fixed schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleSource {
    #[default]
    Manual,
    Imported,
}

/// A recurring weekly commitment such as a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedSchedule {
    pub id: Uuid,
    pub title: String,
    pub weekday: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub source: ScheduleSource,
}

impl FixedSchedule {
    /// Create a schedule; the title must be non-blank and `start < end`.
    pub fn new(
        title: impl Into<String>,
        weekday: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(PlannerError::InvalidSchedule("title is empty".into()));
        }
        if end <= start {
            return Err(PlannerError::InvalidSchedule(format!(
                "'{}' ends ({}) before it starts ({})",
                title, end, start
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            weekday,
            start,
            end,
            location: None,
            source: ScheduleSource::Manual,
        })
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into().trim().to_string();
        self.location = (!location.is_empty()).then_some(location);
        self
    }

    pub fn with_source(mut self, source: ScheduleSource) -> Self {
        self.source = source;
        self
    }

    pub fn span(&self) -> TimelineSpan {
        TimelineSpan::between(self.start, self.end).unwrap_or(TimelineSpan {
            start_minutes: self.start.minutes_since_midnight(),
            duration_minutes: 0,
        })
    }
}

/// Weekday spellings accepted by timetable import.
const WEEKDAY_ALIASES: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("周一", Weekday::Mon),
    ("星期一", Weekday::Mon),
    ("礼拜一", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("tues", Weekday::Tue),
    ("周二", Weekday::Tue),
    ("星期二", Weekday::Tue),
    ("礼拜二", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("周三", Weekday::Wed),
    ("星期三", Weekday::Wed),
    ("礼拜三", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("thur", Weekday::Thu),
    ("thurs", Weekday::Thu),
    ("周四", Weekday::Thu),
    ("星期四", Weekday::Thu),
    ("礼拜四", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("周五", Weekday::Fri),
    ("星期五", Weekday::Fri),
    ("礼拜五", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("周六", Weekday::Sat),
    ("星期六", Weekday::Sat),
    ("礼拜六", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("sun", Weekday::Sun),
    ("周日", Weekday::Sun),
    ("周天", Weekday::Sun),
    ("星期日", Weekday::Sun),
    ("星期天", Weekday::Sun),
    ("礼拜日", Weekday::Sun),
];

/// Parse a weekday name, or a number where 0 and 7 are Sunday and 1 is Monday.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let s = s.trim().to_lowercase();
    if let Ok(n) = s.parse::<u8>() {
        return match n {
            0 | 7 => Some(Weekday::Sun),
            1..=6 => WEEK.get(usize::from(n - 1)).copied(),
            _ => None,
        };
    }
    WEEKDAY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == s)
        .map(|(_, d)| *d)
}

/// English short name, Monday first.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_inverted_or_empty_schedule() {
        assert!(FixedSchedule::new("Math", Weekday::Mon, t("10:00"), t("09:00")).is_err());
        assert!(FixedSchedule::new("Math", Weekday::Mon, t("10:00"), t("10:00")).is_err());
        assert!(FixedSchedule::new("  ", Weekday::Mon, t("08:00"), t("09:00")).is_err());
        let ok = FixedSchedule::new(" Math ", Weekday::Mon, t("08:00"), t("09:40"))
            .unwrap()
            .with_location("  ");
        assert_eq!(ok.title, "Math");
        assert_eq!(ok.location, None);
        assert_eq!(ok.span().duration_minutes, 100);
    }

    #[test]
    fn weekday_spellings() {
        assert_eq!(parse_weekday("Mon"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("WEDNESDAY"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("星期天"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("周五"), Some(Weekday::Fri));
        assert_eq!(parse_weekday("0"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("1"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("6"), Some(Weekday::Sat));
        assert_eq!(parse_weekday("7"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("8"), None);
        assert_eq!(parse_weekday("someday"), None);
    }
}
