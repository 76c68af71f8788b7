use chrono::NaiveTime;

use crate::error::Result;
use crate::model::time::{TimeOfDay, LAST_MINUTE, MINUTES_PER_DAY};

/// Timeline scale: one pixel per minute, so each hour band is 60px tall at 100% zoom.
pub const PIXELS_PER_MINUTE: i32 = 1;

/// Pixel offset of `time` ("HH:MM") from the top of the timeline.
pub fn time_to_position(time: &str) -> Result<i32> {
    Ok(offset_of(time.parse()?))
}

/// Pixel offset of an already parsed time.
pub fn offset_of(time: TimeOfDay) -> i32 {
    time.minutes_since_midnight() * PIXELS_PER_MINUTE
}

/// Signed height in pixels from `start` to `end`.
pub fn height_between(start: TimeOfDay, end: TimeOfDay) -> i32 {
    offset_of(end) - offset_of(start)
}

/// Height in pixels of a block running from `start` to `end`.
///
/// Negative when `end` precedes `start`: the clock does not wrap past
/// midnight, so the caller has to flag such a block instead of drawing it.
pub fn duration_height(start: &str, end: &str) -> Result<i32> {
    Ok(height_between(start.parse()?, end.parse()?))
}

/// Time at a pixel offset, clamped to the visible day (00:00..=23:59).
pub fn position_to_time(pixels: i32) -> String {
    let minutes = (pixels / PIXELS_PER_MINUTE).clamp(0, LAST_MINUTE);
    TimeOfDay::from_minutes_clamped(minutes).to_string()
}

/// Offset of the "now" marker.
pub fn current_time_position(now: NaiveTime) -> i32 {
    offset_of(TimeOfDay::from(now))
}

/// On-screen mapping of the day timeline at the current zoom level.
#[derive(Debug, Clone)]
pub struct DayViewport {
    /// Screen pixels per timeline pixel.
    pub zoom: f32,
}

impl Default for DayViewport {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl DayViewport {
    const MIN_ZOOM: f32 = 0.5;
    const MAX_ZOOM: f32 = 4.0;

    pub fn new(zoom: f32) -> Self {
        Self {
            zoom: zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM),
        }
    }

    /// Screen pixels per minute.
    pub fn pixels_per_minute(&self) -> f32 {
        PIXELS_PER_MINUTE as f32 * self.zoom
    }

    /// Convert minutes since midnight to a y offset from the timeline top.
    pub fn minute_to_y(&self, minutes: i32) -> f32 {
        minutes as f32 * self.pixels_per_minute()
    }

    /// Total height in pixels of the 24-hour strip.
    pub fn total_height(&self) -> f32 {
        self.minute_to_y(MINUTES_PER_DAY)
    }

    /// Zoom in (taller hour bands).
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.25).min(Self::MAX_ZOOM);
    }

    /// Zoom out (shorter hour bands).
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.25).max(Self::MIN_ZOOM);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }
}

/// Labels for the 24 hour bands: "00:00" .. "23:00".
pub fn hour_labels() -> impl Iterator<Item = (i32, String)> {
    (0..24).map(|h| (h * 60, format!("{:02}:00", h)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    #[test]
    fn maps_times_to_minutes() {
        assert_eq!(time_to_position("00:00").unwrap(), 0);
        assert_eq!(time_to_position("09:30").unwrap(), 570);
        assert_eq!(time_to_position("23:59").unwrap(), 1439);
    }

    #[test]
    fn rejects_out_of_range_time() {
        assert!(matches!(
            time_to_position("25:00"),
            Err(PlannerError::InvalidTimeFormat(_))
        ));
        assert!(duration_height("09:00", "9h").is_err());
    }

    #[test]
    fn duration_height_may_be_negative() {
        assert_eq!(duration_height("09:00", "10:30").unwrap(), 90);
        assert_eq!(duration_height("10:00", "09:00").unwrap(), -60);
    }

    #[test]
    fn position_to_time_clamps() {
        assert_eq!(position_to_time(-10), "00:00");
        assert_eq!(position_to_time(2000), "23:59");
        assert_eq!(position_to_time(754), "12:34");
    }

    #[test]
    fn every_valid_time_round_trips() {
        for h in 0..24 {
            for m in 0..60 {
                let t = format!("{:02}:{:02}", h, m);
                assert_eq!(position_to_time(time_to_position(&t).unwrap()), t);
            }
        }
    }

    #[test]
    fn viewport_zoom_is_bounded() {
        let mut vp = DayViewport::default();
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, 4.0);
        for _ in 0..40 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, 0.5);
    }

    #[test]
    fn viewport_scales_minutes() {
        let vp = DayViewport::new(2.0);
        assert_eq!(vp.minute_to_y(90), 180.0);
        assert_eq!(vp.pixels_per_minute(), 2.0);
        assert_eq!(vp.total_height(), 2880.0);
    }

    #[test]
    fn parsed_time_helpers_match_string_forms() {
        let start: TimeOfDay = "09:30".parse().unwrap();
        let end: TimeOfDay = "08:15".parse().unwrap();
        assert_eq!(offset_of(start), time_to_position("09:30").unwrap());
        assert_eq!(height_between(start, end), duration_height("09:30", "08:15").unwrap());
        assert_eq!(height_between(end, start), 75);
    }

    #[test]
    fn now_marker_position() {
        let now = NaiveTime::from_hms_opt(14, 15, 42).unwrap();
        assert_eq!(current_time_position(now), 855);
    }
}
