use std::path::Path;

use crate::error::{PlannerError, Result};
use crate::model::schedule::{parse_weekday, FixedSchedule, ScheduleSource};
use crate::model::TimeOfDay;

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs && semicolons > 0 {
        b';'
    } else if tabs >= commas && tabs > 0 {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Day,
    Title,
    Start,
    End,
    /// A single `start-end` cell.
    Period,
    Location,
}

fn header_to_column(normalized: &str) -> Option<Column> {
    match normalized {
        "day" | "weekday" | "dayofweek" | "星期" | "周几" => Some(Column::Day),
        "title" | "course" | "class" | "subject" | "name" | "event" | "课程" | "名称" => {
            Some(Column::Title)
        }
        "start" | "starttime" | "from" | "begin" | "开始" | "开始时间" => Some(Column::Start),
        "end" | "endtime" | "to" | "finish" | "结束" | "结束时间" => Some(Column::End),
        "time" | "period" | "slot" | "时间" => Some(Column::Period),
        "location" | "room" | "place" | "where" | "地点" | "教室" => Some(Column::Location),
        _ => None,
    }
}

fn split_period(cell: &str) -> Option<(&str, &str)> {
    cell.split_once(['-', '~', '–'])
}

/// Import a weekly timetable from a CSV file.
///
/// Returns `(schedules, skipped_count)` on success.
pub fn import_timetable(path: &Path) -> Result<(Vec<FixedSchedule>, usize)> {
    let content = std::fs::read_to_string(path)?;
    parse_timetable(&content)
}

/// Parse timetable CSV text.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches headers
/// flexibly. Requires day and title columns plus either start and end
/// or a combined time column.
pub fn parse_timetable(content: &str) -> Result<(Vec<FixedSchedule>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_column(&normalize_header(h)))
        .collect();

    let has = |c: Column| columns.contains(&Some(c));
    let has_times = (has(Column::Start) && has(Column::End)) || has(Column::Period);
    if !has(Column::Day) || !has(Column::Title) || !has_times {
        return Err(PlannerError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
            required: "day, title, start and end (or time)".into(),
        });
    }

    let mut schedules = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row, "skipping CSV row: {}", e);
                skipped += 1;
                continue;
            }
        };

        let mut day = None;
        let mut title = None;
        let mut start = None;
        let mut end = None;
        let mut location = None;
        for (field, column) in record.iter().zip(&columns) {
            match column {
                Some(Column::Day) => day = Some(field),
                Some(Column::Title) => title = Some(field),
                Some(Column::Start) => start = Some(field),
                Some(Column::End) => end = Some(field),
                Some(Column::Period) => {
                    if let Some((s, e)) = split_period(field) {
                        start = start.or(Some(s.trim()));
                        end = end.or(Some(e.trim()));
                    }
                }
                Some(Column::Location) => location = Some(field),
                None => {}
            }
        }

        let Some(weekday) = day.and_then(parse_weekday) else {
            tracing::warn!(row, day = day.unwrap_or(""), "skipping row: unknown weekday");
            skipped += 1;
            continue;
        };
        let times = start
            .zip(end)
            .and_then(|(s, e)| Some((s.parse::<TimeOfDay>().ok()?, e.parse::<TimeOfDay>().ok()?)));
        let Some((start, end)) = times else {
            tracing::warn!(row, "skipping row: invalid time range");
            skipped += 1;
            continue;
        };

        match FixedSchedule::new(title.unwrap_or(""), weekday, start, end) {
            Ok(schedule) => schedules.push(
                schedule
                    .with_location(location.unwrap_or(""))
                    .with_source(ScheduleSource::Imported),
            ),
            Err(e) => {
                tracing::warn!(row, "skipping row: {}", e);
                skipped += 1;
            }
        }
    }

    if schedules.is_empty() {
        return Err(PlannerError::EmptyImport(format!(
            "no valid timetable rows ({} skipped)",
            skipped
        )));
    }

    tracing::info!(imported = schedules.len(), skipped, "timetable imported");
    Ok((schedules, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn delimiter_detection() {
        assert_eq!(detect_delimiter("day;title;start;end"), b';');
        assert_eq!(detect_delimiter("day\ttitle\tstart"), b'\t');
        assert_eq!(detect_delimiter("day,title,start,end"), b',');
        assert_eq!(detect_delimiter("day"), b',');
    }

    #[test]
    fn imports_rows_and_counts_skipped() {
        let csv = "\
Weekday;Course;Start Time;End Time;Room
Mon;Linear Algebra;08:00;09:40;A-101
星期三;Physics;14:00;15:40;
Funday;Nothing;10:00;11:00;
Fri;Backwards;11:00;10:00;
Tue;Bad time;9am;10:00;
";
        let (schedules, skipped) = parse_timetable(csv).unwrap();
        assert_eq!(skipped, 3);
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].weekday, Weekday::Mon);
        assert_eq!(schedules[0].title, "Linear Algebra");
        assert_eq!(schedules[0].location.as_deref(), Some("A-101"));
        assert_eq!(schedules[0].source, ScheduleSource::Imported);
        assert_eq!(schedules[1].weekday, Weekday::Wed);
        assert_eq!(schedules[1].location, None);
    }

    #[test]
    fn combined_time_column() {
        let csv = "day,subject,time\n2,Chemistry,10:00-11:30\n7,Choir,9:00~9:45\n";
        let (schedules, skipped) = parse_timetable(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(schedules[0].weekday, Weekday::Tue);
        assert_eq!(schedules[0].span().duration_minutes, 90);
        assert_eq!(schedules[1].weekday, Weekday::Sun);
        assert_eq!(schedules[1].start.to_string(), "09:00");
    }

    #[test]
    fn missing_columns() {
        let err = parse_timetable("day,title\nMon,Math\n").unwrap_err();
        match err {
            PlannerError::MissingColumns { found, .. } => assert_eq!(found, ["day", "title"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_valid_rows() {
        assert!(matches!(
            parse_timetable("day,title,start,end\nxx,Math,08:00,09:00\n"),
            Err(PlannerError::EmptyImport(_))
        ));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable.csv");
        std::fs::write(&path, "day,title,start,end\nThu,Seminar,16:00,17:00\n").unwrap();
        let (schedules, _) = import_timetable(&path).unwrap();
        assert_eq!(schedules[0].title, "Seminar");
    }
}
