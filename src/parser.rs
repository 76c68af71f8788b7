//! Quick-add task parser.
//!
//! Turns one line such as `"write report 2h high [work]"` into a
//! [`ParsedTask`]. Three optional tokens are recognised anywhere in the line:
//!
//! * a duration, a number glued to an hour or minute unit (`2h`, `1.5h`,
//!   `30m`, `45min`, `2hours`, `3小时`, `20分钟`);
//! * a priority word from [`Priority::ALIASES`];
//! * a category in square brackets (`[study]`).
//!
//! Kinds are searched in the order category, duration, priority, and only the
//! first match of each is consumed. Each search sees the spans consumed
//! before it as blanks, so a token glued to another one (`2小时高`) is found
//! in one pass instead of surfacing when the content is parsed again.
//! Whatever is left becomes the task content. Parsing never fails: anything
//! not recognised stays in the content and the missing fields take their
//! defaults.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use crate::model::task::Priority;

/// Category used when the line carries no `[...]` token.
pub const DEFAULT_CATEGORY: &str = "Work";
/// Duration used when the line carries no duration token.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|[^A-Za-z0-9_.])((\d+(?:\.\d+)?)(hours?|hrs?|h|minutes?|mins?|m|小时|分钟))(?:[^A-Za-z]|$)",
    )
    .expect("duration pattern is valid")
});

static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<String> = Priority::ALIASES
        .iter()
        .map(|(alias, _)| regex::escape(alias))
        .collect();
    Regex::new(&format!(
        r"(?i)(?:^|[^\p{{L}}\p{{N}}_])({})(?:[^\p{{L}}\p{{N}}_]|$)",
        words.join("|")
    ))
    .expect("priority pattern is valid")
});

static CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("category pattern is valid"));

/// Structured result of parsing one quick-add line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTask {
    pub content: String,
    pub category: String,
    pub priority: Priority,
    pub estimated_duration_minutes: u32,
    /// Never filled by the text parser; kept so callers can attach one.
    pub deadline: Option<NaiveDateTime>,
}

impl Default for ParsedTask {
    fn default() -> Self {
        Self {
            content: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            priority: Priority::default(),
            estimated_duration_minutes: DEFAULT_DURATION_MINUTES,
            deadline: None,
        }
    }
}

/// Parse a free-text task line.
pub fn parse_task_text(raw: &str) -> ParsedTask {
    let mut parsed = ParsedTask::default();
    let mut consumed: Vec<Range<usize>> = Vec::with_capacity(3);

    if let Some(caps) = CATEGORY_RE.captures(raw) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            consumed.push(whole.range());
            let name = name.as_str().trim();
            if !name.is_empty() {
                parsed.category = name.to_string();
            }
        }
    }

    let masked = mask_ranges(raw, &consumed);
    if let Some(caps) = DURATION_RE.captures(&masked) {
        if let (Some(token), Some(value), Some(unit)) = (caps.get(1), caps.get(2), caps.get(3)) {
            consumed.push(token.range());
            match duration_minutes(value.as_str(), unit.as_str()) {
                Some(minutes) => parsed.estimated_duration_minutes = minutes,
                None => tracing::debug!(token = token.as_str(), "ignoring zero-length duration"),
            }
        }
    }

    let masked = mask_ranges(raw, &consumed);
    if let Some(word) = PRIORITY_RE.captures(&masked).and_then(|c| c.get(1)) {
        if let Some(priority) = Priority::from_alias(word.as_str()) {
            parsed.priority = priority;
            consumed.push(word.range());
        }
    }

    parsed.content = strip_ranges(raw, consumed);
    tracing::debug!(
        content = %parsed.content,
        category = %parsed.category,
        priority = parsed.priority.as_str(),
        minutes = parsed.estimated_duration_minutes,
        "parsed task text"
    );
    parsed
}

fn duration_minutes(value: &str, unit: &str) -> Option<u32> {
    let value: f64 = value.parse().ok()?;
    let unit = unit.to_lowercase();
    let minutes = if unit.starts_with('h') || unit == "小时" {
        value * 60.0
    } else {
        value
    };
    let minutes = minutes.round();
    (minutes >= 1.0 && minutes <= u32::MAX as f64).then_some(minutes as u32)
}

/// Copy of `text` with every byte inside `ranges` replaced by a space.
/// Byte offsets stay valid for `text`.
fn mask_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    let mut masked = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        if ranges.iter().any(|r| r.contains(&i)) {
            masked.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        } else {
            masked.push(ch);
        }
    }
    masked
}

/// Remove `ranges` from `text`, leaving a single space at each seam and
/// collapsing runs of whitespace.
fn strip_ranges(text: &str, mut ranges: Vec<Range<usize>>) -> String {
    ranges.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }

    let mut residual = String::with_capacity(text.len());
    let mut cursor = 0;
    for r in merged {
        residual.push_str(&text[cursor..r.start]);
        residual.push(' ');
        cursor = r.end;
    }
    residual.push_str(&text[cursor..]);

    residual.split_whitespace().collect::<Vec<_>>().join(" ")
}
