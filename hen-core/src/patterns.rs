//! Regex tables for date/time fragments.
//!
//! Every pattern here runs against folded text (see [`crate::normalize`]):
//! lowercase ASCII letters, so `giờ` is written `gio` and `tháng` is `thang`.
//! Keyword words (`mai`, `hôm nay`, ...) are not listed here; they come from
//! the [`crate::keywords::Keywords`] registry so that synonyms are found too.

use once_cell::sync::Lazy;
use regex::Regex;
use strum_macros::{AsRefStr, EnumIter};

/// Kinds of date/time fragment, in the order the span locator tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum PatternCategory {
    ClockTime,
    ExplicitDate,
    RelativeDay,
    DurationOffset,
    TimezoneHint,
}

impl PatternCategory {
    /// The static patterns of this category. Relative-day keywords are
    /// registry driven and not part of this list.
    pub fn patterns(self) -> Vec<&'static Regex> {
        match self {
            PatternCategory::ClockTime => vec![&*CLOCK_COLON, &*CLOCK_H, &*CLOCK_GIO],
            PatternCategory::ExplicitDate => vec![&*EXPLICIT_DATE, &*NUMERIC_DATE],
            PatternCategory::RelativeDay => vec![&*WEEKDAY],
            PatternCategory::DurationOffset => vec![&*DURATION_LEAD, &*DURATION_TRAIL],
            PatternCategory::TimezoneHint => vec![&*TIMEZONE, &*TIMEZONE_WORD],
        }
    }
}

const HOUR: &str = r"([01]?\d|2[0-3])";

/// `14:30`
pub static CLOCK_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b{HOUR}\s*:\s*([0-5]\d)\b")).unwrap());

/// `14h`, `9h30`, `9h30p`, `9h 30 phút`. A bare number after a space is not
/// minutes: `9h 15 người` is nine o'clock.
pub static CLOCK_H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b{HOUR}\s?h(?:([0-5]?\d)(?:\s?(?:phut|p))?|\s([0-5]?\d)\s?(?:phut|p))?\b"
    ))
    .unwrap()
});

/// `10 giờ`, `10 giờ 30 phút`, `10 giờ rưỡi`, `10 giờ kém 15`
pub static CLOCK_GIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b{HOUR}\s*gio(?:\s*(ruoi)|\s*kem\s*([0-5]?\d)(?:\s*phut)?|\s*([0-5]?\d)(?:\s*phut)?)?\b"
    ))
    .unwrap()
});

/// `ngày 20 tháng 11`, `ngày 20 tháng 11 năm 2026`
pub static EXPLICIT_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bngay\s+(\d{1,2})\s+thang\s+(\d{1,2})(?:\s+nam\s+(\d{4}))?\b").unwrap()
});

/// `20/11`, `ngày 20/11/2026`
pub static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:ngay\s+)?(\d{1,2})/(\d{1,2})(?:/(\d{4}))?\b").unwrap()
});

/// `thứ 2`, `thứ hai`, `chủ nhật`, `cn`, `t7`, each with an optional
/// `tuần sau` / `tuần tới`.
pub static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:thu\s*([2-7]|hai|ba|tu|nam|sau|bay)|(chu\s*nhat|cn)|t([2-7]))(?:\s+(tuan\s+(?:sau|toi)))?\b",
    )
    .unwrap()
});

const DURATION_UNIT: &str = r"(phut|p|gio|tieng|h|ngay|tuan|thang)";

/// `trong 2 giờ`, `sau 30 phút`
pub static DURATION_LEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:trong|sau)\s+(\d+)\s*{DURATION_UNIT}\b")).unwrap()
});

/// `3 ngày nữa`
pub static DURATION_TRAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b(\d+)\s*{DURATION_UNIT}\s+nua\b")).unwrap());

/// `UTC+7`, `GMT-03:30`, `múi giờ UTC+7`
pub static TIMEZONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:mui\s+gio\s+)?(?:utc|gmt)\s*([+-])\s*(\d{1,2})(?::?([0-5]\d))?\b").unwrap()
});

/// `múi giờ +7`, `múi giờ 7`
pub static TIMEZONE_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bmui\s+gio\s+([+-]?)\s*(\d{1,2})(?::([0-5]\d))?\b").unwrap()
});

const PERIOD_WORD: &str = r"(?:buoi\s+)?(?:sang|trua|chieu|toi|dem)";

/// Two clock times read as a range when only this sits between them. A
/// period word may follow the first clock or precede the second
/// (`8h sáng đến 5h chiều`).
pub static RANGE_JOINER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*(?:{PERIOD_WORD}\s*)?(?:den|toi|-|~|–)\s*(?:{PERIOD_WORD}\s*)?$"
    ))
    .unwrap()
});

/// Connector words that carry no time information. Unlike the rest of this
/// table it runs on unfolded text, so it spells both forms.
pub static CONNECTORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:vào|lúc|khoảng|vao|luc|khoang)\b").unwrap()
});
