//! "Remind me N minutes before" phrases.
//!
//! Reminder phrases are matched on the accented text rather than its folded
//! copy: `báo` (notify) and `bảo` (as in `bảo vệ`) fold to the same letters,
//! so every verb is spelled out with and without its diacritics instead.

use std::ops::Range;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::normalize::{FoldedText, collapse_whitespace};
use crate::patterns::{CLOCK_COLON, CLOCK_GIO, CLOCK_H};

const STRONG_VERB: &str = r"(?:nhắc\s*nhở|nhac\s*nho|nhắc|nhac|remind|notify)";
const WEAK_VERB: &str = r"(?:báo\s+thức|bao\s+thuc|báo|bao)";
const PRONOUN: &str = r"(?:tôi|toi|mình|minh|t)";
const MODIFIER: &str = r"(?:trước|truoc|trc|sớm\s+hơn|som\s+hon)";
const BEFORE: &str = r"(?:trước|truoc|trc)";

const MINUTE_UNIT: &str = r"(?:phút|phut|ph|p|minutes?|mins?)";
const HOUR_UNIT: &str = r"(?P<u>giờ|gio|tiếng|tieng|hours?|hrs?|h)";
const DAY_UNIT: &str = r"(?:ngày|ngay|days?)";

/// What a pattern's numbers mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minutes,
    Hours,
    Days,
    HoursAndMinutes,
}

impl Unit {
    fn source(self) -> String {
        match self {
            Unit::Minutes => format!(r"(?P<n>\d+)\s*{MINUTE_UNIT}"),
            Unit::Hours => format!(r"(?P<n>\d+)\s*{HOUR_UNIT}"),
            Unit::Days => format!(r"(?P<n>\d+)\s*{DAY_UNIT}"),
            Unit::HoursAndMinutes => {
                format!(r"(?P<n>\d+)\s*{HOUR_UNIT}\s*(?P<m>\d+)\s*{MINUTE_UNIT}")
            }
        }
    }

    fn minutes(self, caps: &Captures) -> Option<u32> {
        let n = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();
        match self {
            Unit::Minutes => n("n"),
            Unit::Hours => n("n")?.checked_mul(60),
            Unit::Days => n("n")?.checked_mul(24 * 60),
            Unit::HoursAndMinutes => n("n")?.checked_mul(60)?.checked_add(n("m")?),
        }
    }

    fn counts_hours(self) -> bool {
        matches!(self, Unit::Hours | Unit::HoursAndMinutes)
    }
}

/// How an hour unit without `trước` / `sớm hơn` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HourWord {
    /// `tiếng`, `hours`: always a length of time.
    Lead,
    /// `giờ`: a lead time next to another clock time (`9h nhắc 2 giờ`),
    /// otherwise the time to remind at.
    Either,
    /// `h`: always a clock time (`nhắc tôi 9h`).
    Clock,
}

impl HourWord {
    fn of(unit: &str) -> Self {
        match unit.to_lowercase().as_str() {
            "giờ" | "gio" => HourWord::Either,
            "h" => HourWord::Clock,
            _ => HourWord::Lead,
        }
    }
}

/// Whether `text` names a clock time outside `skip`.
fn has_clock_outside(text: &str, skip: Range<usize>) -> bool {
    let rest = format!("{} {}", &text[..skip.start], &text[skip.end..]);
    let folded = FoldedText::new(&rest);
    [&*CLOCK_COLON, &*CLOCK_H, &*CLOCK_GIO]
        .iter()
        .any(|re| re.is_match(folded.as_str()))
}

struct ReminderPattern {
    regex: Regex,
    unit: Unit,
}

impl ReminderPattern {
    /// verb [pronoun] [modifier] NUMBER unit [trước]
    fn verb_first(unit: Unit) -> Self {
        let verb = format!("(?:{STRONG_VERB}|{WEAK_VERB})");
        let number = unit.source();
        let source = format!(
            r"(?i)\b{verb}(?:\s+{PRONOUN}\b)?(?:\s+(?P<lead>{MODIFIER}))?\s+{number}\b(?:\s+(?P<tail>{BEFORE}))?"
        );
        Self::compile(&source, unit)
    }

    /// NUMBER unit [modifier] verb [pronoun]
    fn number_first(unit: Unit) -> Self {
        let verb = format!("(?:{STRONG_VERB}|(?P<weak>{WEAK_VERB}))");
        let number = unit.source();
        let source = format!(
            r"(?i)\b{number}(?:\s+(?P<lead>{MODIFIER}))?\s+{verb}\b(?:\s+(?P<pronoun>{PRONOUN})\b)?"
        );
        Self::compile(&source, unit)
    }

    fn compile(source: &str, unit: Unit) -> Self {
        // Sources are assembled from the constants above only.
        let regex = Regex::new(source).unwrap();
        Self { regex, unit }
    }

    /// `text` is what the pattern ran over.
    fn accepts(&self, caps: &Captures, text: &str) -> bool {
        let marked = caps.name("lead").is_some() || caps.name("tail").is_some();
        // `15 phút báo cáo` is a report, not a notification.
        if caps.name("weak").is_some() && !marked && caps.name("pronoun").is_none() {
            return false;
        }
        if marked || !self.unit.counts_hours() {
            return true;
        }
        match caps.name("u").map(|u| HourWord::of(u.as_str())) {
            Some(HourWord::Lead) => true,
            Some(HourWord::Either) => caps
                .get(0)
                .is_some_and(|m| has_clock_outside(text, m.range())),
            Some(HourWord::Clock) | None => false,
        }
    }
}

/// Tried in order; each one sees the text the previous ones left behind.
static PATTERNS: Lazy<Vec<ReminderPattern>> = Lazy::new(|| {
    vec![
        ReminderPattern::verb_first(Unit::HoursAndMinutes),
        ReminderPattern::number_first(Unit::HoursAndMinutes),
        ReminderPattern::verb_first(Unit::Days),
        ReminderPattern::verb_first(Unit::Hours),
        ReminderPattern::verb_first(Unit::Minutes),
        ReminderPattern::number_first(Unit::Days),
        ReminderPattern::number_first(Unit::Hours),
        ReminderPattern::number_first(Unit::Minutes),
    ]
});

/// A reminder phrase with no number: `nhắc tôi`, `báo trước`.
///
/// `báo` alone is far too common (`báo cáo`, a report) to strip on sight, so
/// the weak verbs only count with a pronoun or modifier attached.
static BARE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{STRONG_VERB}(?:\s+{PRONOUN}\b)?(?:\s+{MODIFIER})?\b|\b{WEAK_VERB}(?:\s+{PRONOUN}\b(?:\s+{MODIFIER})?|\s+{MODIFIER})\b"
    ))
    .unwrap()
});

/// One reminder phrase found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMatch {
    pub minutes: u32,
    pub matched_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderOutcome {
    /// Largest lead time across all matches, `0` when there was none.
    pub minutes: u32,
    pub residual: String,
    /// A reminder phrase was present, with or without a number.
    pub had_phrase: bool,
    pub matches: Vec<ReminderMatch>,
}

/// Finds and strips reminder phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReminderExtractor;

impl ReminderExtractor {
    /// Extracts the reminder lead time from `text` and returns the text with
    /// every reminder phrase blanked out.
    ///
    /// ```
    /// # use hen_core::reminder::ReminderExtractor;
    /// let out = ReminderExtractor.extract("Họp nhóm nhắc trước 2 giờ");
    /// assert_eq!(out.minutes, 120);
    /// assert_eq!(out.residual, "Họp nhóm");
    /// ```
    pub fn extract(&self, text: &str) -> ReminderOutcome {
        let mut working = text.to_string();
        let mut outcome = ReminderOutcome::default();

        for pattern in PATTERNS.iter() {
            let found: Vec<_> = pattern
                .regex
                .captures_iter(&working)
                .filter(|caps| pattern.accepts(caps, &working))
                .filter_map(|caps| {
                    let m = caps.get(0)?;
                    Some((m.range(), pattern.unit.minutes(&caps)?))
                })
                .collect();
            for (range, minutes) in found.into_iter().rev() {
                debug!("reminder: {:?} -> {} min", &working[range.clone()], minutes);
                outcome.matches.push(ReminderMatch {
                    minutes,
                    matched_text: working[range.clone()].to_string(),
                });
                outcome.minutes = outcome.minutes.max(minutes);
                outcome.had_phrase = true;
                working.replace_range(range, " ");
            }
        }

        // Leftover verbs without a number ("nhắc tôi nhé") go too, so a
        // second pass over the residual never finds anything.
        if BARE_PHRASE.is_match(&working) {
            outcome.had_phrase = true;
            working = BARE_PHRASE.replace_all(&working, " ").into_owned();
        }

        outcome.residual = collapse_whitespace(&working);
        outcome
    }
}
