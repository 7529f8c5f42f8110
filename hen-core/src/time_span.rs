//! Locating the date/time part of a sentence.
//!
//! Every [`PatternCategory`] is searched over the folded text independently,
//! then the fragments are merged into one span by a [`SpanMergePolicy`].
//! Period-of-day words right after the span (`10h sáng`) and a leading `từ`
//! are pulled into it, so they don't end up in the event name. A period word
//! right before the span only joins it when the span opens on a day
//! (`chiều mai`); before a clock time it usually names the event
//! (`ăn tối 7h`) and stays out, though the resolver still sees it through
//! the pad.

use std::ops::Range;

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::keywords::KeywordMatcher;
use crate::normalize::{FoldedText, collapse_whitespace, cut, widen};
use crate::patterns::{CONNECTORS, PatternCategory};

static RANGE_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\btừ\s*$").unwrap());

/// How the fragments found in one sentence become a single span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanMergePolicy {
    /// From the first fragment's start to the last fragment's end. Words
    /// sitting between two fragments are swept in with them.
    #[default]
    Enclosing,
    /// Fragments at most `max_gap` characters apart form a group; the group
    /// with the most fragments wins (the earliest, on a tie).
    Adjacent { max_gap: usize },
}

impl SpanMergePolicy {
    /// Merges fragment `ranges` (byte ranges into `text`, sorted by start).
    pub fn merge(&self, text: &str, ranges: &[Range<usize>]) -> Option<Range<usize>> {
        let first = ranges.first()?.clone();
        match *self {
            SpanMergePolicy::Enclosing => {
                let end = ranges.iter().map(|r| r.end).max().unwrap_or(first.end);
                Some(first.start..end)
            }
            SpanMergePolicy::Adjacent { max_gap } => {
                let mut best = (first.clone(), 1usize);
                let mut current = (first, 1usize);
                for r in &ranges[1..] {
                    let gap = if r.start > current.0.end {
                        text[current.0.end..r.start].chars().count()
                    } else {
                        0
                    };
                    if gap <= max_gap {
                        current.0.end = current.0.end.max(r.end);
                        current.1 += 1;
                    } else {
                        current = (r.clone(), 1);
                    }
                    if current.1 > best.1 {
                        best = current.clone();
                    }
                }
                Some(best.0)
            }
        }
    }
}

/// A byte range of the text handed to the locator, with the text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanLocation {
    pub span: Option<TextSpan>,
    /// The span grown by the pad, with connector words removed. This is
    /// what the time resolver reads.
    pub span_text: Option<String>,
    /// Text before the span.
    pub prefix: String,
    /// Text after the span.
    pub suffix: String,
    /// The input with the span removed.
    pub residual: String,
}

impl SpanLocation {
    fn unmatched(text: &str) -> Self {
        Self {
            span: None,
            span_text: None,
            prefix: String::new(),
            suffix: String::new(),
            residual: collapse_whitespace(text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeSpanLocator {
    keywords: KeywordMatcher,
    pad: usize,
    policy: SpanMergePolicy,
}

impl TimeSpanLocator {
    pub fn new(keywords: KeywordMatcher, pad: usize, policy: SpanMergePolicy) -> Self {
        Self {
            keywords,
            pad,
            policy,
        }
    }

    /// Every date/time fragment in `text`, as byte ranges of its folded
    /// copy, sorted by position.
    pub fn fragments(&self, text: &FoldedText) -> Vec<(PatternCategory, Range<usize>)> {
        let mut found = Vec::new();
        for category in PatternCategory::iter() {
            if category == PatternCategory::RelativeDay {
                found.extend(
                    self.keywords
                        .days(text)
                        .into_iter()
                        .map(|(_, range)| (category, range)),
                );
            }
            for re in category.patterns() {
                found.extend(re.find_iter(text.as_str()).map(|m| (category, m.range())));
            }
        }
        found.sort_by_key(|(_, r)| (r.start, r.end));
        found
    }

    /// Finds the time span of `text` and cuts it out.
    ///
    /// ```
    /// # use hen_core::keywords::Keywords;
    /// # use hen_core::time_span::{SpanMergePolicy, TimeSpanLocator};
    /// let locator = TimeSpanLocator::new(
    ///     Keywords::default().matcher().unwrap(),
    ///     5,
    ///     SpanMergePolicy::Enclosing,
    /// );
    /// let found = locator.locate("Họp nhóm 10h sáng mai");
    /// assert_eq!(found.span.unwrap().text, "10h sáng mai");
    /// assert_eq!(found.residual, "Họp nhóm");
    /// ```
    pub fn locate(&self, text: &str) -> SpanLocation {
        let folded = FoldedText::new(text);
        let fragments: Vec<(PatternCategory, Range<usize>)> = self
            .fragments(&folded)
            .into_iter()
            .map(|(category, range)| {
                let range = folded.to_original(range);
                trace!("time fragment {}: {:?}", category.as_ref(), &text[range.clone()]);
                (category, range)
            })
            .collect();
        let ranges: Vec<Range<usize>> = fragments.iter().map(|(_, r)| r.clone()).collect();

        let Some(merged) = self.policy.merge(text, &ranges) else {
            return SpanLocation::unmatched(text);
        };
        let opens_on_clock = fragments
            .iter()
            .any(|(c, r)| *c == PatternCategory::ClockTime && r.start == merged.start);
        let merged = self.absorb_qualifiers(&folded, merged, !opens_on_clock);

        let padded = widen(text, merged.clone(), self.pad);
        let span_text = collapse_whitespace(&CONNECTORS.replace_all(&text[padded], " "));
        debug!("time span {:?}, resolver text {:?}", &text[merged.clone()], span_text);

        SpanLocation {
            span: Some(TextSpan {
                start: merged.start,
                end: merged.end,
                text: text[merged.clone()].to_string(),
            }),
            span_text: Some(span_text),
            prefix: text[..merged.start].trim().to_string(),
            suffix: text[merged.end..].trim().to_string(),
            residual: cut(text, merged),
        }
    }

    fn absorb_qualifiers(
        &self,
        folded: &FoldedText,
        mut span: Range<usize>,
        take_leading: bool,
    ) -> Range<usize> {
        let text = folded.original();
        let periods: Vec<Range<usize>> = self
            .keywords
            .periods(folded)
            .into_iter()
            .map(|(_, range)| folded.to_original(range))
            .collect();

        loop {
            let before = span.clone();
            for p in &periods {
                if take_leading && p.end <= span.start && text[p.end..span.start].trim().is_empty()
                {
                    span.start = p.start;
                } else if p.start >= span.end && text[span.end..p.start].trim().is_empty() {
                    span.end = p.end;
                }
            }
            if let Some(m) = RANGE_OPENER.find(&text[..span.start]) {
                span.start = m.start();
            }
            if span == before {
                return span;
            }
        }
    }
}
