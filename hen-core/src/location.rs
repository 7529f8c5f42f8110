use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::{FoldedText, collapse_whitespace, cut};
use crate::patterns::CONNECTORS;
use crate::tagger::{EntityTagger, Tag};
use crate::time_span::TimeSpanLocator;

/// A location preposition right before a tagged phrase goes with it.
static LEADING_PREPOSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:ở|tại|tai)\s*$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationOutcome {
    pub location: Option<String>,
    pub residual: String,
}

/// Finds the location of an event.
///
/// The tagger is asked first; the first `B-LOC`/`I-LOC` run it reports is the
/// location. If it reports none, the phrase after `ở`/`tại` is taken instead,
/// up to `max_len` characters and never past a date/time fragment.
pub struct LocationExtractor<T> {
    tagger: T,
    spans: TimeSpanLocator,
    fallback: Regex,
}

impl<T: EntityTagger> LocationExtractor<T> {
    pub fn new(tagger: T, max_len: usize, spans: TimeSpanLocator) -> Result<Self, regex::Error> {
        let fallback = Regex::new(&format!(
            r"(?i)\b(?:ở|o|tại|tai)\s+([\w\s./-]{{1,{max_len}}})"
        ))?;
        Ok(Self {
            tagger,
            spans,
            fallback,
        })
    }

    pub fn extract(&self, text: &str) -> LocationOutcome {
        if let Some(outcome) = self.from_tagger(text) {
            return outcome;
        }
        if let Some(outcome) = self.from_preposition(text) {
            return outcome;
        }
        LocationOutcome {
            location: None,
            residual: collapse_whitespace(text),
        }
    }

    fn from_tagger(&self, text: &str) -> Option<LocationOutcome> {
        let mut phrase: Vec<String> = Vec::new();
        for (token, tag) in self.tagger.tag(text) {
            match tag {
                Tag::BeginLocation if phrase.is_empty() => phrase.push(token),
                Tag::InsideLocation if !phrase.is_empty() => phrase.push(token),
                _ if !phrase.is_empty() => break,
                _ => {}
            }
        }
        if phrase.is_empty() {
            return None;
        }

        let location = collapse_whitespace(&phrase.join(" ").replace('_', " "));
        debug!("location from tagger: {location:?}");

        // Tokenizers re-space punctuation, so the phrase may not be found
        // verbatim. It is still the location; the text just stays as it is.
        let words: Vec<String> = location.split(' ').map(regex::escape).collect();
        let residual = Regex::new(&format!(r"(?i){}", words.join(r"\s+")))
            .ok()
            .and_then(|re| re.find(text).map(|m| m.range()))
            .map(|mut range| {
                if let Some(m) = LEADING_PREPOSITION.find(&text[..range.start]) {
                    range.start = m.start();
                }
                cut(text, range)
            })
            .unwrap_or_else(|| collapse_whitespace(text));

        Some(LocationOutcome {
            location: Some(location),
            residual,
        })
    }

    fn from_preposition(&self, text: &str) -> Option<LocationOutcome> {
        self.fallback.captures_iter(text).find_map(|caps| {
            let whole = caps.get(0)?;
            let phrase = caps.get(1)?;
            let captured = phrase.as_str();

            let folded = FoldedText::new(captured);
            let time_at = self
                .spans
                .fragments(&folded)
                .first()
                .map(|(_, range)| folded.to_original(range.clone()).start);
            let connector_at = CONNECTORS.find(captured).map(|m| m.start());
            let end = [time_at, connector_at]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(captured.len());

            let location = captured[..end]
                .trim_end_matches(|c: char| c.is_whitespace() || ",.-".contains(c))
                .trim();
            if location.is_empty() {
                return None;
            }
            debug!("location from preposition: {location:?}");

            let removed = whole.start()..phrase.start() + end;
            Some(LocationOutcome {
                location: Some(collapse_whitespace(location)),
                residual: cut(text, removed),
            })
        })
    }
}
