//! Named-entity tagging for location phrases.
//!
//! The location stage only needs `(token, tag)` pairs in the usual BIO
//! scheme, so any tagger can be plugged in: a statistical model, a place-name
//! list, or nothing at all.

use log::trace;
use strum_macros::EnumString;

use crate::normalize::strip_diacritics;

/// A BIO tag. Only the location tags mean anything to this crate; every
/// other label a tagger emits is kept verbatim in [`Tag::Other`].
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum Tag {
    #[strum(serialize = "B-LOC")]
    BeginLocation,
    #[strum(serialize = "I-LOC")]
    InsideLocation,
    #[strum(serialize = "O")]
    Outside,
    #[strum(default)]
    Other(String),
}

pub type TaggedToken = (String, Tag);

pub trait EntityTagger {
    /// Splits `text` into tokens and tags each one.
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

impl<T: EntityTagger + ?Sized> EntityTagger for &T {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        (**self).tag(text)
    }
}

impl<T: EntityTagger + ?Sized> EntityTagger for Box<T> {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        (**self).tag(text)
    }
}

/// Tags nothing. Location extraction then relies on prepositions alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTagger;

impl EntityTagger for NoopTagger {
    fn tag(&self, _text: &str) -> Vec<TaggedToken> {
        Vec::new()
    }
}

/// Rule-based tagger over a list of known place names.
///
/// Places are compared without diacritics or case, longest first. A matched
/// place comes out as one underscore-joined `B-LOC` token (`sài_gòn`), the
/// way word-segmenting Vietnamese taggers write multi-syllable words.
#[derive(Debug, Clone, Default)]
pub struct GazetteerTagger {
    /// Folded places, split into words, longest first.
    places: Vec<Vec<String>>,
}

impl GazetteerTagger {
    pub fn new(places: &[String]) -> Self {
        let mut places: Vec<Vec<String>> = places
            .iter()
            .map(|place| {
                strip_diacritics(place)
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|words| !words.is_empty())
            .collect();
        places.sort_by(|a, b| b.len().cmp(&a.len()));
        places.dedup();
        Self { places }
    }

    fn place_at(&self, folded: &[String]) -> Option<usize> {
        self.places
            .iter()
            .find(|place| {
                place.len() <= folded.len() && place.iter().zip(folded).all(|(p, w)| p == w)
            })
            .map(Vec::len)
    }
}

fn trim_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

impl EntityTagger for GazetteerTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(trim_punctuation)
            .filter(|t| !t.is_empty())
            .collect();
        let folded: Vec<String> = tokens.iter().map(|t| strip_diacritics(t)).collect();

        let mut tagged = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            match self.place_at(&folded[i..]) {
                Some(len) => {
                    let token = tokens[i..i + len].join("_");
                    trace!("gazetteer: {token:?}");
                    tagged.push((token, Tag::BeginLocation));
                    i += len;
                }
                None => {
                    tagged.push((tokens[i].to_string(), Tag::Outside));
                    i += 1;
                }
            }
        }
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(names: &[&str]) -> GazetteerTagger {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        GazetteerTagger::new(&names)
    }

    #[test]
    fn tags_parse_from_labels() {
        assert_eq!("B-LOC".parse::<Tag>().unwrap(), Tag::BeginLocation);
        assert_eq!("I-LOC".parse::<Tag>().unwrap(), Tag::InsideLocation);
        assert_eq!("O".parse::<Tag>().unwrap(), Tag::Outside);
        assert_eq!("B-PER".parse::<Tag>().unwrap(), Tag::Other("B-PER".into()));
    }

    #[test]
    fn gazetteer_prefers_longest_place() {
        let tagger = places(&["sài gòn", "đại học sài gòn"]);
        let tagged = tagger.tag("học ở Đại học Sài Gòn.");
        assert_eq!(
            tagged,
            vec![
                ("học".to_string(), Tag::Outside),
                ("ở".to_string(), Tag::Outside),
                ("Đại_học_Sài_Gòn".to_string(), Tag::BeginLocation),
            ]
        );
    }

    #[test]
    fn gazetteer_ignores_missing_diacritics() {
        let tagger = places(&["Hà Nội"]);
        let tagged = tagger.tag("bay ra ha noi");
        assert_eq!(tagged[2], ("ha_noi".to_string(), Tag::BeginLocation));
    }

    #[test]
    fn noop_tags_nothing() {
        assert!(NoopTagger.tag("đi Hà Nội").is_empty());
        let boxed: Box<dyn EntityTagger> = Box::new(NoopTagger);
        assert!(boxed.tag("đi Hà Nội").is_empty());
    }
}
