use std::collections::HashMap;
use std::ops::Range;

use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::normalize::{FoldedText, collapse_whitespace, strip_diacritics};

/// Relative-day and period-of-day words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Keyword {
    Today,
    Tomorrow,
    DayAfterTomorrow,
    Yesterday,
    DayBeforeYesterday,
    Weekend,
    Morning,
    Noon,
    Afternoon,
    Evening,
    Night,
}

impl Keyword {
    /// Day offset from the reference date, for keywords that name a fixed day.
    pub fn day_offset(self) -> Option<i64> {
        match self {
            Keyword::Today => Some(0),
            Keyword::Tomorrow => Some(1),
            Keyword::DayAfterTomorrow => Some(2),
            Keyword::Yesterday => Some(-1),
            Keyword::DayBeforeYesterday => Some(-2),
            _ => None,
        }
    }

    pub fn is_day(self) -> bool {
        self.day_offset().is_some() || self == Keyword::Weekend
    }

    pub fn is_period(self) -> bool {
        !self.is_day()
    }
}

/// How strictly a written form has to carry its diacritics to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    /// Any spelling that folds to the form.
    Any,
    /// Bare ASCII, or exactly the form's own diacritics (`toi` or `tối`, not `tôi`).
    AsciiOrExact,
    /// Only the form's own diacritics (`mốt`, never `một` or `mot`).
    Exact,
}

#[derive(Debug, Clone)]
struct Form {
    keyword: Keyword,
    written: String,
    accent: Accent,
}

impl Form {
    fn accepts(&self, original: &str) -> bool {
        match self.accent {
            Accent::Any => true,
            Accent::AsciiOrExact => original.is_ascii() || self.is_written_as(original),
            Accent::Exact => self.is_written_as(original),
        }
    }

    fn is_written_as(&self, original: &str) -> bool {
        collapse_whitespace(&original.to_lowercase()) == self.written
    }
}

const DEFAULT_FORMS: &[(&str, Keyword, Accent)] = &[
    ("hôm nay", Keyword::Today, Accent::Any),
    ("bữa nay", Keyword::Today, Accent::Any),
    ("sáng nay", Keyword::Today, Accent::Any),
    ("trưa nay", Keyword::Today, Accent::Any),
    ("chiều nay", Keyword::Today, Accent::Any),
    ("tối nay", Keyword::Today, Accent::Any),
    ("đêm nay", Keyword::Today, Accent::Any),
    ("ngày mai", Keyword::Tomorrow, Accent::Any),
    ("mai", Keyword::Tomorrow, Accent::Any),
    ("ngày mốt", Keyword::DayAfterTomorrow, Accent::Any),
    ("mai mốt", Keyword::DayAfterTomorrow, Accent::Any),
    ("ngày kia", Keyword::DayAfterTomorrow, Accent::Any),
    ("mốt", Keyword::DayAfterTomorrow, Accent::Exact),
    ("hôm qua", Keyword::Yesterday, Accent::Any),
    ("hôm kia", Keyword::DayBeforeYesterday, Accent::Any),
    ("cuối tuần", Keyword::Weekend, Accent::Any),
    ("sáng", Keyword::Morning, Accent::AsciiOrExact),
    ("buổi sáng", Keyword::Morning, Accent::Any),
    ("trưa", Keyword::Noon, Accent::Any),
    ("buổi trưa", Keyword::Noon, Accent::Any),
    ("chiều", Keyword::Afternoon, Accent::Any),
    ("buổi chiều", Keyword::Afternoon, Accent::Any),
    ("tối", Keyword::Evening, Accent::AsciiOrExact),
    ("buổi tối", Keyword::Evening, Accent::Any),
    ("đêm", Keyword::Night, Accent::AsciiOrExact),
    ("ban đêm", Keyword::Night, Accent::Any),
];

/// Keyword registry: folded form → keyword.
///
/// Unlike a process-wide table, each [`Keywords`] value is owned by the
/// pipeline that built it, so two pipelines can carry different synonyms.
#[derive(Debug, Clone)]
pub struct Keywords {
    forms: HashMap<String, Form>,
}

impl Default for Keywords {
    fn default() -> Self {
        let forms = DEFAULT_FORMS
            .iter()
            .map(|&(written, keyword, accent)| {
                (
                    strip_diacritics(written),
                    Form {
                        keyword,
                        written: written.to_string(),
                        accent,
                    },
                )
            })
            .collect();
        Self { forms }
    }
}

impl Keywords {
    /// Extends the registry with user-defined **synonyms**.
    ///
    /// Each pair is `(alias, target)`. The target is either a keyword name
    /// (`"tomorrow"`, `"day-after-tomorrow"`) or a form already known to the
    /// registry (`"ngày mai"`). Unknown targets are ignored, and so are
    /// aliases that would re-target an existing form.
    ///
    /// ```
    /// # use hen_core::keywords::{Keyword, Keywords};
    /// let mut keywords = Keywords::default();
    /// keywords.extend(&[("bữa kia".into(), "day-before-yesterday".into())]);
    /// assert!(keywords.matches(Keyword::DayBeforeYesterday, "Bữa kia"));
    /// ```
    pub fn extend(&mut self, synonyms: &[(String, String)]) {
        for (alias, target) in synonyms {
            let key = fold_form(alias);
            if key.is_empty() || self.forms.contains_key(&key) {
                continue;
            }
            let keyword = target
                .trim()
                .to_ascii_lowercase()
                .parse::<Keyword>()
                .ok()
                .or_else(|| self.forms.get(&fold_form(target)).map(|f| f.keyword));
            if let Some(keyword) = keyword {
                let written = collapse_whitespace(&alias.to_lowercase());
                self.forms.insert(
                    key,
                    Form {
                        keyword,
                        written,
                        accent: Accent::Any,
                    },
                );
            }
        }
    }

    /// Returns `true` if `word` is a keyword name (eg "tomorrow").
    pub fn is_canonical(word: &str) -> bool {
        Keyword::iter().any(|key| key.as_ref() == word)
    }

    /// Returns the keyword `input` spells, honouring the form's accent rule.
    pub fn lookup(&self, input: &str) -> Option<Keyword> {
        self.forms
            .get(&fold_form(input))
            .filter(|form| form.accepts(input.trim()))
            .map(|form| form.keyword)
    }

    /// Returns `true` if `input` is one of the forms of `keyword`.
    pub fn matches(&self, keyword: Keyword, input: &str) -> bool {
        self.lookup(input) == Some(keyword)
    }

    /// Compiles the registry into search patterns.
    pub fn matcher(&self) -> Result<KeywordMatcher, regex::Error> {
        Ok(KeywordMatcher {
            days: self.pattern(Keyword::is_day)?,
            periods: self.pattern(Keyword::is_period)?,
            keywords: self.clone(),
        })
    }

    /// `\b(?:form|form|...)\b` over folded forms, longest first so that
    /// `ngay mai` wins over `mai`.
    fn pattern(&self, wanted: fn(Keyword) -> bool) -> Result<Regex, regex::Error> {
        let mut forms: Vec<&String> = self
            .forms
            .iter()
            .filter(|(_, form)| wanted(form.keyword))
            .map(|(key, _)| key)
            .collect();
        forms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = forms
            .iter()
            .map(|form| {
                form.split(' ')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b(?:{alternation})\b"))
    }
}

fn fold_form(input: &str) -> String {
    collapse_whitespace(&strip_diacritics(input))
}

/// A compiled [`Keywords`] registry.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Keywords,
    days: Regex,
    periods: Regex,
}

impl KeywordMatcher {
    /// Day keywords in `text`, as byte ranges of its folded copy.
    pub fn days(&self, text: &FoldedText) -> Vec<(Keyword, Range<usize>)> {
        self.find(&self.days, text)
    }

    /// Period-of-day keywords in `text`, as byte ranges of its folded copy.
    pub fn periods(&self, text: &FoldedText) -> Vec<(Keyword, Range<usize>)> {
        self.find(&self.periods, text)
    }

    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    fn find(&self, re: &Regex, text: &FoldedText) -> Vec<(Keyword, Range<usize>)> {
        re.find_iter(text.as_str())
            .filter_map(|m| {
                self.keywords
                    .lookup(text.original_slice(m.range()))
                    .map(|keyword| (keyword, m.range()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_forms() {
        let k = Keywords::default();
        assert!(k.matches(Keyword::Today, "hôm nay"));
        assert!(k.matches(Keyword::Today, "HOM NAY"));
        assert!(k.matches(Keyword::Tomorrow, "ngày  mai"));
        assert!(k.matches(Keyword::Weekend, "cuoi tuan"));
    }

    #[test]
    fn exact_forms_need_their_own_accents() {
        let k = Keywords::default();
        assert!(k.matches(Keyword::DayAfterTomorrow, "mốt"));
        assert_eq!(k.lookup("một"), None);
        assert_eq!(k.lookup("mot"), None);
    }

    #[test]
    fn ascii_or_exact_forms_reject_other_accents() {
        let k = Keywords::default();
        assert!(k.matches(Keyword::Evening, "tối"));
        assert!(k.matches(Keyword::Evening, "toi"));
        assert_eq!(k.lookup("tôi"), None);
        assert_eq!(k.lookup("tới"), None);
    }

    #[test]
    fn synonyms_extend() {
        let mut k = Keywords::default();
        k.extend(&[
            ("bữa kia".into(), "day-before-yesterday".into()),
            ("mai nha".into(), "ngày mai".into()),
        ]);
        assert!(k.matches(Keyword::DayBeforeYesterday, "bua kia"));
        assert!(k.matches(Keyword::Tomorrow, "Mai nha"));
    }

    #[test]
    fn synonyms_cannot_retarget_known_forms() {
        let mut k = Keywords::default();
        k.extend(&[
            ("mai".into(), "yesterday".into()),
            ("xyz".into(), "not-a-keyword".into()),
        ]);
        assert!(k.matches(Keyword::Tomorrow, "mai"));
        assert_eq!(k.lookup("xyz"), None);
    }

    #[test]
    fn canonical_names() {
        assert!(Keywords::is_canonical("tomorrow"));
        assert!(Keywords::is_canonical("day-after-tomorrow"));
        assert!(!Keywords::is_canonical("ngày mai"));
    }

    #[test]
    fn matcher_prefers_longest_form() {
        let m = Keywords::default().matcher().unwrap();
        let text = FoldedText::new("họp ngày mai");
        let found = m.days(&text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, Keyword::Tomorrow);
        assert_eq!(text.original_slice(found[0].1.clone()), "ngày mai");
    }

    #[test]
    fn matcher_skips_ambiguous_spellings() {
        let m = Keywords::default().matcher().unwrap();
        let text = FoldedText::new("họp một tiếng với tôi");
        assert!(m.days(&text).is_empty());
        assert!(m.periods(&text).is_empty());
    }

    #[test]
    fn matcher_finds_periods() {
        let m = Keywords::default().matcher().unwrap();
        let text = FoldedText::new("10h buổi sáng");
        let found = m.periods(&text);
        assert_eq!(found[0].0, Keyword::Morning);
        assert_eq!(text.original_slice(found[0].1.clone()), "buổi sáng");
    }
}
