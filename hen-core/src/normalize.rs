//! Diacritic folding and small text helpers.
//!
//! Every extractor matches against a *folded* copy of its input: lowercase,
//! `đ` mapped to `d`, and combining marks dropped, so `CHIỀU`, `chiều` and
//! `chieu` all read as `chieu`. Folding is done one character at a time, so a
//! folded copy has exactly as many characters as its source and any match
//! range can be mapped back to the original text with [`FoldedText`].

use std::ops::Range;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Folds one character to its lowercase base letter.
///
/// Characters without a base letter (a stray combining mark, say) are kept
/// as they are, so the one-to-one character mapping always holds.
pub fn fold_char(c: char) -> char {
    let c = match c {
        'đ' | 'Đ' => 'd',
        c => c,
    };
    let mut base = None;
    decompose_canonical(c, |d| {
        if base.is_none() && !is_combining_mark(d) {
            base = Some(d);
        }
    });
    let base = base.unwrap_or(c);
    base.to_lowercase().next().unwrap_or(base)
}

/// Composes `text` to NFC. Input written with decomposed accents would
/// otherwise fold into a different number of characters than it started with.
pub fn compose(text: &str) -> String {
    text.nfc().collect()
}

/// Returns the folded form of `text` (NFC first, then [`fold_char`]).
///
/// ```
/// # use hen_core::normalize::strip_diacritics;
/// assert_eq!(strip_diacritics("Chiều MAI đi Đà Lạt"), "chieu mai di da lat");
/// ```
pub fn strip_diacritics(text: &str) -> String {
    text.nfc().map(fold_char).collect()
}

/// Collapses every whitespace run to one space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Deletes `range` from `text`, leaving one space in its place, and collapses
/// the whitespace of the result.
pub fn cut(text: &str, range: Range<usize>) -> String {
    collapse_whitespace(&format!("{} {}", &text[..range.start], &text[range.end..]))
}

/// Grows `range` by up to `pad` characters on each side, clamped to `text`.
pub fn widen(text: &str, range: Range<usize>, pad: usize) -> Range<usize> {
    let start = text[..range.start]
        .char_indices()
        .rev()
        .take(pad)
        .last()
        .map_or(range.start, |(i, _)| i);
    let end = text[range.end..]
        .char_indices()
        .nth(pad)
        .map_or(text.len(), |(i, _)| range.end + i);
    start..end
}

/// A folded copy of a string that remembers where each of its characters
/// came from. The source is expected to be NFC already (see [`compose`]).
#[derive(Debug, Clone)]
pub struct FoldedText<'a> {
    original: &'a str,
    folded: String,
    /// `(folded byte offset, original byte offset)` at every character
    /// boundary, including the end of the string.
    boundaries: Vec<(usize, usize)>,
}

impl<'a> FoldedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut boundaries = Vec::with_capacity(original.len() + 1);
        for (i, c) in original.char_indices() {
            boundaries.push((folded.len(), i));
            folded.push(fold_char(c));
        }
        boundaries.push((folded.len(), original.len()));
        Self {
            original,
            folded,
            boundaries,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    /// Maps a byte range of the folded copy onto the source string.
    pub fn to_original(&self, range: Range<usize>) -> Range<usize> {
        self.original_offset(range.start)..self.original_offset(range.end)
    }

    /// The source text behind a byte range of the folded copy.
    pub fn original_slice(&self, range: Range<usize>) -> &'a str {
        &self.original[self.to_original(range)]
    }

    fn original_offset(&self, folded: usize) -> usize {
        let i = match self.boundaries.binary_search_by_key(&folded, |&(f, _)| f) {
            Ok(i) => i,
            // Regex matches always land on character boundaries; snap to the
            // next boundary if a caller passes anything else.
            Err(i) => i.min(self.boundaries.len() - 1),
        };
        self.boundaries[i].1
    }
}
