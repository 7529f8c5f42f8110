use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::collapse_whitespace;

static FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:nhắc\s+tôi|nhac\s+toi|nhắc|nhac|vào|vao|lúc|luc|khoảng|khoang|tại|ở)\b",
    )
    .unwrap()
});

/// Strips filler words, whitespace runs and edge punctuation.
fn clean(text: &str) -> String {
    let text = collapse_whitespace(&FILLER.replace_all(text, " "));
    text.trim_matches(|c: char| c.is_whitespace() || ",.-".contains(c))
        .to_string()
}

/// Picks the event name out of what the other stages left behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventNameResolver;

impl EventNameResolver {
    /// `residual` is the text with reminder, location and time span removed.
    /// When nothing is left of it and a time span was found (`matched`), the
    /// text before the span is tried, then the text after it.
    ///
    /// ```
    /// # use hen_core::event_name::EventNameResolver;
    /// let name = EventNameResolver.resolve("Họp nhóm lúc", Some("10h"), "", "Họp nhóm lúc");
    /// assert_eq!(name.as_deref(), Some("Họp nhóm"));
    /// ```
    pub fn resolve(
        &self,
        prefix: &str,
        matched: Option<&str>,
        suffix: &str,
        residual: &str,
    ) -> Option<String> {
        let name = clean(residual);
        if !name.is_empty() {
            return Some(name);
        }
        matched?;
        [prefix, suffix]
            .into_iter()
            .map(clean)
            .find(|name| !name.is_empty())
    }
}
