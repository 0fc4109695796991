//! Input sanitization applied to every string before it is persisted.
//!
//! Free text is stripped of HTML tags, entity-escaped and capped in length.
//! Phone numbers and email addresses get their own, narrower cleanup since
//! escaping would corrupt them.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a sanitized free-text field, in characters.
pub const MAX_TEXT_LEN: usize = 5000;

/// Maximum length of a sanitized phone number, in characters.
pub const MAX_PHONE_LEN: usize = 20;

/// Maximum length of a sanitized email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static PHONE_DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d+\s-]").expect("valid regex"));

/// Clean free text without escaping it.
///
/// Trims, removes anything that looks like a tag, drops NUL bytes and
/// truncates to [`MAX_TEXT_LEN`] characters. For text that is printed rather
/// than embedded in HTML, such as quotation PDFs.
pub fn clean_text(input: &str) -> String {
    let stripped = TAG_RE.replace_all(input.trim(), "");
    let cleaned: String = stripped.chars().filter(|&c| c != '\0').collect();
    truncate_chars(cleaned, MAX_TEXT_LEN)
}

/// Sanitize free text for storage.
///
/// [`clean_text`], then escapes `& < > " '`. The cap applies to the escaped
/// result.
pub fn sanitize_text(input: &str) -> String {
    let cleaned = clean_text(input);

    let mut out = String::with_capacity(cleaned.len());
    for ch in cleaned.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }

    truncate_chars(out, MAX_TEXT_LEN)
}

/// Reverse the entity escaping done by [`sanitize_text`].
///
/// Only the five entities it produces are decoded; anything else is left
/// as written. `&amp;` is decoded last so `&amp;lt;` comes back as `&lt;`.
pub fn unescape_text(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// [`unescape_text`] for optional fields.
pub fn unescape_optional_text(input: Option<&str>) -> Option<String> {
    input.map(unescape_text)
}

/// Sanitize a phone number: keep digits, `+`, whitespace and `-`.
pub fn sanitize_phone(input: &str) -> String {
    let kept = PHONE_DISALLOWED_RE.replace_all(input, "");
    truncate_chars(kept.into_owned(), MAX_PHONE_LEN)
}

/// Sanitize an email address: lowercase, trim, drop `<>'"`.
pub fn sanitize_email(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '\'' | '"'))
        .collect();
    truncate_chars(cleaned, MAX_EMAIL_LEN)
}

/// Sanitize an optional free-text field. Blank values collapse to `None`.
pub fn sanitize_optional_text(input: Option<&str>) -> Option<String> {
    non_empty(input.map(sanitize_text))
}

/// Sanitize an optional email field. Blank values collapse to `None`.
pub fn sanitize_optional_email(input: Option<&str>) -> Option<String> {
    non_empty(input.map(sanitize_email))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn truncate_chars(mut s: String, max: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
    s
}

/// Types whose string fields can be sanitized in one pass before storage.
pub trait Sanitize {
    /// Return a copy with every string field sanitized for its kind.
    fn sanitized(self) -> Self;
}

impl Sanitize for String {
    fn sanitized(self) -> Self {
        sanitize_text(&self)
    }
}

impl Sanitize for Option<String> {
    /// Blank values become `None`.
    fn sanitized(self) -> Self {
        sanitize_optional_text(self.as_deref())
    }
}

impl Sanitize for Vec<String> {
    /// Sanitizes each entry and drops entries that end up empty.
    fn sanitized(self) -> Self {
        self.into_iter()
            .map(|s| sanitize_text(&s))
            .filter(|s| !s.is_empty())
            .collect()
    }
}
