//! Slugs and reading-time estimates.

use icu_normalizer::DecomposingNormalizerBorrowed;

/// Words per minute assumed for reading-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

/// Convert a title into a URL-safe slug.
///
/// Accented letters are decomposed (NFKD) and reduced to their ASCII base,
/// so `Café` becomes `cafe`; whatever is still non-ASCII is dropped along
/// with punctuation other than `-` and `_`. Letters are lowercased, runs of
/// whitespace or dashes collapse into a single `-`, and leading or trailing
/// `-` and `_` are trimmed.
#[must_use]
pub fn slugify(input: &str) -> String {
    let decomposed = DecomposingNormalizerBorrowed::new_nfkd().normalize(input);
    let mut slug = String::with_capacity(decomposed.len());
    let mut pending_dash = false;

    for ch in decomposed.chars().filter(char::is_ascii) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Append `-n` to a slug that collided with an existing row.
///
/// `attempt` 1 returns the base unchanged, 2 yields `base-2`, and so on.
#[must_use]
pub fn suffixed_slug(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

/// Estimated minutes to read `content`, never less than one.
#[must_use]
pub fn reading_time_minutes(content: &str) -> i64 {
    let words = content.split_whitespace().count();
    i64::try_from((words / WORDS_PER_MINUTE).max(1)).unwrap_or(i64::MAX)
}
