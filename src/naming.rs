//! Slug synthesis and read-time estimation.
//!
//! ## Slugs
//!
//! Titles become URL-safe slugs by lower-casing, collapsing every run of
//! characters outside `[a-z0-9]` into a single dash, and trimming dashes
//! from both ends:
//! - `"Acme's Big Win!"` → `acme-s-big-win`
//! - `"  Injection -- Molding  "` → `injection-molding`
//! - `"Műanyag Fröccsöntés"` → `m-anyag-fr-ccs-nt-s` (non-ASCII letters are separators)
//!
//! ## Read time
//!
//! Both estimates assume 200 units per minute: words for slide text,
//! characters for article summaries.

const UNITS_PER_MINUTE: usize = 200;

/// Turn a title into a URL-safe slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `ceil(words / 200)`, at least one minute.
pub fn read_time_from_words(words: usize) -> u32 {
    let minutes = words.div_ceil(UNITS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// `max(3, ceil(chars / 200))`.
pub fn read_time_from_summary(summary: &str) -> u32 {
    let minutes = summary.chars().count().div_ceil(UNITS_PER_MINUTE).max(3);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slugify("Acme's Big Win!"), "acme-s-big-win");
    }

    #[test]
    fn slug_trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  Injection -- Molding  "), "injection-molding");
        assert_eq!(slugify("!!!Hello"), "hello");
    }

    #[test]
    fn slug_keeps_digits() {
        assert_eq!(slugify("ISO 9001 Audit 2024"), "iso-9001-audit-2024");
    }

    #[test]
    fn slug_treats_non_ascii_as_separator() {
        assert_eq!(slugify("Műanyag Fröccsöntés"), "m-anyag-fr-ccs-nt-s");
    }

    #[test]
    fn slug_of_symbols_only_is_empty() {
        assert_eq!(slugify("?!"), "");
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  one two\n three\t"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn read_time_from_words_rounds_up() {
        assert_eq!(read_time_from_words(0), 1);
        assert_eq!(read_time_from_words(200), 1);
        assert_eq!(read_time_from_words(201), 2);
    }

    #[test]
    fn read_time_from_summary_has_floor_of_three() {
        assert_eq!(read_time_from_summary("short"), 3);
        assert_eq!(read_time_from_summary(&"x".repeat(801)), 5);
    }
}
