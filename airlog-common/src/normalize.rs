//! Title/artist normalization helpers
//!
//! Submissions arrive from playout software and from DJs typing into a web
//! form, so free-text fields get a light scrub before persistence.

/// Leading articles removed from the display artist, checked in this order;
/// first match wins
const ARTICLES: [&str; 3] = ["The ", "A ", "An "];

/// Separator before featured-artist credits
const FEAT_SEPARATOR: &str = " feat. ";

/// Strip HTML-like `<...>` tags from a free-text field.
///
/// An unterminated `<` swallows the rest of the string, which matches how
/// browsers treat a dangling tag and keeps markup from ever reaching the
/// public log.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Derive the display-friendly artist name.
///
/// Removes exactly one leading article ("The ", "A ", "An "; case-sensitive).
/// When `strip_featured` is set, also truncates at the first " feat. "
/// separator.
pub fn truncate_artist(artist: &str, strip_featured: bool) -> String {
    let mut name = artist;
    for article in ARTICLES {
        if let Some(rest) = name.strip_prefix(article) {
            name = rest;
            break;
        }
    }

    if strip_featured {
        if let Some(idx) = name.find(FEAT_SEPARATOR) {
            name = &name[..idx];
        }
    }

    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_the() {
        assert_eq!(truncate_artist("The Beatles", false), "Beatles");
    }

    #[test]
    fn test_article_a() {
        assert_eq!(truncate_artist("A Tribe Called Quest", false), "Tribe Called Quest");
    }

    #[test]
    fn test_article_an() {
        assert_eq!(truncate_artist("An Artist", false), "Artist");
    }

    #[test]
    fn test_no_false_match_without_space() {
        // "Anvil" starts with "An" but not "An " -- must not be truncated
        assert_eq!(truncate_artist("Anvil", false), "Anvil");
        assert_eq!(truncate_artist("Them", false), "Them");
        assert_eq!(truncate_artist("Africa", false), "Africa");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(truncate_artist("the lowercase band", false), "the lowercase band");
    }

    #[test]
    fn test_only_one_article_removed() {
        assert_eq!(truncate_artist("The A Team", false), "A Team");
    }

    #[test]
    fn test_featured_kept_by_default() {
        assert_eq!(
            truncate_artist("The Headliner feat. Guest", false),
            "Headliner feat. Guest"
        );
    }

    #[test]
    fn test_featured_stripped_when_enabled() {
        assert_eq!(truncate_artist("The Headliner feat. Guest", true), "Headliner");
    }

    #[test]
    fn test_strip_tags_basic() {
        assert_eq!(strip_tags("Test <b>Song</b>"), "Test Song");
    }

    #[test]
    fn test_strip_tags_no_markup() {
        assert_eq!(strip_tags("Plain Title"), "Plain Title");
    }

    #[test]
    fn test_strip_tags_unterminated() {
        assert_eq!(strip_tags("Broken <i>oops"), "Broken oops");
        assert_eq!(strip_tags("Dangling < rest"), "Dangling ");
    }

    #[test]
    fn test_strip_tags_angle_close_without_open() {
        assert_eq!(strip_tags("a > b"), "a > b");
    }
}
