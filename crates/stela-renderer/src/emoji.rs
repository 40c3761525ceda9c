//! `:shortcode:` emoji substitution.
//!
//! Substitution applies to text events only, never inside code spans or
//! code blocks. Unknown shortcodes pass through verbatim.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Shortcode table. Kept small and fixed; substitution must be
/// deterministic across builds.
const EMOJI: &[(&str, &str)] = &[
    ("+1", "\u{1f44d}"),
    ("-1", "\u{1f44e}"),
    ("arrow_right", "\u{27a1}\u{fe0f}"),
    ("book", "\u{1f4d6}"),
    ("boom", "\u{1f4a5}"),
    ("bug", "\u{1f41b}"),
    ("bulb", "\u{1f4a1}"),
    ("check", "\u{2705}"),
    ("clipboard", "\u{1f4cb}"),
    ("construction", "\u{1f6a7}"),
    ("eyes", "\u{1f440}"),
    ("fire", "\u{1f525}"),
    ("gear", "\u{2699}\u{fe0f}"),
    ("heart", "\u{2764}\u{fe0f}"),
    ("hourglass", "\u{231b}"),
    ("info", "\u{2139}\u{fe0f}"),
    ("key", "\u{1f511}"),
    ("link", "\u{1f517}"),
    ("lock", "\u{1f512}"),
    ("mag", "\u{1f50d}"),
    ("memo", "\u{1f4dd}"),
    ("package", "\u{1f4e6}"),
    ("pencil", "\u{270f}\u{fe0f}"),
    ("pushpin", "\u{1f4cc}"),
    ("question", "\u{2753}"),
    ("rocket", "\u{1f680}"),
    ("smile", "\u{1f604}"),
    ("sparkles", "\u{2728}"),
    ("star", "\u{2b50}"),
    ("tada", "\u{1f389}"),
    ("thinking", "\u{1f914}"),
    ("thumbsdown", "\u{1f44e}"),
    ("thumbsup", "\u{1f44d}"),
    ("warning", "\u{26a0}\u{fe0f}"),
    ("wrench", "\u{1f527}"),
    ("x", "\u{274c}"),
    ("zap", "\u{26a1}"),
];

fn shortcode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":([a-z0-9_+\-]+):").expect("valid shortcode regex"))
}

fn lookup(name: &str) -> Option<&'static str> {
    EMOJI
        .binary_search_by_key(&name, |(code, _)| code)
        .ok()
        .map(|i| EMOJI[i].1)
}

/// Replace known `:shortcode:` occurrences with their emoji.
///
/// Unknown shortcodes are left untouched.
#[must_use]
pub(crate) fn substitute(text: &str) -> Cow<'_, str> {
    if !text.contains(':') {
        return Cow::Borrowed(text);
    }
    shortcode_regex().replace_all(text, |caps: &regex::Captures<'_>| {
        match lookup(&caps[1]) {
            Some(emoji) => emoji.to_owned(),
            None => caps[0].to_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_for_binary_search() {
        let mut sorted = EMOJI.to_vec();
        sorted.sort_by_key(|(code, _)| *code);
        assert_eq!(sorted, EMOJI);
    }

    #[test]
    fn test_known_shortcode() {
        assert_eq!(substitute("deploy :rocket: now"), "deploy \u{1f680} now");
    }

    #[test]
    fn test_multiple_shortcodes() {
        assert_eq!(substitute(":fire: :zap:"), "\u{1f525} \u{26a1}");
    }

    #[test]
    fn test_unknown_shortcode_passes_through() {
        assert_eq!(substitute("see :no-such-emoji: here"), "see :no-such-emoji: here");
    }

    #[test]
    fn test_plain_colons_untouched() {
        assert_eq!(substitute("key: value"), "key: value");
        assert_eq!(substitute("10:30"), "10:30");
    }

    #[test]
    fn test_no_colon_fast_path() {
        assert!(matches!(substitute("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_plus_and_minus_codes() {
        assert_eq!(substitute(":+1:"), "\u{1f44d}");
        assert_eq!(substitute(":-1:"), "\u{1f44e}");
    }
}
