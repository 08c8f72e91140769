use once_cell::sync::Lazy;
use regex::Regex;

/// Number words and informal quantifiers, in table order.
///
/// Table order matters for the segment fallback, which takes the first entry
/// that prefixes a segment. The quantity parser uses [`NUMBER_WORDS_LONGEST_FIRST`].
pub(crate) const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("a", 1),
    ("an", 1),
    ("single", 1),
    ("couple", 2),
    ("few", 3),
    ("dozen", 12),
    ("half dozen", 6),
];

/// [`NUMBER_WORDS`] sorted by descending length (stable), so multi-word
/// entries such as "half dozen" are tried before "dozen".
pub(crate) static NUMBER_WORDS_LONGEST_FIRST: Lazy<Vec<(&'static str, u32)>> = Lazy::new(|| {
    let mut words = NUMBER_WORDS.to_vec();
    words.sort_by_key(|(word, _)| std::cmp::Reverse(word.len()));
    words
});

/// Connector tokens that separate item mentions.
pub(crate) fn connectors() -> &'static Regex {
    regex!(r"\band\b|,|\bwith\b|\balso\b|\bplus\b")
}

/// Intent verbs, pronouns, articles and connectors removed before the segment
/// fallback splits an utterance.
pub(crate) fn stop_words() -> &'static Regex {
    regex!(r"\b(add|order|want|give|get|remove|delete|cancel|please|can|i|you|me|my|some|the|and|with|also|too)\b")
}

/// Standalone digit runs.
pub(crate) fn digit_tokens() -> &'static Regex {
    regex!(r"\b(\d+)\b")
}

/// A segment that starts with an integer followed by the item phrase.
pub(crate) fn leading_count() -> &'static Regex {
    regex!(r"^(\d+)\s+(.+)")
}

pub(crate) fn whitespace_runs() -> &'static Regex {
    regex!(r"\s+")
}

/// Parse a digit run as a quantity. Zero and values that do not fit a `u32`
/// are not quantities.
pub(crate) fn parse_count(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}
