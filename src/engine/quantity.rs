//! Quantity parsing for the text that precedes an item mention.
//!
//! Quantities bind to the nearest preceding item: the span is cut at the last
//! connector ("and", ",", "with", "also", "plus") and only the tail is read.
//! Inside that tail the last digit run wins; failing that, number words are
//! matched as whole words, longest entry first. No quantifier means one.

use crate::rules::lexicon::{NUMBER_WORDS_LONGEST_FIRST, connectors, digit_tokens, parse_count};

/// Quantity requested by the text immediately before an item mention.
///
/// Always returns a positive count.
pub fn parse_quantity(preceding: &str) -> u32 {
    let lower = preceding.trim().to_lowercase();
    let tail = connectors().split(&lower).last().unwrap_or(&lower).trim();

    if let Some(count) = digit_tokens().captures_iter(tail).filter_map(|caps| parse_count(&caps[1])).last() {
        return count;
    }

    let tokens: Vec<&str> = tail.split_whitespace().collect();
    NUMBER_WORDS_LONGEST_FIRST
        .iter()
        .find(|(phrase, _)| contains_phrase(&tokens, phrase))
        .map(|(_, count)| *count)
        .unwrap_or(1)
}

/// True when `phrase` occurs in `tokens` as a run of whole words.
fn contains_phrase(tokens: &[&str], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }
    tokens.windows(words.len()).any(|window| window == words.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_examples() {
        let cases: Vec<(u32, &str)> = vec![
            (1, ""),
            (1, "   "),
            (2, "order 2 "),
            (2, "two "),
            (2, "Two "),
            (1, "a "),
            (1, "an "),
            (1, "single "),
            (2, "a couple of "),
            (3, "a few "),
            (12, "a dozen "),
            (6, "half dozen "),
            (6, "give me a half dozen "),
            (5, "add 3 or maybe 5 "),
            (10, "ten "),
            (1, "please add "),
            (1, "the spicy "),
        ];

        for (expected, input) in cases {
            assert_eq!(parse_quantity(input), expected, "quantity for {input:?}");
        }
    }

    #[test]
    fn quantity_binds_to_the_last_segment() {
        assert_eq!(parse_quantity("two s and a "), 1);
        assert_eq!(parse_quantity("3 fries, "), 1);
        assert_eq!(parse_quantity("3 fries plus 4 "), 4);
        assert_eq!(parse_quantity("burger with two "), 2);
        assert_eq!(parse_quantity("one coke also "), 1);
    }

    #[test]
    fn zero_and_overflowing_digits_are_ignored() {
        assert_eq!(parse_quantity("0 "), 1);
        assert_eq!(parse_quantity("two 0 "), 2);
        assert_eq!(parse_quantity("4 0 "), 4);
        assert_eq!(parse_quantity("123456789012 "), 1);
    }

    #[test]
    fn number_words_must_be_whole_words() {
        // "tone" contains "one", "often" contains "ten": neither is a quantity.
        assert_eq!(parse_quantity("tone "), 1);
        assert_eq!(parse_quantity("often "), 1);
    }
}
