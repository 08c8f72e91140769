//! Item extraction: utterance -> ordered `(item, quantity)` pairs.
//!
//! Two strategies run in order and the first non-empty result is
//! authoritative (results are never merged):
//!
//! ```text
//! utterance ── direct scan ──────────── items? ── yes → DirectScan
//!   (names longest first, consumed         │
//!    spans never matched twice)            no
//!                                          │
//!              segment fallback ───────────┴──────── → Segments
//!   (strip stop words, split on connectors,
//!    leading count / number word, match cascade)
//! ```
//!
//! Direct scan walks catalog names longest first so "burger" can never match
//! inside an already consumed "chicken burger", and reports hits in that scan
//! order. Every hit marks its byte span as consumed; the text before a hit,
//! minus consumed spans, feeds the quantity parser. A name is only searched
//! in the original text, never across a consumed span.

use super::catalog::CatalogIndex;
use super::matcher::{ItemMatcher, MatchKind};
use super::quantity::parse_quantity;
use crate::rules::lexicon::{NUMBER_WORDS, connectors, leading_count, parse_count, stop_words, whitespace_runs};
use crate::{LineItem, normalize};
use std::ops::Range;

/// Which extraction strategy produced the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    DirectScan,
    Segments,
}

/// One step of an extraction, kept for verbose output.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTrace {
    /// Matched catalog name (direct scan) or item phrase (segment fallback).
    pub segment: String,
    pub quantity: u32,
    /// Name of the resolved item, if any.
    pub item: Option<String>,
    /// Cascade step that resolved a segment; `None` for direct-scan hits.
    pub kind: Option<MatchKind>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Extraction {
    pub items: Vec<LineItem>,
    pub strategy: Option<ExtractionStrategy>,
    pub trace: Vec<MatchTrace>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Byte ranges of the working text already claimed by a match.
#[derive(Debug, Default)]
struct ConsumedSpans {
    spans: Vec<Range<usize>>,
}

impl ConsumedSpans {
    fn overlaps(&self, range: &Range<usize>) -> bool {
        self.spans.iter().any(|s| s.start < range.end && range.start < s.end)
    }

    fn insert(&mut self, range: Range<usize>) {
        debug_assert!(!self.overlaps(&range));
        let at = self.spans.partition_point(|s| s.start < range.start);
        self.spans.insert(at, range);
    }

    /// `text[..end]` with every consumed span cut out.
    fn text_before(&self, text: &str, end: usize) -> String {
        let mut out = String::with_capacity(end);
        let mut cursor = 0;
        for span in self.spans.iter().take_while(|s| s.start < end) {
            out.push_str(&text[cursor..span.start]);
            cursor = span.end.min(end);
        }
        if cursor < end {
            out.push_str(&text[cursor..end]);
        }
        out
    }

    /// First occurrence of `needle` in `text` that does not touch a consumed span.
    fn find_free(&self, text: &str, needle: &str) -> Option<Range<usize>> {
        text.match_indices(needle).map(|(start, m)| start..start + m.len()).find(|r| !self.overlaps(r))
    }
}

pub(crate) struct ItemExtractor<'c> {
    catalog: &'c CatalogIndex,
    matcher: ItemMatcher,
}

impl<'c> ItemExtractor<'c> {
    pub fn new(catalog: &'c CatalogIndex, matcher: ItemMatcher) -> Self {
        ItemExtractor { catalog, matcher }
    }

    /// Extract line items from `utterance`; empty when nothing resolves.
    pub fn extract(&self, utterance: &str) -> Extraction {
        let text = normalize(utterance);

        let direct = self.direct_scan(&text);
        if !direct.is_empty() {
            tracing::debug!(items = direct.items.len(), "direct scan extracted items");
            return direct;
        }

        let segments = self.segments(&text);
        tracing::debug!(items = segments.items.len(), "segment fallback finished");
        segments
    }

    fn direct_scan(&self, text: &str) -> Extraction {
        let mut consumed = ConsumedSpans::default();
        let mut extraction = Extraction::default();

        for (name, item) in self.catalog.names_longest_first() {
            if name.is_empty() {
                continue;
            }
            let Some(span) = consumed.find_free(text, name) else {
                continue;
            };

            let quantity = parse_quantity(&consumed.text_before(text, span.start));
            extraction.trace.push(MatchTrace { segment: name.to_string(), quantity, item: Some(item.name.clone()), kind: None });
            extraction.items.push(LineItem { item: item.clone(), quantity });
            consumed.insert(span);
        }

        if !extraction.items.is_empty() {
            extraction.strategy = Some(ExtractionStrategy::DirectScan);
        }
        extraction
    }

    fn segments(&self, text: &str) -> Extraction {
        let stripped = stop_words().replace_all(text, " ");
        let cleaned = whitespace_runs().replace_all(&stripped, " ");

        let mut extraction = Extraction::default();
        for part in connectors().split(cleaned.trim()) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (quantity, phrase) = split_quantity(part);
            let hit = self.matcher.resolve(self.catalog, phrase);

            extraction.trace.push(MatchTrace {
                segment: phrase.to_string(),
                quantity,
                item: hit.map(|m| m.item.name.clone()),
                kind: hit.map(|m| m.kind),
            });
            if let Some(m) = hit {
                extraction.items.push(LineItem { item: m.item.clone(), quantity });
            }
        }

        if !extraction.items.is_empty() {
            extraction.strategy = Some(ExtractionStrategy::Segments);
        }
        extraction
    }
}

/// Split a segment into its leading quantity and the item phrase.
fn split_quantity(part: &str) -> (u32, &str) {
    if let Some(caps) = leading_count().captures(part) {
        if let (Some(count), Some(rest)) = (parse_count(&caps[1]), caps.get(2)) {
            return (count, rest.as_str());
        }
    }

    for (word, count) in NUMBER_WORDS {
        if let Some(rest) = part.strip_prefix(word).filter(|rest| rest.starts_with(' ')) {
            return (*count, rest.trim());
        }
    }

    (1, part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MenuItem;
    use crate::engine::MatchStrategies;

    fn catalog() -> CatalogIndex {
        CatalogIndex::new(
            vec![
                MenuItem::new(1, "Veg Burger", 149.0, "Burgers", true),
                MenuItem::new(2, "Burger", 129.0, "Burgers", true),
                MenuItem::new(3, "Chicken Burger", 199.0, "Burgers", false),
                MenuItem::new(4, "Coke", 49.0, "Beverages", true),
                MenuItem::new(5, "Margherita Pizza", 299.0, "Pizza", true),
                MenuItem::new(6, "Paneer Tikka", 219.0, "Starters", true),
            ],
            3,
        )
    }

    fn extract(utterance: &str) -> (Vec<(i64, u32)>, Option<ExtractionStrategy>) {
        let catalog = catalog();
        let extractor = ItemExtractor::new(&catalog, ItemMatcher::new(0.5, MatchStrategies::all()));
        let out = extractor.extract(utterance);
        (out.items.iter().map(|li| (li.item.id, li.quantity)).collect(), out.strategy)
    }

    #[test]
    fn quantities_bind_to_nearest_item() {
        let (items, strategy) = extract("two veg burgers and a coke");
        assert_eq!(items, vec![(1, 2), (4, 1)]);
        assert_eq!(strategy, Some(ExtractionStrategy::DirectScan));
    }

    #[test]
    fn longest_name_wins() {
        assert_eq!(extract("add a chicken burger").0, vec![(3, 1)]);
        assert_eq!(extract("add a burger").0, vec![(2, 1)]);
    }

    #[test]
    fn items_come_back_in_scan_order() {
        // longer names are found first, wherever they sit in the utterance
        assert_eq!(extract("a coke and 3 chicken burgers").0, vec![(3, 3), (4, 1)]);
        assert_eq!(extract("coke, paneer tikka and 2 veg burgers").0, vec![(6, 1), (1, 2), (4, 1)]);
    }

    #[test]
    fn names_never_match_across_consumed_spans() {
        let catalog = CatalogIndex::new(
            vec![MenuItem::new(1, "Cola", 49.0, "Beverages", true), MenuItem::new(2, "Tea", 29.0, "Beverages", true)],
            3,
        );
        let extractor = ItemExtractor::new(&catalog, ItemMatcher::new(0.5, MatchStrategies::all()));
        let names: Vec<String> = extractor.extract("tcolaea").items.into_iter().map(|li| li.item.name).collect();
        assert_eq!(names, vec!["Cola".to_string()]);
    }

    #[test]
    fn same_name_is_taken_once() {
        assert_eq!(extract("coke and coke").0, vec![(4, 1)]);
    }

    #[test]
    fn consumed_spans_do_not_leak_into_quantities() {
        // "2" belongs to the burger; the coke's preceding text is "2 s, a ".
        assert_eq!(extract("2 veg burgers, a coke").0, vec![(1, 2), (4, 1)]);
        assert_eq!(extract("veg burger 4 coke").0, vec![(1, 1), (4, 4)]);
    }

    #[test]
    fn falls_back_to_segments_for_misspellings() {
        let (items, strategy) = extract("margherita piza, 3 paneer tika");
        assert_eq!(items, vec![(5, 1), (6, 3)]);
        assert_eq!(strategy, Some(ExtractionStrategy::Segments));
    }

    #[test]
    fn segment_number_words_are_stripped() {
        assert_eq!(extract("two margherita piza").0, vec![(5, 2)]);
        assert_eq!(extract("half dozen paneer tika").0, vec![(6, 6)]);
    }

    #[test]
    fn unresolvable_segments_are_dropped() {
        let (items, strategy) = extract("xyz, margherita piza");
        assert_eq!(items, vec![(5, 1)]);
        assert_eq!(strategy, Some(ExtractionStrategy::Segments));
    }

    #[test]
    fn nothing_resolves_to_empty() {
        for input in ["", "   ", "???", "qqq", "please"] {
            let (items, strategy) = extract(input);
            assert!(items.is_empty(), "expected nothing for {input:?}, got {items:?}");
            assert_eq!(strategy, None);
        }
    }

    #[test]
    fn consumed_spans_cut_text() {
        let mut consumed = ConsumedSpans::default();
        consumed.insert(4..8);
        consumed.insert(0..2);
        assert_eq!(consumed.text_before("abcdefghij", 10), "cdij");
        assert_eq!(consumed.text_before("abcdefghij", 6), "cd");
        assert_eq!(consumed.find_free("ab ab", "ab"), None);
        assert!(consumed.overlaps(&(5..6)));
    }

    #[test]
    fn split_quantity_forms() {
        assert_eq!(split_quantity("3 coke"), (3, "coke"));
        assert_eq!(split_quantity("0 coke"), (1, "0 coke"));
        assert_eq!(split_quantity("an apple pie"), (1, "apple pie"));
        assert_eq!(split_quantity("a coke"), (1, "coke"));
        assert_eq!(split_quantity("few cokes"), (3, "cokes"));
        assert_eq!(split_quantity("tenders"), (1, "tenders"));
        assert_eq!(split_quantity("coke"), (1, "coke"));
    }
}
