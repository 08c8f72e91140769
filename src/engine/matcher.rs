//! Free-text item resolution.
//!
//! A query that names (approximately) one item is resolved by a fixed cascade
//! of strategies; the first one that returns a hit wins:
//!
//! ```text
//! query ─ exact name ─┬─ hit → Exact
//!                     └─ containment ─┬─ hit → Contains
//!                                     └─ similarity ≥ cutoff ─┬─ hit → Fuzzy
//!                                                             └─ keyword overlap ─ hit → Keyword
//! ```
//!
//! Exact and containment checks come first so that a short exact name is never
//! overridden by a noisier approximate hit. Each step is a plain function over
//! the catalog and can be disabled through [`MatchStrategies`].

use super::catalog::CatalogIndex;
use super::similarity::ratio;
use crate::{MenuItem, normalize};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Enabled steps of the match cascade. The order of the steps is fixed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MatchStrategies: u8 {
        const EXACT    = 1 << 0;
        const CONTAINS = 1 << 1;
        const FUZZY    = 1 << 2;
        const KEYWORD  = 1 << 3;
    }
}

impl Default for MatchStrategies {
    fn default() -> Self {
        MatchStrategies::all()
    }
}

/// Which cascade step resolved a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Exact,
    Contains,
    Fuzzy,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ItemMatch<'a> {
    pub item: &'a MenuItem,
    pub kind: MatchKind,
}

type StrategyFn = for<'a> fn(&'a CatalogIndex, &str, f64) -> Option<&'a MenuItem>;

struct Strategy {
    flag: MatchStrategies,
    kind: MatchKind,
    run: StrategyFn,
}

/// The cascade, in evaluation order.
const CASCADE: [Strategy; 4] = [
    Strategy { flag: MatchStrategies::EXACT, kind: MatchKind::Exact, run: exact },
    Strategy { flag: MatchStrategies::CONTAINS, kind: MatchKind::Contains, run: containment },
    Strategy { flag: MatchStrategies::FUZZY, kind: MatchKind::Fuzzy, run: closest },
    Strategy { flag: MatchStrategies::KEYWORD, kind: MatchKind::Keyword, run: keyword_overlap },
];

#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemMatcher {
    cutoff: f64,
    strategies: MatchStrategies,
}

impl ItemMatcher {
    pub fn new(cutoff: f64, strategies: MatchStrategies) -> Self {
        ItemMatcher { cutoff, strategies }
    }

    /// Resolve `query` to a single catalog item, or `None` when every enabled
    /// strategy misses. An empty query never matches.
    pub fn resolve<'a>(&self, catalog: &'a CatalogIndex, query: &str) -> Option<ItemMatch<'a>> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        CASCADE.iter().filter(|s| self.strategies.contains(s.flag)).find_map(|s| {
            (s.run)(catalog, &query, self.cutoff).map(|item| {
                tracing::debug!(query = %query, item = %item.name, kind = ?s.kind, "resolved item");
                ItemMatch { item, kind: s.kind }
            })
        })
    }
}

fn exact<'a>(catalog: &'a CatalogIndex, query: &str, _cutoff: f64) -> Option<&'a MenuItem> {
    catalog.get(query)
}

/// First name (in catalog order) that contains the query or is contained in it.
fn containment<'a>(catalog: &'a CatalogIndex, query: &str, _cutoff: f64) -> Option<&'a MenuItem> {
    catalog.names().find(|(name, _)| name.contains(query) || query.contains(name)).map(|(_, item)| item)
}

/// Most similar name with a ratio of at least `cutoff`. Equal ratios prefer the
/// lexicographically greater name.
fn closest<'a>(catalog: &'a CatalogIndex, query: &str, cutoff: f64) -> Option<&'a MenuItem> {
    let mut best: Option<(f64, &str, &MenuItem)> = None;
    for (name, item) in catalog.names() {
        let score = ratio(name, query);
        if score < cutoff {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_score, best_name, _)) => score > best_score || (score == best_score && name > best_name),
        };
        if better {
            best = Some((score, name, item));
        }
    }
    best.map(|(_, _, item)| item)
}

/// Item sharing the most word fragments with the query. Ties keep the first
/// item seen; a zero score is no match.
fn keyword_overlap<'a>(catalog: &'a CatalogIndex, query: &str, _cutoff: f64) -> Option<&'a MenuItem> {
    let query_words: Vec<&str> = query.split_whitespace().collect();
    let mut best: Option<(usize, &MenuItem)> = None;

    for item in catalog.items() {
        let name = normalize(&item.name);
        let name_words: Vec<&str> = name.split_whitespace().collect();
        let score = query_words
            .iter()
            .filter(|w| name_words.iter().any(|nw| nw.contains(**w) || w.contains(*nw)))
            .count();
        if score > best.map_or(0, |(s, _)| s) {
            best = Some((score, item));
        }
    }

    best.map(|(_, item)| item)
}
