//! Catalog index.
//!
//! Built once from a menu snapshot and read-only afterwards. It holds the
//! static side of matching:
//!
//! - an exact-name table (normalized name -> item), where a later item with the
//!   same case-insensitive name replaces the earlier one but keeps its slot in
//!   iteration order;
//! - a keyword index (normalized word -> items whose name contains that word),
//!   restricted to words of at least `min_keyword_len` characters so filler
//!   tokens ("a", "an", "is") never become keys;
//! - the name list sorted longest first, used by the direct scan.
//!
//! Catalog changes require building a new index; see `SharedEngine` for the
//! swap.

use crate::{MenuItem, normalize};
use std::collections::HashMap;

/// Index into [`CatalogIndex::items`].
pub(crate) type ItemId = usize;

#[derive(Debug, Clone)]
pub struct CatalogIndex {
    items: Vec<MenuItem>,
    /// Normalized names in first-seen order, each pointing at the winning item.
    names: Vec<(String, ItemId)>,
    by_name: HashMap<String, usize>,
    keywords: HashMap<String, Vec<ItemId>>,
    /// Positions into `names`, longest name first (stable for equal lengths).
    longest_first: Vec<usize>,
}

impl CatalogIndex {
    /// Build an index over the available items of `menu`, in load order.
    pub fn new(menu: impl IntoIterator<Item = MenuItem>, min_keyword_len: usize) -> Self {
        let mut items: Vec<MenuItem> = Vec::new();
        let mut names: Vec<(String, ItemId)> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut keywords: HashMap<String, Vec<ItemId>> = HashMap::new();

        for item in menu {
            if !item.is_available {
                tracing::debug!(id = item.id, name = %item.name, "skipping unavailable menu item");
                continue;
            }

            let id = items.len();
            let key = normalize(&item.name);

            for word in key.split_whitespace() {
                if word.chars().count() < min_keyword_len {
                    continue;
                }
                let bucket = keywords.entry(word.to_string()).or_default();
                if !bucket.contains(&id) {
                    bucket.push(id);
                }
            }

            match by_name.get(&key) {
                Some(&slot) => names[slot].1 = id,
                None => {
                    by_name.insert(key.clone(), names.len());
                    names.push((key, id));
                }
            }

            items.push(item);
        }

        let mut longest_first: Vec<usize> = (0..names.len()).collect();
        longest_first.sort_by_key(|&slot| std::cmp::Reverse(names[slot].0.chars().count()));

        CatalogIndex { items, names, by_name, keywords, longest_first }
    }

    /// All indexed items in load order (shadowed duplicates included).
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact lookup by name; the query is normalized first.
    pub fn get(&self, name: &str) -> Option<&MenuItem> {
        self.by_name.get(&normalize(name)).map(|&slot| &self.items[self.names[slot].1])
    }

    /// Normalized names with their items, in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &MenuItem)> + '_ {
        self.names.iter().map(|(name, id)| (name.as_str(), &self.items[*id]))
    }

    /// Normalized names with their items, longest name first.
    pub fn names_longest_first(&self) -> impl Iterator<Item = (&str, &MenuItem)> + '_ {
        self.longest_first.iter().map(|&slot| {
            let (name, id) = &self.names[slot];
            (name.as_str(), &self.items[*id])
        })
    }

    /// Items whose name contains the exact word `word`.
    pub fn candidates(&self, word: &str) -> Vec<&MenuItem> {
        self.keywords
            .get(&normalize(word))
            .map(|ids| ids.iter().map(|&id| &self.items[id]).collect())
            .unwrap_or_default()
    }

    /// Item ids whose name has a word containing `fragment`, in catalog order.
    ///
    /// Only answers for fragments at least as long as the index's minimum
    /// keyword length; shorter words never made it into the index.
    pub(crate) fn ids_with_word_containing(&self, fragment: &str) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> =
            self.keywords.iter().filter(|(word, _)| word.contains(fragment)).flat_map(|(_, ids)| ids.iter().copied()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub(crate) fn item(&self, id: ItemId) -> &MenuItem {
        &self.items[id]
    }
}
