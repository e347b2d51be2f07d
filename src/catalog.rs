//! Indexed shortcut catalog with Vec storage.
//!
//! Uses Vec for deterministic dataset order and HashMap for O(1) lookup by
//! id. Each description is parsed once when the catalog is built; the
//! trainable index list is derived from those results and only changes when
//! a new catalog is built.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::dataset::ShortcutItem;
use crate::shortcuts::{parse, ParsedAlternatives};

/// A shortcut together with its parsed alternatives.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub item: ShortcutItem,
    pub alternatives: ParsedAlternatives,
}

impl CatalogEntry {
    pub fn is_trainable(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShortcutCatalog {
    entries: Vec<CatalogEntry>,
    id_to_index: HashMap<String, usize>,
    trainable: Vec<usize>,
}

impl ShortcutCatalog {
    /// Build a catalog, keeping the first record for each duplicated id.
    pub fn new(items: impl IntoIterator<Item = ShortcutItem>) -> Self {
        let mut catalog = Self::default();

        for item in items {
            if catalog.id_to_index.contains_key(&item.id) {
                warn!(item_id = %item.id, "Duplicate shortcut id, keeping first occurrence");
                continue;
            }
            let alternatives = parse(&item.raw_keys);
            let index = catalog.entries.len();
            if !alternatives.is_empty() {
                catalog.trainable.push(index);
            }
            catalog.id_to_index.insert(item.id.clone(), index);
            catalog.entries.push(CatalogEntry { item, alternatives });
        }

        debug!(
            item_count = catalog.entries.len(),
            trainable_count = catalog.trainable.len(),
            "Built shortcut catalog"
        );
        catalog
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a dataset position.
    pub fn entry(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index_of(id).and_then(|i| self.entries.get(i))
    }

    /// All items in dataset order.
    pub fn items(&self) -> impl Iterator<Item = &ShortcutItem> + '_ {
        self.entries.iter().map(|e| &e.item)
    }

    /// Dataset positions of trainable items, in dataset order.
    pub fn trainable_indices(&self) -> &[usize] {
        &self.trainable
    }

    /// Trainable items in dataset order.
    pub fn trainable(&self) -> impl Iterator<Item = &ShortcutItem> + '_ {
        self.trainable.iter().map(|&i| &self.entries[i].item)
    }

    pub fn trainable_count(&self) -> usize {
        self.trainable.len()
    }

    /// Sorted, de-duplicated section names.
    pub fn sections(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.item.section.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Items whose action or keys contain `query` (case-insensitive),
    /// optionally restricted to one section. An empty query matches all.
    pub fn search(&self, query: &str, section: Option<&str>) -> Vec<&ShortcutItem> {
        let query = query.trim().to_lowercase();
        self.items()
            .filter(|item| section.map_or(true, |s| item.section == s))
            .filter(|item| {
                query.is_empty()
                    || item.action.to_lowercase().contains(&query)
                    || item.raw_keys.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ShortcutCatalog {
        ShortcutCatalog::new(vec![
            ShortcutItem::new("save", "Save Live Set", "Cmd S", "File"),
            ShortcutItem::new("drag", "Copy clip", "Option drag", "Editing"),
            ShortcutItem::new("undo", "Undo", "Cmd Z", "Editing"),
            ShortcutItem::new("nav", "Move selection", "arrow keys", "Browser"),
        ])
    }

    #[test]
    fn trainable_excludes_unparsable_items() {
        let catalog = sample();
        assert_eq!(catalog.len(), 4);
        let ids: Vec<_> = catalog.trainable().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["save", "undo", "nav"]);
        assert!(!catalog.get("drag").unwrap().is_trainable());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let catalog = ShortcutCatalog::new(vec![
            ShortcutItem::new("a", "First", "Cmd A", "X"),
            ShortcutItem::new("a", "Second", "Cmd B", "X"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").unwrap().item.action, "First");
    }

    #[test]
    fn sections_are_sorted_and_unique() {
        assert_eq!(sample().sections(), vec!["Browser", "Editing", "File"]);
    }

    #[test]
    fn search_matches_action_or_keys() {
        let catalog = sample();
        let ids = |items: Vec<&ShortcutItem>| -> Vec<String> {
            items.into_iter().map(|i| i.id.clone()).collect()
        };

        assert_eq!(ids(catalog.search("  undo ", None)), vec!["undo"]);
        assert_eq!(ids(catalog.search("cmd", None)), vec!["save", "undo"]);
        assert_eq!(ids(catalog.search("", Some("Editing"))), vec!["drag", "undo"]);
        assert_eq!(ids(catalog.search("cmd", Some("File"))), vec!["save"]);
        assert_eq!(catalog.search("", None).len(), 4);
    }
}
