use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Item;

/// A multiset of carried items, keyed by kind.
///
/// Kinds with a count of zero are never stored, so iteration only yields
/// items the player actually holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<Item, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) {
        *self.items.entry(item).or_insert(0) += 1;
    }

    /// Removes one instance of `item`, returning it if one was held.
    pub fn remove(&mut self, item: Item) -> Option<Item> {
        let count = self.items.get_mut(&item)?;
        *count -= 1;
        if *count == 0 {
            self.items.remove(&item);
        }
        Some(item)
    }

    pub fn count(&self, item: Item) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.contains_key(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates `(item, count)` pairs in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Item, u32)> + '_ {
        self.items.iter().map(|(item, count)| (*item, *count))
    }
}
