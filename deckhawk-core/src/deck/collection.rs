use super::category::{BuiltinCategory, DeckBucket};
use super::entry::{DeckEntry, mint_entry_id};
use super::layout::ColumnLayout;
use crate::scryfall::CardReference;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quantity totals bucketed by column option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckCounts {
    pub mainboard: u32,
    pub sideboard: u32,
    pub extra: u32,
}

impl DeckCounts {
    pub fn total(&self) -> u32 {
        self.mainboard + self.sideboard + self.extra
    }
}

/// The deck itself: per-category ordered lists of entries.
///
/// Every operation is total over valid input; an unknown category key logs
/// a warning and does nothing, since stale keys are a normal transient
/// state during rapid UI interaction. Within a category insertion order is
/// preserved; the model never sorts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeckState {
    pub name: String,
    pub description: String,
    pub format: String,
    categories: HashMap<String, Vec<DeckEntry>>,
}

impl Default for DeckState {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckState {
    /// An empty deck with all built-in categories present.
    pub fn new() -> DeckState {
        let categories = BuiltinCategory::ALL
            .iter()
            .map(|b| (b.key().to_string(), Vec::new()))
            .collect();
        DeckState {
            name: String::new(),
            description: String::new(),
            format: String::new(),
            categories,
        }
    }

    pub fn has_category(&self, key: &str) -> bool {
        self.categories.contains_key(key)
    }

    /// Registers a category key if absent (custom column creation,
    /// hydration of decks with unknown keys).
    pub fn ensure_category(&mut self, key: &str) {
        self.categories.entry(key.to_string()).or_default();
    }

    /// Removes a category and discards its cards (custom column removal).
    pub fn drop_category(&mut self, key: &str) {
        self.categories.remove(key);
    }

    /// Empties a category but keeps the key (hiding a built-in column).
    pub fn clear_category(&mut self, key: &str) {
        if let Some(entries) = self.categories.get_mut(key) {
            entries.clear();
        }
    }

    pub fn entries(&self, key: &str) -> &[DeckEntry] {
        self.categories.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DeckEntry])> {
        self.categories
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Locates an entry by id, returning its category key.
    pub fn find_entry(&self, entry_id: &str) -> Option<(&str, &DeckEntry)> {
        self.categories.iter().find_map(|(key, entries)| {
            entries
                .iter()
                .find(|e| e.id == entry_id)
                .map(|e| (key.as_str(), e))
        })
    }

    /// Adds one copy of a card. With no target the category is derived from
    /// the type line. Adding a card that already has an entry in the target
    /// category merges into it (quantity + 1) instead of duplicating.
    /// Returns the id of the created or merged entry.
    pub fn add_card(&mut self, card: CardReference, target: Option<&str>) -> Option<String> {
        let key = match target {
            Some(key) => key.to_string(),
            None => BuiltinCategory::derive_from_type_line(&card.type_line)
                .key()
                .to_string(),
        };
        let Some(entries) = self.categories.get_mut(&key) else {
            warn!("add_card into unknown category '{}', ignoring", key);
            return None;
        };

        if let Some(existing) = entries.iter_mut().find(|e| e.card.id == card.id) {
            existing.quantity += 1;
            return Some(existing.id.clone());
        }

        let entry = DeckEntry::new(card, &key);
        let id = entry.id.clone();
        entries.push(entry);
        Some(id)
    }

    /// Deletes the entry outright; no-op if id or category is unknown.
    pub fn remove_card(&mut self, entry_id: &str, category: &str) -> bool {
        let Some(entries) = self.categories.get_mut(category) else {
            warn!("remove_card from unknown category '{}', ignoring", category);
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        before != entries.len()
    }

    /// Sets the quantity; zero deletes the entry, exactly like remove_card.
    pub fn set_quantity(&mut self, entry_id: &str, category: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_card(entry_id, category);
        }
        let Some(entries) = self.categories.get_mut(category) else {
            warn!("set_quantity in unknown category '{}', ignoring", category);
            return false;
        };
        match entries.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Swaps the entry's card for another printing/variant in place.
    /// Quantity and id are untouched.
    pub fn change_card_face(
        &mut self,
        entry_id: &str,
        category: &str,
        new_card: CardReference,
    ) -> bool {
        let Some(entries) = self.categories.get_mut(category) else {
            warn!("change_card_face in unknown category '{}', ignoring", category);
            return false;
        };
        match entries.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.card = new_card;
                true
            }
            None => false,
        }
    }

    /// Moves an entry to another category: remove + re-insert with a fresh
    /// id (a category change invalidates the old id). Quantity and card
    /// carry over unchanged. Returns the new id, or the old one when source
    /// and target are the same.
    pub fn move_card(&mut self, entry_id: &str, from: &str, to: &str) -> Option<String> {
        if from == to {
            return Some(entry_id.to_string());
        }
        if !self.categories.contains_key(to) {
            warn!("move_card into unknown category '{}', ignoring", to);
            return None;
        }
        let Some(entries) = self.categories.get_mut(from) else {
            warn!("move_card from unknown category '{}', ignoring", from);
            return None;
        };
        let Some(index) = entries.iter().position(|e| e.id == entry_id) else {
            return None;
        };
        let mut entry = entries.remove(index);
        entry.id = mint_entry_id();
        entry.category = to.to_string();
        let new_id = entry.id.clone();
        self.categories
            .get_mut(to)
            .expect("target category checked above")
            .push(entry);
        Some(new_id)
    }

    /// Sums quantities over the categories accepted by the filter.
    pub fn total_count<F>(&self, mut filter: F) -> u32
    where
        F: FnMut(&str) -> bool,
    {
        self.categories
            .iter()
            .filter(|(key, _)| filter(key))
            .flat_map(|(_, entries)| entries.iter())
            .map(|e| e.quantity)
            .sum()
    }

    /// Main/sideboard/extra totals according to each column's option flag.
    pub fn counts(&self, layout: &ColumnLayout) -> DeckCounts {
        let mut counts = DeckCounts::default();
        for (key, entries) in &self.categories {
            let quantity: u32 = entries.iter().map(|e| e.quantity).sum();
            match layout.option_of(key).bucket() {
                DeckBucket::Mainboard => counts.mainboard += quantity,
                DeckBucket::Sideboard => counts.sideboard += quantity,
                DeckBucket::Extra => counts.extra += quantity,
            }
        }
        counts
    }

    /// Total USD price. Sideboard-flagged categories are excluded, same as
    /// the main-deck count.
    pub fn total_price(&self, layout: &ColumnLayout) -> f64 {
        self.categories
            .iter()
            .filter(|(key, _)| layout.option_of(key).bucket() != DeckBucket::Sideboard)
            .flat_map(|(_, entries)| entries.iter())
            .filter_map(|e| e.card.price_usd.map(|p| p * e.quantity as f64))
            .sum()
    }
}
