use super::category::{BuiltinCategory, CategoryKind, ColumnOption, kind_of};
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Position of a column in the sparse editor grid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    pub row: u32,
    pub col: u32,
}

/// Owns the set of visible deck columns and their grid placement.
///
/// Built-in columns can be hidden (their key survives for restoration),
/// custom columns are created and removed outright. At most one live column
/// occupies a grid cell; swap-on-drop keeps that true.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    positions: HashMap<String, GridPosition>,
    custom_labels: HashMap<String, String>,
    label_overrides: HashMap<String, String>,
    hidden: HashSet<BuiltinCategory>,
    options: HashMap<String, ColumnOption>,
}

impl Default for ColumnLayout {
    /// Built-in columns in a 3x2 grid, nothing hidden, no custom columns.
    fn default() -> Self {
        let mut positions = HashMap::new();
        for (i, builtin) in BuiltinCategory::ALL.iter().enumerate() {
            positions.insert(
                builtin.key().to_string(),
                GridPosition {
                    row: (i / 3) as u32,
                    col: (i % 3) as u32,
                },
            );
        }
        let mut options = HashMap::new();
        options.insert(
            BuiltinCategory::Sideboard.key().to_string(),
            ColumnOption::Sideboard,
        );
        ColumnLayout {
            positions,
            custom_labels: HashMap::new(),
            label_overrides: HashMap::new(),
            hidden: HashSet::new(),
            options,
        }
    }
}

impl ColumnLayout {
    /// A column key is live when it can hold cards right now: a non-hidden
    /// built-in, or an existing custom column.
    pub fn is_live(&self, key: &str) -> bool {
        match kind_of(key) {
            CategoryKind::Builtin(builtin) => !self.hidden.contains(&builtin),
            CategoryKind::Custom => self.custom_labels.contains_key(key),
        }
    }

    pub fn position_of(&self, key: &str) -> Option<GridPosition> {
        self.positions.get(key).copied()
    }

    pub fn column_at(&self, row: u32, col: u32) -> Option<&str> {
        self.positions
            .iter()
            .find(|(_, p)| p.row == row && p.col == col)
            .map(|(k, _)| k.as_str())
    }

    pub fn label_of(&self, key: &str) -> String {
        if let Some(label) = self.label_overrides.get(key) {
            return label.clone();
        }
        match kind_of(key) {
            CategoryKind::Builtin(builtin) => builtin.display_name().to_string(),
            CategoryKind::Custom => self
                .custom_labels
                .get(key)
                .cloned()
                .unwrap_or_else(|| key.to_string()),
        }
    }

    pub fn option_of(&self, key: &str) -> ColumnOption {
        self.options.get(key).copied().unwrap_or_default()
    }

    pub fn set_column_option(&mut self, key: &str, option: ColumnOption) {
        if !self.is_live(key) {
            warn!("set_column_option on unknown column '{}', ignoring", key);
            return;
        }
        self.options.insert(key.to_string(), option);
    }

    /// Creates a custom column and returns its generated key. The column has
    /// no position until the caller places it.
    pub fn add_column(&mut self, label: &str) -> String {
        let key = format!("custom-{}", Uuid::new_v4());
        self.custom_labels.insert(key.clone(), label.to_string());
        key
    }

    /// Sets or overwrites the column's position. Refuses if the cell is
    /// already occupied by another live column or the key is unknown.
    pub fn place_column(&mut self, key: &str, row: u32, col: u32) -> bool {
        if !self.is_live(key) {
            warn!("place_column on unknown column '{}', ignoring", key);
            return false;
        }
        if let Some(occupant) = self.column_at(row, col) {
            if occupant != key {
                warn!(
                    "cell ({}, {}) already holds '{}', not placing '{}'",
                    row, col, occupant, key
                );
                return false;
            }
        }
        self.positions
            .insert(key.to_string(), GridPosition { row, col });
        true
    }

    /// Atomically exchanges two column positions. Both must be placed.
    pub fn swap_columns(&mut self, a: &str, b: &str) -> bool {
        let (Some(pos_a), Some(pos_b)) = (self.position_of(a), self.position_of(b)) else {
            warn!("swap_columns('{}', '{}') with an unplaced column", a, b);
            return false;
        };
        if a == b {
            return true;
        }
        self.positions.insert(a.to_string(), pos_b);
        self.positions.insert(b.to_string(), pos_a);
        true
    }

    /// Marks a built-in column deleted. Its position is dropped but the key
    /// survives so the column can be restored later. Cards are cleared by
    /// the caller; hiding never moves them anywhere.
    pub fn hide_builtin_column(&mut self, key: &str) -> bool {
        match kind_of(key) {
            CategoryKind::Builtin(builtin) => {
                if !self.hidden.insert(builtin) {
                    warn!("hide_builtin_column on already hidden '{}'", key);
                    return false;
                }
                self.positions.remove(key);
                true
            }
            CategoryKind::Custom => {
                warn!("hide_builtin_column on custom column '{}', use remove_column", key);
                false
            }
        }
    }

    /// Un-hides a built-in column and assigns it a fresh position. The
    /// restored column starts empty; hiding discarded its cards.
    pub fn restore_builtin_column(&mut self, key: &str, row: u32, col: u32) -> bool {
        match kind_of(key) {
            CategoryKind::Builtin(builtin) => {
                if !self.hidden.remove(&builtin) {
                    warn!("restore_builtin_column on non-hidden '{}'", key);
                    return false;
                }
                if !self.place_column(key, row, col) {
                    // Slot taken: restored but unplaced, caller may re-place.
                    return false;
                }
                true
            }
            CategoryKind::Custom => {
                warn!("restore_builtin_column on custom column '{}'", key);
                false
            }
        }
    }

    /// Permanently deletes a custom column: key, position, label, option.
    pub fn remove_column(&mut self, key: &str) -> bool {
        match kind_of(key) {
            CategoryKind::Custom => {
                if self.custom_labels.remove(key).is_none() {
                    warn!("remove_column on unknown column '{}'", key);
                    return false;
                }
                self.positions.remove(key);
                self.label_overrides.remove(key);
                self.options.remove(key);
                true
            }
            CategoryKind::Builtin(_) => {
                warn!("remove_column on built-in '{}', use hide_builtin_column", key);
                false
            }
        }
    }

    /// Display-label override; the storage key never changes.
    pub fn rename_column(&mut self, key: &str, label: &str) -> bool {
        if !self.is_live(key) {
            warn!("rename_column on unknown column '{}', ignoring", key);
            return false;
        }
        self.label_overrides
            .insert(key.to_string(), label.to_string());
        true
    }

    pub fn custom_keys(&self) -> impl Iterator<Item = &str> {
        self.custom_labels.keys().map(String::as_str)
    }

    /// Live column keys in a stable order: built-ins in canonical order,
    /// then custom columns sorted by key. Export and counting iterate this
    /// so their output is deterministic.
    pub fn ordered_keys(&self) -> Vec<String> {
        let builtins = BuiltinCategory::ALL
            .iter()
            .filter(|b| !self.hidden.contains(b))
            .map(|b| b.key().to_string());
        let customs = self.custom_keys().map(String::from).sorted();
        builtins.chain(customs).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_places_all_builtins() {
        let layout = ColumnLayout::default();
        for builtin in BuiltinCategory::ALL {
            assert!(layout.position_of(builtin.key()).is_some());
            assert!(layout.is_live(builtin.key()));
        }
        assert_eq!(
            layout.option_of("sideboard"),
            ColumnOption::Sideboard
        );
        assert_eq!(layout.option_of("creatures"), ColumnOption::StartsInDeck);
    }

    #[test]
    fn add_and_place_custom_column() {
        let mut layout = ColumnLayout::default();
        let key = layout.add_column("Ramp");
        assert!(layout.is_live(&key));
        assert!(layout.position_of(&key).is_none());
        assert!(layout.place_column(&key, 2, 0));
        assert_eq!(layout.position_of(&key), Some(GridPosition { row: 2, col: 0 }));
        assert_eq!(layout.label_of(&key), "Ramp");
    }

    #[test]
    fn place_refuses_occupied_cell() {
        let mut layout = ColumnLayout::default();
        let key = layout.add_column("Ramp");
        // (0, 0) holds creatures in the default layout
        assert!(!layout.place_column(&key, 0, 0));
        assert!(layout.position_of(&key).is_none());
    }

    #[test]
    fn swap_is_its_own_inverse() {
        let mut layout = ColumnLayout::default();
        let creatures = layout.position_of("creatures").unwrap();
        let lands = layout.position_of("lands").unwrap();

        assert!(layout.swap_columns("creatures", "lands"));
        assert_eq!(layout.position_of("creatures"), Some(lands));
        assert_eq!(layout.position_of("lands"), Some(creatures));

        assert!(layout.swap_columns("creatures", "lands"));
        assert_eq!(layout.position_of("creatures"), Some(creatures));
        assert_eq!(layout.position_of("lands"), Some(lands));
    }

    #[test]
    fn swap_requires_both_positions() {
        let mut layout = ColumnLayout::default();
        let unplaced = layout.add_column("Ramp");
        assert!(!layout.swap_columns("creatures", &unplaced));
        assert!(layout.position_of("creatures").is_some());
    }

    #[test]
    fn hide_and_restore_builtin() {
        let mut layout = ColumnLayout::default();
        assert!(layout.hide_builtin_column("enchantments"));
        assert!(!layout.is_live("enchantments"));
        assert!(layout.position_of("enchantments").is_none());

        // Hidden keys are not restorable twice and not hideable twice
        assert!(!layout.hide_builtin_column("enchantments"));

        assert!(layout.restore_builtin_column("enchantments", 3, 1));
        assert!(layout.is_live("enchantments"));
        assert_eq!(
            layout.position_of("enchantments"),
            Some(GridPosition { row: 3, col: 1 })
        );
    }

    #[test]
    fn remove_column_is_custom_only() {
        let mut layout = ColumnLayout::default();
        assert!(!layout.remove_column("creatures"));
        assert!(layout.is_live("creatures"));

        let key = layout.add_column("Ramp");
        layout.place_column(&key, 2, 2);
        assert!(layout.remove_column(&key));
        assert!(!layout.is_live(&key));
        assert!(layout.position_of(&key).is_none());
    }

    #[test]
    fn rename_keeps_storage_key() {
        let mut layout = ColumnLayout::default();
        assert!(layout.rename_column("creatures", "Dorks"));
        assert_eq!(layout.label_of("creatures"), "Dorks");
        assert!(layout.is_live("creatures"));
    }

    #[test]
    fn ordered_keys_are_stable() {
        let mut layout = ColumnLayout::default();
        let a = layout.add_column("A");
        let b = layout.add_column("B");
        let mut expected: Vec<String> = BuiltinCategory::ALL
            .iter()
            .map(|b| b.key().to_string())
            .collect();
        let mut customs = vec![a, b];
        customs.sort();
        expected.extend(customs);
        assert_eq!(layout.ordered_keys(), expected);
    }
}
