use serde::{Deserialize, Serialize};

/// The fixed set of built-in deck columns. Their keys are stable storage
/// identifiers; display labels can be overridden per column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinCategory {
    Creatures,
    Spells,
    Artifacts,
    Enchantments,
    Lands,
    Sideboard,
}

impl BuiltinCategory {
    pub const ALL: [BuiltinCategory; 6] = [
        BuiltinCategory::Creatures,
        BuiltinCategory::Spells,
        BuiltinCategory::Artifacts,
        BuiltinCategory::Enchantments,
        BuiltinCategory::Lands,
        BuiltinCategory::Sideboard,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BuiltinCategory::Creatures => "creatures",
            BuiltinCategory::Spells => "spells",
            BuiltinCategory::Artifacts => "artifacts",
            BuiltinCategory::Enchantments => "enchantments",
            BuiltinCategory::Lands => "lands",
            BuiltinCategory::Sideboard => "sideboard",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BuiltinCategory::Creatures => "Creatures",
            BuiltinCategory::Spells => "Spells",
            BuiltinCategory::Artifacts => "Artifacts",
            BuiltinCategory::Enchantments => "Enchantments",
            BuiltinCategory::Lands => "Lands",
            BuiltinCategory::Sideboard => "Sideboard",
        }
    }

    pub fn from_key(key: &str) -> Option<BuiltinCategory> {
        BuiltinCategory::ALL.into_iter().find(|b| b.key() == key)
    }

    /// Default column for a card, from its type line.
    ///
    /// The substring checks run in the fixed order creature -> artifact ->
    /// enchantment -> land -> spells, so "Artifact Creature" lands in
    /// creatures. The ordering is a product decision and must not change.
    pub fn derive_from_type_line(type_line: &str) -> BuiltinCategory {
        let lower = type_line.to_lowercase();
        if lower.contains("creature") {
            BuiltinCategory::Creatures
        } else if lower.contains("artifact") {
            BuiltinCategory::Artifacts
        } else if lower.contains("enchantment") {
            BuiltinCategory::Enchantments
        } else if lower.contains("land") {
            BuiltinCategory::Lands
        } else {
            BuiltinCategory::Spells
        }
    }
}

/// Whether a category key names a built-in column or a user-created one.
/// Carried explicitly so move/delete logic can branch exhaustively instead
/// of inferring kind from map membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Builtin(BuiltinCategory),
    Custom,
}

pub fn kind_of(key: &str) -> CategoryKind {
    match BuiltinCategory::from_key(key) {
        Some(builtin) => CategoryKind::Builtin(builtin),
        None => CategoryKind::Custom,
    }
}

/// Per-column flag used only to bucket cards for counting and export.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOption {
    #[default]
    StartsInDeck,
    StartsInExtra,
    StartsInHand,
    StartsInPlay {
        face_down: bool,
    },
    Sideboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckBucket {
    Mainboard,
    Sideboard,
    Extra,
}

impl DeckBucket {
    pub fn display_name(&self) -> &'static str {
        match self {
            DeckBucket::Mainboard => "Mainboard",
            DeckBucket::Sideboard => "Sideboard",
            DeckBucket::Extra => "Extra",
        }
    }
}

impl ColumnOption {
    pub fn bucket(&self) -> DeckBucket {
        match self {
            ColumnOption::Sideboard => DeckBucket::Sideboard,
            ColumnOption::StartsInExtra => DeckBucket::Extra,
            _ => DeckBucket::Mainboard,
        }
    }
}
