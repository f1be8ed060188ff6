use crate::scryfall::CardReference;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One placement of a card in one category. The id is unique per placement:
/// it is minted on insert and re-minted whenever the entry changes category,
/// so two live entries can never collide even under rapid same-frame
/// operations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeckEntry {
    pub id: String,
    pub card: CardReference,
    pub quantity: u32,
    pub category: String,
}

impl DeckEntry {
    pub fn new(card: CardReference, category: &str) -> DeckEntry {
        DeckEntry {
            id: mint_entry_id(),
            card,
            quantity: 1,
            category: category.to_string(),
        }
    }
}

pub fn mint_entry_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_card() -> CardReference {
        CardReference {
            id: "abc".to_string(),
            name: "Grizzly Bears".to_string(),
            mana_cost: Some("{1}{G}".to_string()),
            type_line: "Creature — Bear".to_string(),
            set: "lea".to_string(),
            collector_number: "200".to_string(),
            rarity: "common".to_string(),
            image_url: None,
            image_url_back: None,
            price_usd: None,
        }
    }

    #[test]
    fn minted_ids_are_unique() {
        let a = DeckEntry::new(test_card(), "creatures");
        let b = DeckEntry::new(test_card(), "creatures");
        assert_ne!(a.id, b.id);
        assert_eq!(a.quantity, 1);
    }
}
