use crate::deck::{ColumnLayout, DeckState};
use crate::error::DeckError;
use crate::source::CardSource;
use log::warn;
use serde::{Deserialize, Serialize};

const DESCRIPTION_VERSION: u32 = 1;

/// One card row on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckCardPayload {
    pub card_id: String,
    pub quantity: u32,
    pub category: String,
}

/// The deck shape accepted and returned by the persistence backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub format: String,
    pub is_public: bool,
    pub cards: Vec<DeckCardPayload>,
}

/// The backend's `description` field doubles as the carrier for the column
/// layout: a versioned JSON envelope wrapping the user's own text. Legacy
/// decks hold plain text there; anything that does not parse as a
/// supported envelope migrates as legacy on load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DescriptionEnvelope {
    version: u32,
    user_description: String,
    column_structure: ColumnLayout,
}

pub fn encode_description(
    user_description: &str,
    layout: &ColumnLayout,
) -> Result<String, DeckError> {
    let envelope = DescriptionEnvelope {
        version: DESCRIPTION_VERSION,
        user_description: user_description.to_string(),
        column_structure: layout.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes a stored description into the user's text and the column layout.
/// Plain-text (legacy) descriptions and unknown envelope versions fall back
/// to the raw text with a default layout.
pub fn decode_description(raw: &str) -> (String, ColumnLayout) {
    match serde_json::from_str::<DescriptionEnvelope>(raw) {
        Ok(envelope) if envelope.version == DESCRIPTION_VERSION => {
            (envelope.user_description, envelope.column_structure)
        }
        Ok(envelope) => {
            warn!(
                "description envelope has unsupported version {}, treating as legacy",
                envelope.version
            );
            (raw.to_string(), ColumnLayout::default())
        }
        Err(_) => (raw.to_string(), ColumnLayout::default()),
    }
}

/// Flattens the editor state into the wire shape.
pub fn to_payload(
    deck: &DeckState,
    layout: &ColumnLayout,
    id: Option<String>,
    is_public: bool,
) -> Result<DeckPayload, DeckError> {
    let mut cards = Vec::new();
    for key in layout.ordered_keys() {
        for entry in deck.entries(&key) {
            cards.push(DeckCardPayload {
                card_id: entry.card.id.clone(),
                quantity: entry.quantity,
                category: entry.category.clone(),
            });
        }
    }
    Ok(DeckPayload {
        id,
        name: deck.name.clone(),
        description: encode_description(&deck.description, layout)?,
        format: deck.format.clone(),
        is_public,
        cards,
    })
}

/// Rebuilds editor state from a stored deck, resolving each card id
/// through the card source. Unresolvable ids are skipped with a warning;
/// hydration never fails as a whole over bad rows.
pub async fn hydrate_deck<S: CardSource>(
    payload: &DeckPayload,
    source: &S,
) -> (DeckState, ColumnLayout) {
    let (user_description, layout) = decode_description(&payload.description);

    let mut deck = DeckState::new();
    deck.name = payload.name.clone();
    deck.description = user_description;
    deck.format = payload.format.clone();
    for key in layout.custom_keys() {
        deck.ensure_category(key);
    }

    for row in &payload.cards {
        if !deck.has_category(&row.category) {
            warn!(
                "stored deck references unknown category '{}', keeping it",
                row.category
            );
            deck.ensure_category(&row.category);
        }
        match source.find_by_id(&row.card_id).await {
            Ok(Some(card)) => {
                if let Some(entry_id) = deck.add_card(card, Some(&row.category)) {
                    deck.set_quantity(&entry_id, &row.category, row.quantity);
                }
            }
            Ok(None) => {
                warn!("card id '{}' no longer resolves, skipping row", row.card_id);
            }
            Err(e) => {
                warn!("failed to resolve card id '{}': {}, skipping row", row.card_id, e);
            }
        }
    }

    (deck, layout)
}

#[derive(Deserialize, Debug)]
struct SavedDeckResponse {
    id: String,
}

/// Client for the deck persistence backend. A rejected save is surfaced as
/// an error for the caller to present; unlike draft storage this is the
/// user's durable copy.
#[derive(Debug)]
pub struct DeckApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl DeckApiClient {
    pub fn new(base_url: &str) -> Result<Self, DeckError> {
        let client = reqwest::Client::builder().build()?;
        Ok(DeckApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn create_deck(&self, payload: &DeckPayload) -> Result<String, DeckError> {
        let url = format!("{}/api/decks", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(DeckError::Api(format!(
                "deck save rejected with status {}",
                response.status()
            )));
        }
        let saved: SavedDeckResponse = response.json().await?;
        Ok(saved.id)
    }

    pub async fn update_deck(&self, payload: &DeckPayload) -> Result<String, DeckError> {
        if payload.id.is_none() {
            return Err(DeckError::Api(
                "update_deck requires a deck id".to_string(),
            ));
        }
        let url = format!("{}/api/decks", self.base_url);
        let response = self.client.put(&url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(DeckError::Api(format!(
                "deck update rejected with status {}",
                response.status()
            )));
        }
        let saved: SavedDeckResponse = response.json().await?;
        Ok(saved.id)
    }

    pub async fn get_deck(&self, id: &str) -> Result<DeckPayload, DeckError> {
        let url = format!("{}/api/decks/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DeckError::Api(format!(
                "deck fetch failed with status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scryfall::CardReference;
    use std::collections::HashMap;

    fn card(id: &str, name: &str, type_line: &str) -> CardReference {
        CardReference {
            id: id.to_string(),
            name: name.to_string(),
            mana_cost: None,
            type_line: type_line.to_string(),
            set: "lea".to_string(),
            collector_number: "1".to_string(),
            rarity: "common".to_string(),
            image_url: None,
            image_url_back: None,
            price_usd: None,
        }
    }

    struct FakeSource {
        by_id: HashMap<String, CardReference>,
    }

    impl FakeSource {
        fn new(cards: &[CardReference]) -> FakeSource {
            FakeSource {
                by_id: cards.iter().map(|c| (c.id.clone(), c.clone())).collect(),
            }
        }
    }

    impl CardSource for FakeSource {
        async fn find_by_name(
            &self,
            name: &str,
            _set: Option<&str>,
        ) -> Result<Option<CardReference>, DeckError> {
            Ok(self.by_id.values().find(|c| c.name == name).cloned())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<CardReference>, DeckError> {
            Ok(self.by_id.get(id).cloned())
        }
    }

    #[test]
    fn description_envelope_round_trips() {
        let mut layout = ColumnLayout::default();
        let ramp = layout.add_column("Ramp");
        layout.place_column(&ramp, 2, 0);
        layout.hide_builtin_column("enchantments");

        let encoded = encode_description("my burn deck", &layout).unwrap();
        let (text, decoded) = decode_description(&encoded);
        assert_eq!(text, "my burn deck");
        assert_eq!(decoded, layout);
    }

    #[test]
    fn legacy_plain_text_description_migrates() {
        let (text, layout) = decode_description("just an old deck about goblins");
        assert_eq!(text, "just an old deck about goblins");
        assert_eq!(layout, ColumnLayout::default());
    }

    #[test]
    fn legacy_json_without_expected_keys_migrates() {
        let raw = r#"{"some": "other json"}"#;
        let (text, layout) = decode_description(raw);
        assert_eq!(text, raw);
        assert_eq!(layout, ColumnLayout::default());
    }

    #[test]
    fn payload_serializes_camel_case() {
        let payload = DeckPayload {
            id: None,
            name: "Burn".to_string(),
            description: "d".to_string(),
            format: "modern".to_string(),
            is_public: true,
            cards: vec![DeckCardPayload {
                card_id: "bolt".to_string(),
                quantity: 4,
                category: "spells".to_string(),
            }],
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"isPublic\":true"));
        assert!(json.contains("\"cardId\":\"bolt\""));
        assert!(!json.contains("\"id\""));
    }

    #[tokio::test]
    async fn payload_round_trips_through_hydration() {
        let bolt = card("bolt", "Lightning Bolt", "Instant");
        let bears = card("bears", "Grizzly Bears", "Creature — Bear");
        let source = FakeSource::new(&[bolt.clone(), bears.clone()]);

        let mut deck = DeckState::new();
        deck.name = "Test".to_string();
        deck.description = "hello".to_string();
        deck.format = "legacy".to_string();
        let layout = ColumnLayout::default();
        let id = deck.add_card(bolt, None).unwrap();
        deck.set_quantity(&id, "spells", 4);
        deck.add_card(bears, None);

        let payload = to_payload(&deck, &layout, None, false).unwrap();
        let (hydrated, hydrated_layout) = hydrate_deck(&payload, &source).await;

        assert_eq!(hydrated.name, "Test");
        assert_eq!(hydrated.description, "hello");
        assert_eq!(hydrated.entries("spells")[0].quantity, 4);
        assert_eq!(hydrated.entries("creatures")[0].card.name, "Grizzly Bears");
        assert_eq!(hydrated_layout, layout);
    }

    #[tokio::test]
    async fn unresolvable_card_ids_are_skipped() {
        let source = FakeSource::new(&[card("bolt", "Lightning Bolt", "Instant")]);
        let payload = DeckPayload {
            id: Some("deck-1".to_string()),
            name: "Partial".to_string(),
            description: String::new(),
            format: String::new(),
            is_public: false,
            cards: vec![
                DeckCardPayload {
                    card_id: "bolt".to_string(),
                    quantity: 2,
                    category: "spells".to_string(),
                },
                DeckCardPayload {
                    card_id: "gone".to_string(),
                    quantity: 3,
                    category: "spells".to_string(),
                },
            ],
        };
        let (deck, _) = hydrate_deck(&payload, &source).await;
        assert_eq!(deck.entries("spells").len(), 1);
        assert_eq!(deck.entries("spells")[0].quantity, 2);
    }
}
