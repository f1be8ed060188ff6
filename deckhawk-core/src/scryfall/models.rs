use crate::error::DeckError;
use serde::{Deserialize, Serialize};

/// The subset of a Scryfall card object the deck builder actually touches.
/// Immutable once fetched; entries hold these by value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardReference {
    pub id: String,
    pub name: String,
    pub mana_cost: Option<String>,
    pub type_line: String,
    pub set: String,
    pub collector_number: String,
    pub rarity: String,
    pub image_url: Option<String>,
    pub image_url_back: Option<String>,
    pub price_usd: Option<f64>,
}

impl CardReference {
    pub fn from_scryfall_object(
        d: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<CardReference, DeckError> {
        let id = d["id"]
            .as_str()
            .ok_or_else(|| DeckError::InvalidCard("Missing id field".to_string()))?
            .to_string();

        let name = d["name"]
            .as_str()
            .ok_or_else(|| DeckError::InvalidCard("Missing name field".to_string()))?
            .to_string();

        let set = d["set"]
            .as_str()
            .ok_or_else(|| DeckError::InvalidCard("Missing set field".to_string()))?
            .to_lowercase();

        let collector_number = d["collector_number"].as_str().unwrap_or("").to_string();
        let rarity = d["rarity"].as_str().unwrap_or("").to_string();

        // Single-faced cards carry type_line/mana_cost at the top level;
        // double-faced cards only on their faces.
        let faces = d.get("card_faces").and_then(|v| v.as_array());

        let type_line = match d.get("type_line").and_then(|v| v.as_str()) {
            Some(t) => t.to_string(),
            None => faces
                .and_then(|f| f.first())
                .and_then(|f| f["type_line"].as_str())
                .ok_or_else(|| DeckError::InvalidCard("Missing type_line field".to_string()))?
                .to_string(),
        };

        let mana_cost = d
            .get("mana_cost")
            .and_then(|v| v.as_str())
            .or_else(|| {
                faces
                    .and_then(|f| f.first())
                    .and_then(|f| f["mana_cost"].as_str())
            })
            .map(String::from);

        let (image_url, image_url_back) = if d.contains_key("image_uris") {
            let front = d["image_uris"]["normal"].as_str().map(String::from);
            (front, None)
        } else if let Some(faces) = faces {
            let front = faces
                .first()
                .and_then(|f| f["image_uris"]["normal"].as_str())
                .map(String::from);
            let back = faces
                .get(1)
                .and_then(|f| f["image_uris"]["normal"].as_str())
                .map(String::from);
            (front, back)
        } else {
            (None, None)
        };

        let price_usd = d
            .get("prices")
            .and_then(|p| p["usd"].as_str())
            .and_then(|s| s.parse::<f64>().ok());

        Ok(CardReference {
            id,
            name,
            mana_cost,
            type_line,
            set,
            collector_number,
            rarity,
            image_url,
            image_url_back,
            price_usd,
        })
    }

    /// Display name of the front face only ("Cut // Ribbons" -> "Cut").
    pub fn front_face_name(&self) -> &str {
        match self.name.split_once(" // ") {
            Some((front, _)) => front,
            None => &self.name,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SetReference {
    pub code: String,
    pub name: String,
    pub card_count: u32,
    pub released_at: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ScryfallSearchAnswer {
    pub object: String,
    pub total_cards: i32,
    pub has_more: bool,
    pub next_page: Option<String>,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Serialize, Deserialize)]
pub struct ScryfallSetsResponse {
    pub data: Vec<SetReference>,
}

#[derive(Debug, Clone)]
pub struct CardSearchResult {
    pub cards: Vec<CardReference>,
    pub total_cards: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(json: &str) -> serde_json::Map<String, serde_json::Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_single_faced_card_parsing() {
        let bolt = object(
            r#"{
                "id": "ce711943-c1a1-43a0-8b89-8d169cfb8e06",
                "name": "Lightning Bolt",
                "mana_cost": "{R}",
                "type_line": "Instant",
                "set": "LEB",
                "collector_number": "162",
                "rarity": "common",
                "image_uris": {"normal": "https://cards.example/bolt.jpg"},
                "prices": {"usd": "429.99", "usd_foil": null}
            }"#,
        );
        let card = CardReference::from_scryfall_object(&bolt).unwrap();
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.set, "leb");
        assert_eq!(card.type_line, "Instant");
        assert_eq!(card.mana_cost.as_deref(), Some("{R}"));
        assert_eq!(card.image_url.as_deref(), Some("https://cards.example/bolt.jpg"));
        assert!(card.image_url_back.is_none());
        assert_eq!(card.price_usd, Some(429.99));
    }

    #[test]
    fn test_double_faced_card_parsing() {
        let delver = object(
            r#"{
                "id": "11bf83bb-c95b-4b4f-9a56-ce7a1816307a",
                "name": "Delver of Secrets // Insectile Aberration",
                "set": "isd",
                "collector_number": "51",
                "rarity": "common",
                "card_faces": [
                    {"name": "Delver of Secrets", "mana_cost": "{U}", "type_line": "Creature — Human Wizard", "image_uris": {"normal": "https://cards.example/delver-front.jpg"}},
                    {"name": "Insectile Aberration", "mana_cost": "", "type_line": "Creature — Human Insect", "image_uris": {"normal": "https://cards.example/delver-back.jpg"}}
                ],
                "prices": {"usd": null}
            }"#,
        );
        let card = CardReference::from_scryfall_object(&delver).unwrap();
        assert_eq!(card.type_line, "Creature — Human Wizard");
        assert_eq!(card.front_face_name(), "Delver of Secrets");
        assert_eq!(
            card.image_url_back.as_deref(),
            Some("https://cards.example/delver-back.jpg")
        );
        assert!(card.price_usd.is_none());
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let broken = object(r#"{"id": "x", "set": "leb"}"#);
        assert!(CardReference::from_scryfall_object(&broken).is_err());
    }
}
