use super::{client::ScryfallClient, models::*};
use crate::error::DeckError;
use crate::source::CardSource;
use log::info;

const SCRYFALL_SEARCH: &str = "https://api.scryfall.com/cards/search";
const SCRYFALL_NAMED: &str = "https://api.scryfall.com/cards/named";
const SCRYFALL_RANDOM: &str = "https://api.scryfall.com/cards/random";
const SCRYFALL_CARDS: &str = "https://api.scryfall.com/cards";
const SCRYFALL_SETS: &str = "https://api.scryfall.com/sets";

impl ScryfallClient {
    /// Free-text card search, first page only.
    pub async fn search_cards(&self, query: &str) -> Result<CardSearchResult, DeckError> {
        let uri = format!("{}?q={}", SCRYFALL_SEARCH, encode_query(query));
        self.search_page(&uri).await
    }

    pub async fn get_all_sets(&self) -> Result<Vec<SetReference>, DeckError> {
        let response = self.call(SCRYFALL_SETS).await?;
        let sets: ScryfallSetsResponse = response.json().await?;
        Ok(sets.data)
    }

    /// One page of cards from a set, in collector-number order.
    pub async fn get_cards_from_set(&self, code: &str) -> Result<CardSearchResult, DeckError> {
        let uri = format!(
            "{}?order=set&q=e%3A{}&unique=prints",
            SCRYFALL_SEARCH,
            encode_query(code)
        );
        self.search_page(&uri).await
    }

    /// Every card from a set, following pagination to the end.
    pub async fn get_all_cards_from_set(&self, code: &str) -> Result<CardSearchResult, DeckError> {
        let mut uri = format!(
            "{}?order=set&q=e%3A{}&unique=prints",
            SCRYFALL_SEARCH,
            encode_query(code)
        );
        let mut cards = Vec::new();
        let mut total_cards = 0;

        loop {
            let response = self.call(&uri).await?;
            let answer: ScryfallSearchAnswer = response.json().await?;
            total_cards = answer.total_cards.max(0) as usize;
            collect_cards(answer.data, &mut cards);

            match answer.next_page {
                Some(next) if answer.has_more => uri = next,
                _ => break,
            }
        }

        Ok(CardSearchResult { cards, total_cards })
    }

    /// All printings of a card name, for the variant picker.
    pub async fn get_card_variants(&self, name: &str) -> Result<CardSearchResult, DeckError> {
        let uri = format!(
            "{}?q=!%22{}%22&unique=prints",
            SCRYFALL_SEARCH,
            encode_query(name)
        );
        self.search_page(&uri).await
    }

    pub async fn get_random_card(&self) -> Result<CardReference, DeckError> {
        let response = self.call(SCRYFALL_RANDOM).await?;
        let object: serde_json::Map<String, serde_json::Value> = response.json().await?;
        CardReference::from_scryfall_object(&object)
    }

    pub async fn get_card(&self, id: &str) -> Result<Option<CardReference>, DeckError> {
        let uri = format!("{}/{}", SCRYFALL_CARDS, id);
        let response = self.call(&uri).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let object: serde_json::Map<String, serde_json::Value> = response.json().await?;
        CardReference::from_scryfall_object(&object).map(Some)
    }

    /// Exact-name lookup, optionally pinned to a set. 404 means "no such card".
    pub async fn named_exact(
        &self,
        name: &str,
        set: Option<&str>,
    ) -> Result<Option<CardReference>, DeckError> {
        let mut uri = format!("{}?exact={}", SCRYFALL_NAMED, encode_query(name));
        if let Some(code) = set {
            uri.push_str("&set=");
            uri.push_str(&encode_query(code));
        }

        let response = self.call(&uri).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DeckError::Api(format!(
                "Scryfall returned {} for named lookup",
                response.status()
            )));
        }
        let object: serde_json::Map<String, serde_json::Value> = response.json().await?;
        CardReference::from_scryfall_object(&object).map(Some)
    }

    async fn search_page(&self, uri: &str) -> Result<CardSearchResult, DeckError> {
        let response = self.call(uri).await?;

        match response.json::<ScryfallSearchAnswer>().await {
            Ok(answer) => {
                let mut cards = Vec::new();
                let total_cards = answer.total_cards.max(0) as usize;
                collect_cards(answer.data, &mut cards);
                Ok(CardSearchResult { cards, total_cards })
            }
            Err(e) => {
                info!("Error deserializing Scryfall search: {}", e);
                Err(DeckError::Network(e))
            }
        }
    }
}

impl CardSource for ScryfallClient {
    async fn find_by_name(
        &self,
        name: &str,
        set: Option<&str>,
    ) -> Result<Option<CardReference>, DeckError> {
        self.named_exact(name, set).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CardReference>, DeckError> {
        self.get_card(id).await
    }
}

fn collect_cards(
    data: Vec<serde_json::Map<String, serde_json::Value>>,
    cards: &mut Vec<CardReference>,
) {
    for card_data in data {
        match CardReference::from_scryfall_object(&card_data) {
            Ok(card) => cards.push(card),
            Err(e) => {
                info!("Skipping invalid card: {}", e);
                continue;
            }
        }
    }
}

fn encode_query(raw: &str) -> String {
    raw.replace(' ', "+").replace("//", "")
}
