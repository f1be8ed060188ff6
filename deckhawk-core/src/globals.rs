use crate::scryfall::ScryfallClient;
use std::sync::OnceLock;

// Single shared client so every call site goes through the same rate limit
static SCRYFALL_CLIENT: OnceLock<ScryfallClient> = OnceLock::new();

pub fn get_scryfall_client() -> &'static ScryfallClient {
    SCRYFALL_CLIENT.get_or_init(|| ScryfallClient::new().expect("Failed to create ScryfallClient"))
}
