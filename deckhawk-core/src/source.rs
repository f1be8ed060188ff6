use crate::error::DeckError;
use crate::scryfall::CardReference;

/// Lookup seam between the deck model and the card-data service.
///
/// The decklist importer and deck hydration only ever need these two
/// resolutions, so tests can substitute an in-memory fake and the rest of
/// the crate stays independent of the network.
pub trait CardSource {
    /// Exact-name lookup, optionally constrained to a set code.
    /// `Ok(None)` means the name (or name-in-set) does not exist.
    async fn find_by_name(
        &self,
        name: &str,
        set: Option<&str>,
    ) -> Result<Option<CardReference>, DeckError>;

    /// Lookup by the card's opaque id.
    async fn find_by_id(&self, id: &str) -> Result<Option<CardReference>, DeckError>;
}
