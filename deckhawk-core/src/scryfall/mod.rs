pub mod api;
pub mod client;
pub mod models;

pub use client::ScryfallClient;
pub use models::{CardReference, CardSearchResult, ScryfallSearchAnswer, SetReference};
