use std::fmt;

#[derive(Debug)]
pub enum DeckError {
    Network(reqwest::Error),
    Json(serde_json::Error),
    Api(String),
    Storage(String),
    InvalidCard(String),
    Io(std::io::Error),
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::Network(e) => write!(f, "Network error: {}", e),
            DeckError::Json(e) => write!(f, "JSON parsing error: {}", e),
            DeckError::Api(e) => write!(f, "API error: {}", e),
            DeckError::Storage(e) => write!(f, "Storage error: {}", e),
            DeckError::InvalidCard(e) => write!(f, "Invalid card: {}", e),
            DeckError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for DeckError {}

impl From<reqwest::Error> for DeckError {
    fn from(err: reqwest::Error) -> Self {
        DeckError::Network(err)
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        DeckError::Json(err)
    }
}

impl From<std::io::Error> for DeckError {
    fn from(err: std::io::Error) -> Self {
        DeckError::Io(err)
    }
}
