//! Error types shared by the store, the review session and the import/export code.

use thiserror::Error;

/// Failures at the persistence boundary and in deck management.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("deck '{0}' not found")]
    DeckNotFound(String),

    #[error("card '{card_id}' not found in deck '{deck_id}'")]
    CardNotFound { deck_id: String, card_id: String },

    /// A required text field was empty after trimming.
    #[error("{0}")]
    Validation(String),
}

/// Misuse of the review session, or a failed write-back after a response.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The requested deck does not exist; the session cannot start.
    #[error("deck '{0}' not found")]
    DeckNotFound(String),

    /// `respond` (or a card edit) was called with no card showing.
    /// The session is left unchanged.
    #[error("no card is currently under review")]
    NoCurrentCard,

    /// The in-memory update was applied but writing it back failed.
    #[error("failed to persist review: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("deck '{0}' already exists, rename it in the JSON file")]
    DuplicateDeck(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
