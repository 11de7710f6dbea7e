pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use database::{CardStore, KeyValueStore, MemoryStore, SqliteStore};
pub use error::{SessionError, StoreError};
pub use models::{Card, CardId, CardRef, Deck, DeckSet, ReviewSession, Stats};
