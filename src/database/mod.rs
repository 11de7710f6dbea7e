pub mod card_store;
pub mod db;
pub mod seed;

pub use card_store::CardStore;
pub use db::{KeyValueStore, MemoryStore, SqliteStore};
