//! JSON import/export module for flashcard decks.
//! Saves a single Deck, scheduling state included, to a file and loads it back.

use crate::database::CardStore;
use crate::error::{ExportError, StoreError};
use crate::models::Deck;
use std::fs;
use std::path::Path;

/// Exports a deck to a JSON file at the specified path.
pub fn export_json_to_path(deck: &Deck, path: &Path) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(deck)?;
    fs::write(path, json_string)?;
    tracing::info!(deck = %deck.name, path = %path.display(), "deck exported");
    Ok(())
}

/// Reads a deck from a JSON file.
/// Missing card fields get their defaults, so hand-written files only need
/// `name` and each card's `question` and `answer`.
pub fn import_json(path: &Path) -> Result<Deck, ExportError> {
    let contents = fs::read_to_string(path)?;
    let deck: Deck = serde_json::from_str(&contents)?;
    tracing::info!(deck = %deck.name, path = %path.display(), "deck read from file");
    Ok(deck)
}

/// Reads a deck file and adds it to the store, returning the new deck id.
pub fn import_into(store: &mut CardStore, path: &Path) -> Result<String, ExportError> {
    let deck = import_json(path)?;
    let name = deck.name.clone();
    store.import_deck(deck).map_err(|e| match e {
        StoreError::Validation(_) => ExportError::DuplicateDeck(name),
        other => ExportError::Store(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::{Card, CardId};
    use chrono::Utc;

    fn create_test_deck() -> Deck {
        let now = Utc::now();
        let mut deck = Deck::new("Test Deck", "greetings");
        deck.cards = vec![
            Card::new(CardId::Number(1), "hello", "cześć", now),
            Card::new(CardId::fresh(), "goodbye", "do widzenia", now),
        ];
        deck.cards[1].level = 3;
        deck.cards[1].notes = "formal".to_string();
        deck
    }

    #[test]
    fn test_export_json_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");

        export_json_to_path(&create_test_deck(), &path).unwrap();

        assert!(path.exists(), "File should exist");
    }

    #[test]
    fn test_import_json() {
        let json_content = r#"{
  "name": "Import Test Deck",
  "cards": [
    {
      "question": "test question",
      "answer": "test answer"
    }
  ]
}"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        fs::write(&path, json_content).unwrap();

        let deck = import_json(&path).unwrap();
        assert_eq!(deck.name, "Import Test Deck");
        assert!(!deck.id.is_empty());
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].question, "test question");
        assert_eq!(deck.cards[0].level, 0);
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.json");
        let original_deck = create_test_deck();

        export_json_to_path(&original_deck, &path).unwrap();
        let imported_deck = import_json(&path).unwrap();

        assert_eq!(original_deck, imported_deck);
    }

    #[test]
    fn test_import_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        export_json_to_path(&create_test_deck(), &path).unwrap();

        let mut store = CardStore::load(MemoryStore::new(), Utc::now());
        let id = import_into(&mut store, &path).unwrap();
        assert_eq!(store.deck(&id).unwrap().cards.len(), 2);
        assert_eq!(store.stats().total_cards, 12);

        assert!(matches!(
            import_into(&mut store, &path),
            Err(ExportError::DuplicateDeck(name)) if name == "Test Deck"
        ));
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json(Path::new("nonexistent_file_xyz123.json"));
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_json(&path), Err(ExportError::Json(_))));
    }
}
