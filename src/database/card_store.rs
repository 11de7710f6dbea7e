//! Canonical in-memory decks and stats, flushed whole to a [`KeyValueStore`].
//!
//! Reads never fail: a missing or unparsable document is replaced by the seed
//! decks (or zeroed stats) and the replacement is written back. Every mutation
//! goes through a method here, and callers flush the full snapshot afterwards.

use super::db::{DECKS_KEY, KeyValueStore, STATS_KEY};
use super::seed::default_decks;
use crate::error::StoreError;
use crate::models::{Card, CardId, CardRef, Deck, DeckSet, Stats};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

pub struct CardStore {
    backend: Box<dyn KeyValueStore>,
    decks: DeckSet,
    stats: Stats,
}

/// Reads and parses one document. `None` means absent, unreadable or corrupt.
fn read_document<T: DeserializeOwned>(backend: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored document, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored document is corrupt, using defaults");
            None
        }
    }
}

fn required(value: &str, what: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{what} is required")));
    }
    Ok(trimmed.to_string())
}

impl CardStore {
    /// Loads both documents, synthesizing seed decks and zeroed stats as needed.
    pub fn load(backend: impl KeyValueStore + 'static, now: DateTime<Utc>) -> Self {
        let backend: Box<dyn KeyValueStore> = Box::new(backend);

        let (mut decks, seeded) = match read_document::<DeckSet>(backend.as_ref(), DECKS_KEY) {
            Some(decks) => (decks, false),
            None => {
                tracing::info!("no usable decks stored, writing seed decks");
                (default_decks(now), true)
            }
        };

        let clamped = decks
            .decks
            .iter_mut()
            .flat_map(|d| d.cards.iter_mut())
            .map(Card::clamp_level)
            .filter(|&changed| changed)
            .count();
        if clamped > 0 {
            tracing::warn!(clamped, "stored card levels were out of range");
        }
        let renamed: usize = decks.decks.iter_mut().map(Deck::dedupe_card_ids).sum();
        if renamed > 0 {
            tracing::warn!(renamed, "stored decks repeated card ids, reassigned");
        }

        let mut stats = read_document::<Stats>(backend.as_ref(), STATS_KEY).unwrap_or_default();
        stats.set_total_cards(decks.total_cards() as u32);

        let mut store = Self {
            backend,
            decks,
            stats,
        };
        if seeded {
            if let Err(e) = store.flush() {
                tracing::error!(error = %e, "failed to write seed data");
            }
        }
        tracing::info!(
            decks = store.decks.decks.len(),
            cards = store.decks.total_cards(),
            "card store loaded"
        );
        store
    }

    /// Writes the complete decks and stats documents.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let decks = serde_json::to_string(&self.decks)?;
        let stats = serde_json::to_string(&self.stats)?;
        self.backend.set_all(&[(DECKS_KEY, decks), (STATS_KEY, stats)])
    }

    pub fn decks(&self) -> &DeckSet {
        &self.decks
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn deck(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.find(deck_id)
    }

    pub fn card(&self, card_ref: &CardRef) -> Option<&Card> {
        self.decks.card(card_ref)
    }

    pub(crate) fn card_mut(&mut self, card_ref: &CardRef) -> Result<&mut Card, StoreError> {
        self.decks
            .card_mut(card_ref)
            .ok_or_else(|| StoreError::CardNotFound {
                deck_id: card_ref.deck_id.clone(),
                card_id: card_ref.card_id.to_string(),
            })
    }

    /// Folds one graded card into the counters and today's history bucket.
    pub fn record_response(&mut self, knew: bool, xp: u64, just_mastered: bool, date_key: &str) {
        self.stats.xp_points += xp;
        if just_mastered {
            self.stats.mastered_cards = (self.stats.mastered_cards + 1).min(self.stats.total_cards);
        }
        self.stats.log_review(date_key, knew);
    }

    /// Counts a completed session.
    pub fn increment_streak(&mut self) {
        self.stats.streak += 1;
        self.sync_total_cards();
    }

    fn sync_total_cards(&mut self) {
        self.stats.set_total_cards(self.decks.total_cards() as u32);
    }

    pub fn create_deck(&mut self, name: &str, description: &str) -> Result<String, StoreError> {
        let deck = Deck::new(&required(name, "Deck name")?, description.trim());
        let id = deck.id.clone();
        self.decks.decks.push(deck);
        self.flush()?;
        tracing::info!(deck_id = %id, "deck created");
        Ok(id)
    }

    pub fn update_deck(&mut self, deck_id: &str, name: &str, description: &str) -> Result<(), StoreError> {
        let name = required(name, "Deck name")?;
        let deck = self
            .decks
            .find_mut(deck_id)
            .ok_or_else(|| StoreError::DeckNotFound(deck_id.to_string()))?;
        deck.name = name;
        deck.description = description.trim().to_string();
        self.flush()
    }

    /// Removes a deck together with all of its cards.
    pub fn delete_deck(&mut self, deck_id: &str) -> Result<(), StoreError> {
        let before = self.decks.decks.len();
        self.decks.decks.retain(|d| d.id != deck_id);
        if self.decks.decks.len() == before {
            return Err(StoreError::DeckNotFound(deck_id.to_string()));
        }
        self.sync_total_cards();
        self.flush()?;
        tracing::info!(deck_id, "deck deleted");
        Ok(())
    }

    pub fn add_card(
        &mut self,
        deck_id: &str,
        question: &str,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<CardId, StoreError> {
        let card = Card::new(
            CardId::fresh(),
            &required(question, "Question")?,
            &required(answer, "Answer")?,
            now,
        );
        let id = card.id.clone();
        self.decks
            .find_mut(deck_id)
            .ok_or_else(|| StoreError::DeckNotFound(deck_id.to_string()))?
            .cards
            .push(card);
        self.sync_total_cards();
        self.flush()?;
        Ok(id)
    }

    /// Adds an imported deck as-is. Deck names must be unique; a clashing id is
    /// replaced with a fresh one.
    pub fn import_deck(&mut self, mut deck: Deck) -> Result<String, StoreError> {
        if self.decks.decks.iter().any(|d| d.name == deck.name) {
            return Err(StoreError::Validation(format!(
                "Deck '{}' already exists",
                deck.name
            )));
        }
        if self.decks.find(&deck.id).is_some() {
            deck.id = Deck::new(&deck.name, "").id;
        }
        deck.cards.iter_mut().for_each(|c| {
            c.clamp_level();
        });
        deck.dedupe_card_ids();
        let id = deck.id.clone();
        self.decks.decks.push(deck);
        self.sync_total_cards();
        self.flush()?;
        Ok(id)
    }
}
