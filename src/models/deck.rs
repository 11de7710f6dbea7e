//! Deck is a named, ordered set of cards
use super::{Card, CardId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn fresh_deck_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default = "fresh_deck_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            id: fresh_deck_id(),
            name: name.to_string(),
            description: description.to_string(),
            cards: Vec::new(),
        }
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| &c.id == id)
    }

    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_mastered()).count()
    }

    /// Gives every card after the first holding a given id a fresh one, so a
    /// `(deck id, card id)` pair names exactly one card. Returns how many changed.
    pub(crate) fn dedupe_card_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut changed = 0;
        for card in &mut self.cards {
            while !seen.insert(card.id.clone()) {
                card.id = CardId::fresh();
                changed += 1;
            }
        }
        changed
    }
}
