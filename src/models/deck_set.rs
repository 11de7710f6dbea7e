//! Container for all available decks, in storage order
use super::{Card, CardId, Deck};
use serde::{Deserialize, Serialize};

/// Stable address of a card: owning deck plus the card's own id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CardRef {
    pub deck_id: String,
    pub card_id: CardId,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckSet {
    pub decks: Vec<Deck>,
}

impl DeckSet {
    pub fn find(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    pub fn find_mut(&mut self, deck_id: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.id == deck_id)
    }

    pub fn card(&self, card_ref: &CardRef) -> Option<&Card> {
        self.find(&card_ref.deck_id)?.card(&card_ref.card_id)
    }

    pub fn card_mut(&mut self, card_ref: &CardRef) -> Option<&mut Card> {
        self.find_mut(&card_ref.deck_id)?.card_mut(&card_ref.card_id)
    }

    pub fn total_cards(&self) -> usize {
        self.decks.iter().map(|d| d.cards.len()).sum()
    }

    /// Cards in scope paired with their addresses: one deck, or every deck
    /// flattened in storage order when `deck_id` is `None`.
    pub fn cards_in_scope(&self, deck_id: Option<&str>) -> Vec<(CardRef, &Card)> {
        self.decks
            .iter()
            .filter(|d| deck_id.is_none_or(|id| d.id == id))
            .flat_map(|d| {
                d.cards.iter().map(move |c| {
                    (
                        CardRef {
                            deck_id: d.id.clone(),
                            card_id: c.id.clone(),
                        },
                        c,
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn deck_with(id: &str, questions: &[&str]) -> Deck {
        let mut deck = Deck::new(id, "");
        deck.id = id.to_string();
        deck.cards = questions
            .iter()
            .enumerate()
            .map(|(i, q)| Card::new(CardId::Number(i as u64 + 1), q, "a", Utc::now()))
            .collect();
        deck
    }

    #[test]
    fn test_card_lookup_by_ref() {
        let set = DeckSet {
            decks: vec![deck_with("a", &["a1", "a2"]), deck_with("b", &["b1"])],
        };
        let card_ref = CardRef {
            deck_id: "b".to_string(),
            card_id: CardId::Number(1),
        };

        assert_eq!(set.card(&card_ref).unwrap().question, "b1");
        assert_eq!(set.total_cards(), 3);
    }

    #[test]
    fn test_same_card_id_in_two_decks_is_distinct() {
        let set = DeckSet {
            decks: vec![deck_with("a", &["a1"]), deck_with("b", &["b1"])],
        };
        let all = set.cards_in_scope(None);

        assert_eq!(all.len(), 2);
        assert_ne!(all[0].0, all[1].0);
        assert_eq!(all[1].1.question, "b1");
    }

    #[test]
    fn test_scope_filters_to_one_deck() {
        let set = DeckSet {
            decks: vec![deck_with("a", &["a1", "a2"]), deck_with("b", &["b1"])],
        };
        let scoped = set.cards_in_scope(Some("a"));

        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|(r, _)| r.deck_id == "a"));
        assert!(set.cards_in_scope(Some("missing")).is_empty());
    }
}
