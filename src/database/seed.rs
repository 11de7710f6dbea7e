//! Starter decks written on first launch or when stored decks are unreadable.
use crate::models::{Card, CardId, Deck, DeckSet};
use chrono::{DateTime, Utc};

const GENERAL: [(&str, &str); 5] = [
    ("What is the capital of France?", "Paris"),
    ("What is the largest planet in our solar system?", "Jupiter"),
    ("What is the chemical symbol for gold?", "Au"),
    ("What is the smallest prime number?", "2"),
    ("What is the main component of the Earth's atmosphere?", "Nitrogen"),
];

const MATH: [(&str, &str); 5] = [
    ("What is the formula for the area of a circle?", "πr²"),
    ("What is the Pythagorean theorem?", "a² + b² = c²"),
    ("What is the derivative of x²?", "2x"),
    ("What is the value of π (pi) to 2 decimal places?", "3.14"),
    ("What is the formula for the volume of a sphere?", "(4/3)πr³"),
];

fn seed_deck(id: &str, name: &str, description: &str, cards: &[(&str, &str)], now: DateTime<Utc>) -> Deck {
    Deck {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        cards: cards
            .iter()
            .enumerate()
            .map(|(i, (q, a))| Card::new(CardId::Number(i as u64 + 1), q, a, now))
            .collect(),
    }
}

/// Two five-card decks, all due at `now`.
pub fn default_decks(now: DateTime<Utc>) -> DeckSet {
    DeckSet {
        decks: vec![
            seed_deck("default", "General Knowledge", "Basic facts and information", &GENERAL, now),
            seed_deck("math", "Mathematics", "Math concepts and formulas", &MATH, now),
        ],
    }
}
