//! Fixed-ladder spaced repetition scheduling.
//!
//! Every card sits on a level of the interval ladder:
//! - Knowing the answer climbs one level (capped at the top level)
//! - Missing it drops the card back to level 0
//! - The next review is `now + interval(level)`
//! - XP is 10 + 5 × new level for a correct answer, 5 for a miss, and a one-off
//!   50 bonus when a card first steps onto the top level

use super::Card;
use super::intervals::{MAX_LEVEL, interval};
use chrono::{DateTime, Utc};

/// Upper bound on the number of cards reviewed in one session.
pub const SESSION_SIZE: usize = 10;

pub const MISS_XP: u64 = 5;
pub const MASTERY_BONUS_XP: u64 = 50;

/// Result of grading one card.
#[derive(Clone, Debug, PartialEq)]
pub struct Review {
    pub card: Card,
    pub xp: u64,
    pub just_mastered: bool,
}

/// Positions of the cards due at `now`, in their original order, capped at
/// [`SESSION_SIZE`]. Cards past the cap stay due for the next session.
pub fn select_due<'a, I>(cards: I, now: DateTime<Utc>) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Card>,
{
    cards
        .into_iter()
        .enumerate()
        .filter(|(_, card)| card.is_due(now))
        .map(|(i, _)| i)
        .take(SESSION_SIZE)
        .collect()
}

/// Number of due cards, without the session cap.
pub fn due_count(cards: &[Card], now: DateTime<Utc>) -> usize {
    cards.iter().filter(|c| c.is_due(now)).count()
}

/// Grades `card` and returns its rescheduled copy. Notes and flag pass through.
pub fn apply_response(card: &Card, knew: bool, now: DateTime<Utc>) -> Review {
    let previous_level = card.level.min(MAX_LEVEL);
    let mut updated = card.clone();

    let (xp, just_mastered) = if knew {
        updated.level = (previous_level + 1).min(MAX_LEVEL);
        let mastered_now = updated.level == MAX_LEVEL && previous_level < MAX_LEVEL;
        let mut xp = 10 + 5 * updated.level as u64;
        if mastered_now {
            xp += MASTERY_BONUS_XP;
        }
        (xp, mastered_now)
    } else {
        updated.level = 0;
        (MISS_XP, false)
    };

    updated.next_review = (now + interval(updated.level)).timestamp_millis();

    Review {
        card: updated,
        xp,
        just_mastered,
    }
}
