//! Review session management.
//! Walks a fixed queue of due cards, grading each one and writing the result
//! back through the [`CardStore`] before moving on.

use super::milestone::{self, Milestone};
use super::stats::history_key;
use super::{Card, CardRef, scheduler};
use crate::database::CardStore;
use crate::error::SessionError;
use chrono::{DateTime, Local, Utc};

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Transient: the queue is being built.
    Loading,
    InProgress {
        queue: Vec<CardRef>,
        position: usize,
        earned_xp: u64,
    },
    Complete {
        reviewed: usize,
        earned_xp: u64,
    },
}

/// What one answer did, for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseOutcome {
    pub xp: u64,
    pub level: usize,
    pub just_mastered: bool,
    pub next_review: DateTime<Utc>,
    pub milestone: Option<Milestone>,
    /// This answer finished the session.
    pub completed: bool,
}

/// One bounded pass over the cards that were due when it started.
///
/// The queue is fixed at start; rescheduling a card mid-session never adds or
/// removes entries.
pub struct ReviewSession {
    scope: Option<String>,
    title: String,
    state: SessionState,
}

impl ReviewSession {
    /// Starts a session over one deck, or over every deck when `deck_id` is `None`.
    pub fn start(store: &CardStore, deck_id: Option<&str>, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let title = match deck_id {
            Some(id) => store
                .deck(id)
                .ok_or_else(|| SessionError::DeckNotFound(id.to_string()))?
                .name
                .clone(),
            None => "All Decks".to_string(),
        };

        let mut session = Self {
            scope: deck_id.map(str::to_string),
            title,
            state: SessionState::Loading,
        };
        session.enter(store, now);
        Ok(session)
    }

    fn enter(&mut self, store: &CardStore, now: DateTime<Utc>) {
        let candidates = store.decks().cards_in_scope(self.scope.as_deref());
        let due = scheduler::select_due(candidates.iter().map(|(_, card)| *card), now);
        let queue: Vec<CardRef> = due.into_iter().map(|i| candidates[i].0.clone()).collect();

        tracing::info!(scope = %self.title, due = queue.len(), "review session started");

        self.state = if queue.is_empty() {
            SessionState::Complete {
                reviewed: 0,
                earned_xp: 0,
            }
        } else {
            SessionState::InProgress {
                queue,
                position: 0,
                earned_xp: 0,
            }
        };
    }

    /// Builds a fresh queue after the session completed. Returns `false` (and
    /// does nothing) while a session is still running.
    pub fn restart(&mut self, store: &CardStore, now: DateTime<Utc>) -> bool {
        if !self.is_complete() {
            return false;
        }
        self.state = SessionState::Loading;
        self.enter(store, now);
        true
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Complete { .. })
    }

    pub fn current_ref(&self) -> Option<&CardRef> {
        match &self.state {
            SessionState::InProgress { queue, position, .. } => queue.get(*position),
            _ => None,
        }
    }

    pub fn current_card<'a>(&self, store: &'a CardStore) -> Option<&'a Card> {
        store.card(self.current_ref()?)
    }

    /// `(cards answered, queue length)`.
    pub fn progress(&self) -> (usize, usize) {
        match &self.state {
            SessionState::Loading => (0, 0),
            SessionState::InProgress { queue, position, .. } => (*position, queue.len()),
            SessionState::Complete { reviewed, .. } => (*reviewed, *reviewed),
        }
    }

    pub fn progress_percent(&self) -> u32 {
        match self.progress() {
            (_, 0) => 0,
            (done, total) => (done as f64 / total as f64 * 100.0).round() as u32,
        }
    }

    pub fn earned_xp(&self) -> u64 {
        match &self.state {
            SessionState::Loading => 0,
            SessionState::InProgress { earned_xp, .. } | SessionState::Complete { earned_xp, .. } => *earned_xp,
        }
    }

    /// Grades the current card, persists it with the updated stats and moves on.
    ///
    /// Without a current card this returns [`SessionError::NoCurrentCard`]; if
    /// the remaining queued cards were deleted, the session completes first. A [`SessionError::Store`] means the answer was applied
    /// in memory but the write-back failed.
    pub fn respond(&mut self, store: &mut CardStore, knew: bool, now: DateTime<Utc>) -> Result<ResponseOutcome, SessionError> {
        if let Some((reviewed, earned_xp)) = self.skip_removed(store) {
            if earned_xp > 0 {
                self.finish(store, reviewed, earned_xp);
                store.flush()?;
            } else {
                self.state = SessionState::Complete { reviewed, earned_xp };
            }
            return Err(SessionError::NoCurrentCard);
        }
        let card_ref = self.current_ref().cloned().ok_or(SessionError::NoCurrentCard)?;
        let card = store.card(&card_ref).ok_or(SessionError::NoCurrentCard)?;

        let review = scheduler::apply_response(card, knew, now);
        let milestone = if knew {
            milestone::reached(store.stats().streak)
        } else {
            None
        };
        tracing::debug!(
            deck_id = %card_ref.deck_id,
            card_id = %card_ref.card_id,
            knew,
            level = review.card.level,
            xp = review.xp,
            "card graded"
        );

        let outcome = ResponseOutcome {
            xp: review.xp,
            level: review.card.level,
            just_mastered: review.just_mastered,
            next_review: review.card.next_review_at(),
            milestone,
            completed: false,
        };

        *store.card_mut(&card_ref)? = review.card;
        let today = history_key(now.with_timezone(&Local).date_naive());
        store.record_response(knew, review.xp, review.just_mastered, &today);

        if let SessionState::InProgress {
            position, earned_xp, ..
        } = &mut self.state
        {
            *position += 1;
            *earned_xp += review.xp;
        }
        let finished = self.skip_removed(store);
        if let Some((reviewed, earned_xp)) = finished {
            self.finish(store, reviewed, earned_xp);
        }

        store.flush()?;
        Ok(ResponseOutcome {
            completed: finished.is_some(),
            ..outcome
        })
    }

    /// Moves past queued cards whose deck or card was deleted after the session
    /// started. Returns `(reviewed, earned_xp)` once the queue is exhausted.
    fn skip_removed(&mut self, store: &CardStore) -> Option<(usize, u64)> {
        let SessionState::InProgress {
            queue,
            position,
            earned_xp,
        } = &mut self.state
        else {
            return None;
        };
        let from = *position;
        while queue.get(*position).is_some_and(|r| store.card(r).is_none()) {
            *position += 1;
        }
        if *position > from {
            tracing::warn!(scope = %self.title, skipped = *position - from, "queued cards no longer exist");
        }
        (*position >= queue.len()).then_some((*position, *earned_xp))
    }

    fn finish(&mut self, store: &mut CardStore, reviewed: usize, earned_xp: u64) {
        store.increment_streak();
        self.state = SessionState::Complete { reviewed, earned_xp };
        tracing::info!(scope = %self.title, reviewed, earned_xp, "review session complete");
    }

    /// Toggles the flag on the current card and returns the new value.
    pub fn flag_current(&self, store: &mut CardStore) -> Result<bool, SessionError> {
        let card_ref = self.current_ref().ok_or(SessionError::NoCurrentCard)?;
        let card = store.card_mut(card_ref).map_err(|_| SessionError::NoCurrentCard)?;
        card.flagged = !card.flagged;
        let flagged = card.flagged;
        store.flush()?;
        Ok(flagged)
    }

    /// Replaces the notes of the current card.
    pub fn set_current_notes(&self, store: &mut CardStore, notes: &str) -> Result<(), SessionError> {
        let card_ref = self.current_ref().ok_or(SessionError::NoCurrentCard)?;
        let card = store.card_mut(card_ref).map_err(|_| SessionError::NoCurrentCard)?;
        card.notes = notes.to_string();
        store.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::intervals::MAX_LEVEL;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn seeded() -> CardStore {
        CardStore::load(MemoryStore::new(), t0())
    }

    #[test]
    fn test_single_deck_session() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, Some("math"), t0()).unwrap();

        assert_eq!(session.title(), "Mathematics");
        assert_eq!(session.progress(), (0, 5));
        assert_eq!(
            session.current_card(&store).unwrap().question,
            "What is the formula for the area of a circle?"
        );

        let outcome = session.respond(&mut store, true, t0()).unwrap();
        assert_eq!(outcome.xp, 15);
        assert_eq!(outcome.level, 1);
        assert_eq!(outcome.next_review, t0() + Duration::days(1));
        assert!(!outcome.completed);
        assert_eq!(session.progress(), (1, 5));
        assert_eq!(store.deck("math").unwrap().cards[0].level, 1);
        assert_eq!(store.stats().xp_points, 15);
    }

    #[test]
    fn test_all_decks_session_spans_decks() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, None, t0()).unwrap();

        assert_eq!(session.title(), "All Decks");
        assert_eq!(session.progress(), (0, 10));
        for _ in 0..5 {
            session.respond(&mut store, false, t0()).unwrap();
        }
        let current = session.current_ref().unwrap();
        assert_eq!(current.deck_id, "math");
    }

    #[test]
    fn test_completion_increments_streak_once() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, Some("default"), t0()).unwrap();
        let answers = [true, false, false, true, false];
        let mut last = None;
        for knew in answers {
            last = Some(session.respond(&mut store, knew, t0()).unwrap());
        }

        assert!(last.unwrap().completed);
        assert!(session.is_complete());
        assert_eq!(session.progress(), (5, 5));
        assert_eq!(session.earned_xp(), 15 + 5 + 5 + 15 + 5);
        assert_eq!(store.stats().streak, 1);
        assert_eq!(store.stats().xp_points, 45);

        let today = history_key(t0().with_timezone(&Local).date_naive());
        let day = store.stats().history_for(&today).unwrap();
        assert_eq!((day.correct, day.incorrect), (2, 3));
        assert_eq!(store.stats().review_history.len(), 1);
    }

    #[test]
    fn test_respond_after_completion_is_rejected() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, Some("default"), t0()).unwrap();
        for _ in 0..5 {
            session.respond(&mut store, true, t0()).unwrap();
        }
        let xp = store.stats().xp_points;

        assert!(matches!(
            session.respond(&mut store, true, t0()),
            Err(SessionError::NoCurrentCard)
        ));
        assert_eq!(store.stats().xp_points, xp);
        assert_eq!(store.stats().streak, 1);
    }

    #[test]
    fn test_nothing_due_is_complete_immediately() {
        let mut store = seeded();
        let earlier = t0() - Duration::minutes(1);
        let session = ReviewSession::start(&store, None, earlier).unwrap();

        assert!(session.is_complete());
        assert_eq!(session.earned_xp(), 0);
        assert_eq!(session.progress(), (0, 0));
        assert!(session.current_card(&store).is_none());
        assert!(session.flag_current(&mut store).is_err());
        assert_eq!(store.stats().streak, 0);
    }

    #[test]
    fn test_unknown_deck() {
        let store = seeded();
        assert!(matches!(
            ReviewSession::start(&store, Some("nope"), t0()),
            Err(SessionError::DeckNotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_queue_is_fixed_for_the_session() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, Some("default"), t0()).unwrap();

        // A miss reschedules 5 minutes out; later answers still see the original queue.
        session.respond(&mut store, false, t0()).unwrap();
        let later = t0() + Duration::minutes(10);
        for _ in 0..4 {
            session.respond(&mut store, true, later).unwrap();
        }
        assert!(session.is_complete());
        assert_eq!(session.progress(), (5, 5));
    }

    #[test]
    fn test_restart_recomputes_queue() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, Some("default"), t0()).unwrap();
        assert!(!session.restart(&store, t0()));

        session.respond(&mut store, false, t0()).unwrap();
        for _ in 0..4 {
            session.respond(&mut store, true, t0()).unwrap();
        }

        assert!(session.restart(&store, t0()));
        assert!(session.is_complete());

        let later = t0() + Duration::minutes(5);
        assert!(session.restart(&store, later));
        assert_eq!(session.progress(), (0, 1));
        assert_eq!(session.earned_xp(), 0);
    }

    #[test]
    fn test_flag_and_notes_leave_scheduling_alone() {
        let mut store = seeded();
        let session = ReviewSession::start(&store, Some("default"), t0()).unwrap();

        assert!(session.flag_current(&mut store).unwrap());
        session.set_current_notes(&mut store, "think Eiffel").unwrap();
        assert!(!session.flag_current(&mut store).unwrap());
        assert!(session.flag_current(&mut store).unwrap());

        let card = session.current_card(&store).unwrap();
        assert!(card.flagged);
        assert_eq!(card.notes, "think Eiffel");
        assert_eq!(card.level, 0);
        assert_eq!(session.progress(), (0, 5));
    }

    #[test]
    fn test_mastery_updates_counter_once() {
        let mut store = seeded();
        let mut now = t0();
        for _ in 0..MAX_LEVEL + 1 {
            let mut session = ReviewSession::start(&store, Some("math"), now).unwrap();
            while !session.is_complete() {
                session.respond(&mut store, true, now).unwrap();
            }
            now += Duration::days(31);
        }

        assert_eq!(store.stats().mastered_cards, 5);
        assert!(store.deck("math").unwrap().cards.iter().all(Card::is_mastered));
        assert_eq!(store.stats().streak, MAX_LEVEL as u32 + 1);
    }

    #[test]
    fn test_session_is_capped() {
        let mut store = seeded();
        for i in 0..12 {
            store
                .add_card("default", &format!("q{i}"), "a", t0())
                .unwrap();
        }
        let session = ReviewSession::start(&store, Some("default"), t0()).unwrap();

        assert_eq!(session.progress(), (0, scheduler::SESSION_SIZE));
    }

    #[test]
    fn test_deleted_deck_is_skipped_mid_session() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, None, t0()).unwrap();
        session.respond(&mut store, true, t0()).unwrap();
        store.delete_deck("math").unwrap();

        let mut last = None;
        for _ in 0..4 {
            last = Some(session.respond(&mut store, true, t0()).unwrap());
        }

        assert!(last.unwrap().completed);
        assert!(session.is_complete());
        assert_eq!(session.progress(), (10, 10));
        assert_eq!(store.stats().streak, 1);
        assert!(matches!(
            session.respond(&mut store, true, t0()),
            Err(SessionError::NoCurrentCard)
        ));
    }

    #[test]
    fn test_session_ending_on_deleted_cards_completes_on_next_answer() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, None, t0()).unwrap();
        for _ in 0..5 {
            session.respond(&mut store, false, t0()).unwrap();
        }
        store.delete_deck("math").unwrap();

        assert!(session.current_card(&store).is_none());
        assert!(matches!(
            session.respond(&mut store, true, t0()),
            Err(SessionError::NoCurrentCard)
        ));
        assert!(session.is_complete());
        assert_eq!(store.stats().streak, 1);
        assert_eq!(store.stats().xp_points, 25);
    }

    #[test]
    fn test_unanswered_session_over_deleted_deck_completes_without_streak() {
        let mut store = seeded();
        let mut session = ReviewSession::start(&store, Some("math"), t0()).unwrap();
        store.delete_deck("math").unwrap();

        assert!(session.respond(&mut store, true, t0()).is_err());
        assert!(session.is_complete());
        assert_eq!(store.stats().streak, 0);
    }

    #[test]
    fn test_imported_cards_with_repeated_ids_are_reviewed_separately() {
        let mut store = seeded();
        let mut deck = crate::models::Deck::new("Imported", "");
        deck.cards = vec![
            Card::new(crate::models::CardId::Number(1), "first", "a", t0()),
            Card::new(crate::models::CardId::Number(1), "second", "a", t0()),
        ];
        let deck_id = store.import_deck(deck).unwrap();

        let mut session = ReviewSession::start(&store, Some(&deck_id), t0()).unwrap();
        session.respond(&mut store, true, t0()).unwrap();
        session.respond(&mut store, true, t0()).unwrap();

        let levels: Vec<usize> = store.deck(&deck_id).unwrap().cards.iter().map(|c| c.level).collect();
        assert_eq!(levels, vec![1, 1]);
        assert!(session.is_complete());
    }

    #[test]
    fn test_milestone_on_correct_answer_only() {
        let mut store = seeded();
        for _ in 0..4 {
            store.increment_streak();
        }
        let mut session = ReviewSession::start(&store, Some("default"), t0()).unwrap();

        let miss = session.respond(&mut store, false, t0()).unwrap();
        assert!(miss.milestone.is_none());
        let hit = session.respond(&mut store, true, t0()).unwrap();
        assert_eq!(hit.milestone.unwrap().streak, 4);
    }
}
