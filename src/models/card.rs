//! Card is a question/answer pair together with its place on the review ladder.
use super::intervals::MAX_LEVEL;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card identifier as it appears in the stored decks document.
///
/// Seed cards carry small integers, cards created later carry UUID strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Number(u64),
    Text(String),
}

impl CardId {
    pub fn fresh() -> Self {
        CardId::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Number(n) => write!(f, "{n}"),
            CardId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default = "CardId::fresh")]
    pub id: CardId,
    pub question: String,
    pub answer: String,
    /// Index into the interval ladder, always `<= MAX_LEVEL`.
    #[serde(default)]
    pub level: usize,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "nextReview", default)]
    pub next_review: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub flagged: bool,
}

impl Card {
    /// A brand new card: level 0, due right away.
    pub fn new(id: CardId, question: &str, answer: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            level: 0,
            next_review: now.timestamp_millis(),
            notes: String::new(),
            flagged: false,
        }
    }

    pub fn next_review_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.next_review)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now.timestamp_millis()
    }

    pub fn is_mastered(&self) -> bool {
        self.level == MAX_LEVEL
    }

    /// Pulls an out-of-range stored level back onto the ladder.
    pub(crate) fn clamp_level(&mut self) -> bool {
        if self.level > MAX_LEVEL {
            self.level = MAX_LEVEL;
            true
        } else {
            false
        }
    }
}
