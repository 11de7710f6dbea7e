//! Aggregate learning counters persisted alongside the decks.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_review_goal() -> u32 {
    10
}

/// Correct/incorrect tallies for one calendar day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDay {
    pub date: String,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub incorrect: u32,
}

impl ReviewDay {
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub total_cards: u32,
    #[serde(default)]
    pub mastered_cards: u32,
    #[serde(default)]
    pub xp_points: u64,
    #[serde(default = "default_review_goal")]
    pub review_goal: u32,
    #[serde(default)]
    pub review_history: Vec<ReviewDay>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            streak: 0,
            total_cards: 0,
            mastered_cards: 0,
            xp_points: 0,
            review_goal: default_review_goal(),
            review_history: Vec::new(),
        }
    }
}

/// Key of a `reviewHistory` entry, e.g. `"Fri Oct 16 2026"`.
pub fn history_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

impl Stats {
    pub fn history_for(&self, date_key: &str) -> Option<&ReviewDay> {
        self.review_history.iter().find(|d| d.date == date_key)
    }

    /// Bumps the day's bucket, creating it at the end of the history if absent.
    pub(crate) fn log_review(&mut self, date_key: &str, knew: bool) {
        let day = match self.review_history.iter().position(|d| d.date == date_key) {
            Some(i) => &mut self.review_history[i],
            None => {
                self.review_history.push(ReviewDay {
                    date: date_key.to_string(),
                    correct: 0,
                    incorrect: 0,
                });
                let last = self.review_history.len() - 1;
                &mut self.review_history[last]
            }
        };
        if knew {
            day.correct += 1;
        } else {
            day.incorrect += 1;
        }
    }

    /// Keeps `mastered_cards <= total_cards`.
    pub(crate) fn set_total_cards(&mut self, total: u32) {
        self.total_cards = total;
        self.mastered_cards = self.mastered_cards.min(total);
    }
}
