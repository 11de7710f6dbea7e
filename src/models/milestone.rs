//! Streak milestones celebrated during a review.
use rand::seq::SliceRandom;

/// Streak values at which a correct answer shows a milestone message.
/// The streak only moves when a session completes, so these sit one below
/// the celebrated 5, 10, 15, 20 and 30.
pub const MILESTONE_STREAKS: [u32; 5] = [4, 9, 14, 19, 29];

pub const MOTIVATIONAL_QUOTES: [&str; 10] = [
    "Consistency is the key to mastery! Keep going!",
    "Your brain is getting stronger with every review!",
    "You're building neural pathways that will last a lifetime!",
    "Knowledge compounds like interest - you're investing wisely!",
    "Small steps every day lead to massive results over time!",
    "You're in the top 1% of learners who stick with it!",
    "Your future self will thank you for the habits you're building now!",
    "The difference between ordinary and extraordinary is that little 'extra' you're putting in!",
    "Success is the sum of small efforts repeated day in and day out!",
    "Every card you review is a brick in the foundation of your knowledge!",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub streak: u32,
    pub message: &'static str,
}

pub fn random_quote() -> &'static str {
    MOTIVATIONAL_QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOTIVATIONAL_QUOTES[0])
}

/// Milestone for a correct answer given the current global streak.
pub fn reached(streak: u32) -> Option<Milestone> {
    MILESTONE_STREAKS.contains(&streak).then(|| Milestone {
        streak,
        message: random_quote(),
    })
}
