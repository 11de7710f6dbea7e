pub mod card;
pub mod deck;
pub mod deck_set;
pub mod intervals;
pub mod milestone;
pub mod progress;
pub mod scheduler;
pub mod session;
pub mod stats;

pub use card::{Card, CardId};
pub use deck::Deck;
pub use deck_set::{CardRef, DeckSet};
pub use milestone::Milestone;
pub use progress::{Achievement, XpLevel};
pub use session::{ResponseOutcome, ReviewSession, SessionState};
pub use stats::{ReviewDay, Stats};
