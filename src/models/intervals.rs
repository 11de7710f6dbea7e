//! Spaced repetition ladder. Level `n` waits `INTERVALS_MS[n]` before the next review.
use chrono::Duration;

const MINUTE: i64 = 60 * 1000;
const DAY: i64 = 24 * 60 * MINUTE;

pub const INTERVALS_MS: [i64; 6] = [
    5 * MINUTE,
    DAY,
    3 * DAY,
    7 * DAY,
    14 * DAY,
    30 * DAY,
];

/// Highest level a card can reach; reaching it means the card is mastered.
pub const MAX_LEVEL: usize = INTERVALS_MS.len() - 1;

/// Wait before the next review of a card sitting at `level`.
pub fn interval(level: usize) -> Duration {
    Duration::milliseconds(INTERVALS_MS[level.min(MAX_LEVEL)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_is_increasing() {
        assert!(INTERVALS_MS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reference_values() {
        assert_eq!(interval(0), Duration::minutes(5));
        assert_eq!(interval(1), Duration::days(1));
        assert_eq!(interval(MAX_LEVEL), Duration::days(30));
        assert_eq!(interval(MAX_LEVEL + 3), Duration::days(30));
    }
}
