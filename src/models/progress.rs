//! Read-only views derived from [`Stats`]: XP levels, achievements and goals.
use super::Stats;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XpLevel {
    pub level: u32,
    pub next_level: u32,
    /// Percent of the way from the current level's floor to the next ceiling.
    pub progress: f64,
}

/// Level for `xp` points. The first ceiling is 100 and each following one is
/// `floor(previous * 1.2) + 100` (100, 220, 364, ...).
pub fn xp_level(xp: u64) -> XpLevel {
    if xp == 0 {
        return XpLevel {
            level: 0,
            next_level: 1,
            progress: 0.0,
        };
    }

    let mut level = 0;
    let mut floor = 0u64;
    let mut ceiling = 100u64;
    // Ceilings saturate at u64::MAX, where the climb stops.
    while xp >= ceiling && ceiling < u64::MAX {
        level += 1;
        floor = ceiling;
        ceiling = (ceiling.saturating_mul(6) / 5).saturating_add(100);
    }

    XpLevel {
        level: level + 1,
        next_level: level + 2,
        progress: (xp - floor) as f64 / (ceiling - floor) as f64 * 100.0,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
    pub progress: f64,
}

fn achievement(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    value: u64,
    threshold: u64,
) -> Achievement {
    Achievement {
        id,
        name,
        description,
        icon,
        unlocked: value >= threshold,
        progress: (value as f64 / threshold as f64 * 100.0).min(100.0),
    }
}

pub fn achievements(stats: &Stats) -> Vec<Achievement> {
    vec![
        achievement(
            "streak-3",
            "Consistent Learner",
            "Maintain a 3-day streak",
            "🔥",
            stats.streak.into(),
            3,
        ),
        achievement(
            "streak-7",
            "Weekly Warrior",
            "Maintain a 7-day streak",
            "🏆",
            stats.streak.into(),
            7,
        ),
        achievement(
            "mastery-10",
            "Knowledge Builder",
            "Master 10 flashcards",
            "🧠",
            stats.mastered_cards.into(),
            10,
        ),
        achievement(
            "xp-1000",
            "XP Collector",
            "Earn 1000 XP points",
            "⭐",
            stats.xp_points,
            1000,
        ),
        achievement(
            "cards-50",
            "Card Enthusiast",
            "Create 50 flashcards",
            "📚",
            stats.total_cards.into(),
            50,
        ),
    ]
}

/// Share of all cards that are mastered, rounded to a whole percent.
pub fn mastery_percent(stats: &Stats) -> u32 {
    if stats.total_cards == 0 {
        return 0;
    }
    (stats.mastered_cards as f64 / stats.total_cards as f64 * 100.0).round() as u32
}

pub fn reviews_on(stats: &Stats, date_key: &str) -> u32 {
    stats.history_for(date_key).map_or(0, |d| d.total())
}

/// Progress towards the daily review goal, capped at 100.
pub fn goal_percent(stats: &Stats, date_key: &str) -> u32 {
    if stats.review_goal == 0 {
        return 100;
    }
    (reviews_on(stats, date_key) * 100 / stats.review_goal).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_xp() {
        let level = xp_level(0);
        assert_eq!((level.level, level.next_level), (0, 1));
        assert_eq!(level.progress, 0.0);
    }

    #[test]
    fn test_first_level() {
        let level = xp_level(50);
        assert_eq!((level.level, level.next_level), (1, 2));
        assert!((level.progress - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_ceilings() {
        assert_eq!(xp_level(99).level, 1);
        assert_eq!(xp_level(100).level, 2);
        assert_eq!(xp_level(219).level, 2);
        assert_eq!(xp_level(220).level, 3);
        assert_eq!(xp_level(364).level, 4);

        let mid = xp_level(160);
        assert!((mid.progress - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_xp_does_not_overflow() {
        let top = xp_level(u64::MAX);
        assert!(top.level > 100);
        assert_eq!(top.next_level, top.level + 1);
        assert!((0.0..=100.0).contains(&top.progress));

        let near = xp_level(u64::MAX - 1);
        assert!(near.level <= top.level);
        assert!((0.0..=100.0).contains(&near.progress));
    }

    #[test]
    fn test_achievements() {
        let stats = Stats {
            streak: 5,
            mastered_cards: 10,
            xp_points: 250,
            total_cards: 10,
            ..Stats::default()
        };
        let list = achievements(&stats);

        assert_eq!(list.len(), 5);
        let by_id = |id: &str| list.iter().find(|a| a.id == id).unwrap();
        assert!(by_id("streak-3").unlocked);
        assert_eq!(by_id("streak-3").progress, 100.0);
        assert!(!by_id("streak-7").unlocked);
        assert!(by_id("mastery-10").unlocked);
        assert_eq!(by_id("xp-1000").progress, 25.0);
        assert_eq!(by_id("cards-50").progress, 20.0);
    }

    #[test]
    fn test_goal_and_mastery() {
        let mut stats = Stats {
            total_cards: 8,
            mastered_cards: 2,
            ..Stats::default()
        };
        for _ in 0..4 {
            stats.log_review("Fri Oct 16 2026", true);
        }

        assert_eq!(mastery_percent(&stats), 25);
        assert_eq!(reviews_on(&stats, "Fri Oct 16 2026"), 4);
        assert_eq!(goal_percent(&stats, "Fri Oct 16 2026"), 40);
        assert_eq!(goal_percent(&stats, "Sat Oct 17 2026"), 0);
    }
}
