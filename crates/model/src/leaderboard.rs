use alloc::{boxed::Box, vec::Vec};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept on the leaderboard.
pub const CAPACITY: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
    pub name: Box<str>,
    pub score: u32,
    pub sport: Box<str>,
}

/// Append-only record of one finished session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: Box<str>,
    pub score: u32,
    pub sport: Box<str>,
    /// Unix timestamp (in seconds) of when the session ended.
    pub timestamp: u64,
}

impl ScoreSubmission {
    pub fn new(entry: &LeaderboardEntry, timestamp: u64) -> Self {
        Self { player_name: entry.name.clone(), score: entry.score, sport: entry.sport.clone(), timestamp }
    }
}

const PLACEHOLDERS: [(&str, u32, &str); CAPACITY] = [
    ("SpaceJam23", 87, "basketball"),
    ("GoalMaster", 76, "soccer"),
    ("TouchdownKing", 72, "football"),
    ("HoopDreams", 65, "basketball"),
    ("SoccerStar", 58, "soccer"),
    ("HomeRunHero", 54, "baseball"),
    ("BallWizard", 49, "basketball"),
    ("FieldGoal", 42, "football"),
    ("BaseballPro", 38, "baseball"),
    ("SportsQuiz", 35, "soccer"),
];

/// The seed shown before anyone has finished a session.
pub fn placeholders() -> Vec<LeaderboardEntry> {
    PLACEHOLDERS
        .iter()
        .map(|&(name, score, sport)| LeaderboardEntry { name: name.into(), score, sport: sport.into() })
        .collect()
}

#[cfg(test)]
mod tests {
    #[test]
    fn placeholders_are_ranked() {
        let seed = super::placeholders();
        assert_eq!(seed.len(), super::CAPACITY);
        assert!(seed.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }
}
