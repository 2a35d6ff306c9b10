//! Contracts for the external collaborators of the engine: the durable
//! question and score stores, and the fast local cache.

use async_trait::async_trait;
use core::fmt::{self, Display};
use model::{LeaderboardEntry, Question, ScoreSubmission};

/// Cache key for the name entered on the setup screen.
pub const PLAYER_NAME_KEY: &str = "playerName";
/// Cache key for the sport picked on the setup screen.
pub const SELECTED_SPORT_KEY: &str = "selectedSport";
/// Cache key for the serialized top-10 leaderboard.
pub const LEADERBOARD_KEY: &str = "leaderboard";

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or rejected the request.
    Unreachable,
    /// The store answered with data we cannot interpret.
    Corrupt,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unreachable => "store unreachable",
            Self::Corrupt => "store returned malformed data",
        })
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Returns every question whose category matches exactly and, when given,
    /// whose difficulty matches exactly.
    async fn fetch_questions(&self, category: &str, difficulty: Option<u16>) -> StoreResult<Vec<Question>>;

    /// Stamps the question as served at `at` (Unix seconds) and bumps its usage counter.
    async fn mark_used(&self, id: &str, at: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Appends one finished session to the score history.
    async fn append_score(&self, submission: &ScoreSubmission) -> StoreResult<()>;

    /// Loads the maintained top-N view. `None` means it was never populated.
    async fn load_leaderboard(&self) -> StoreResult<Option<Vec<LeaderboardEntry>>>;

    /// Replaces the maintained top-N view.
    async fn save_leaderboard(&self, entries: &[LeaderboardEntry]) -> StoreResult<()>;
}

/// Advisory key/value storage with no expiry. Writes overwrite.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}
