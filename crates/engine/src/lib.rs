pub mod bank;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod lobby;
pub mod memory;
pub mod selector;
pub mod session;
pub mod setup;
pub mod store;

pub use bank::QuestionBank;
pub use config::{Config, Mode, Scoring};
pub use leaderboard::LeaderboardStore;
pub use lobby::{Lobby, SessionId};
pub use selector::{QuestionSelector, Selection};
pub use session::{Phase, Session, Snapshot, Verdict};
pub use setup::{PlayerSetup, Setup};
pub use store::{LocalCache, QuestionStore, ScoreStore, StoreError};

/// Current wall-clock time in Unix seconds. Clocks set before the epoch read as zero.
pub(crate) fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_secs())
}
