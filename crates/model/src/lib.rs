#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod leaderboard;
pub mod question;
pub mod sport;

pub use leaderboard::{LeaderboardEntry, ScoreSubmission};
pub use question::Question;
pub use sport::{Sport, Tier};
