use alloc::{boxed::Box, string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// A multiple-choice question as seeded into the question store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    /// Opaque document identifier.
    pub id: Box<str>,
    /// Sport key that this question belongs to.
    pub category: Box<str>,
    /// Prompt to be displayed to the player.
    pub question: String,
    /// Possible answers to select from, in display order.
    pub options: Vec<String>,
    /// The option that counts as correct. Always a member of `options`.
    pub correct_answer: String,
    /// Difficulty tier, which doubles as the point value of the question.
    pub difficulty: u16,
    /// Shown to the player after answering.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Unix timestamp (in seconds) of when the question was seeded.
    #[serde(default)]
    pub created_at: i64,
    /// Unix timestamp (in seconds) of the last time the question was served.
    #[serde(default)]
    pub last_used: Option<i64>,
    #[serde(default)]
    pub usage_count: u32,
}

impl Question {
    /// Checks the structural invariants of a question: at least two options,
    /// a correct answer drawn from those options, and a non-zero difficulty.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() >= 2 && self.difficulty >= 1 && self.options.contains(&self.correct_answer)
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}
