//! In-process implementations of the store contracts. The cache is what the
//! service runs with; the stores back tests and local play without a database.

use crate::store::{LocalCache, QuestionStore, ScoreStore, StoreError, StoreResult};
use async_trait::async_trait;
use dashmap::DashMap;
use model::{LeaderboardEntry, Question, ScoreSubmission};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

#[derive(Default)]
pub struct MemoryQuestions {
    questions: Mutex<Vec<Question>>,
    offline: AtomicBool,
}

impl MemoryQuestions {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions: Mutex::new(questions), offline: AtomicBool::new(false) }
    }

    /// Simulates an unreachable store while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    fn check(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::Acquire) {
            Err(StoreError::Unreachable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestions {
    async fn fetch_questions(&self, category: &str, difficulty: Option<u16>) -> StoreResult<Vec<Question>> {
        self.check()?;
        let questions = self.questions.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(questions
            .iter()
            .filter(|q| q.category.as_ref() == category && difficulty.map_or(true, |d| q.difficulty == d))
            .cloned()
            .collect())
    }

    async fn mark_used(&self, id: &str, at: i64) -> StoreResult<()> {
        self.check()?;
        let mut questions = self.questions.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(question) = questions.iter_mut().find(|q| q.id.as_ref() == id) {
            question.last_used = Some(at);
            question.usage_count = question.usage_count.saturating_add(1);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryScores {
    submissions: Mutex<Vec<ScoreSubmission>>,
    board: Mutex<Option<Vec<LeaderboardEntry>>>,
    offline: AtomicBool,
}

impl MemoryScores {
    pub fn with_board(board: Vec<LeaderboardEntry>) -> Self {
        Self { board: Mutex::new(Some(board)), ..Default::default() }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    /// Every submission appended so far, oldest first.
    pub fn submissions(&self) -> Vec<ScoreSubmission> {
        self.submissions.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The maintained view exactly as stored, bypassing any seeding.
    pub fn board(&self) -> Option<Vec<LeaderboardEntry>> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn check(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::Acquire) {
            Err(StoreError::Unreachable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ScoreStore for MemoryScores {
    async fn append_score(&self, submission: &ScoreSubmission) -> StoreResult<()> {
        self.check()?;
        self.submissions.lock().unwrap_or_else(PoisonError::into_inner).push(submission.clone());
        Ok(())
    }

    async fn load_leaderboard(&self) -> StoreResult<Option<Vec<LeaderboardEntry>>> {
        self.check()?;
        Ok(self.board())
    }

    async fn save_leaderboard(&self, entries: &[LeaderboardEntry]) -> StoreResult<()> {
        self.check()?;
        *self.board.lock().unwrap_or_else(PoisonError::into_inner) = Some(entries.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<Box<str>, String>,
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|value| value.clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.into(), value);
    }
}
