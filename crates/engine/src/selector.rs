use crate::bank::QuestionBank;
use dashmap::DashMap;
use log::{debug, info, warn};
use model::Question;
use rand::Rng;
use std::collections::HashSet;

/// Questions are tracked separately for every sport and difficulty pair.
type HistoryKey = (Box<str>, u16);
type History = DashMap<HistoryKey, HashSet<Box<str>>>;

#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    Question(Question),
    /// The store has no questions for this category and difficulty.
    NoneAvailable,
}

/// Shuffles the slice in place with the Fisher-Yates algorithm so that every
/// permutation is equally likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Serves questions without repeats until the pool for a key runs dry, at which
/// point the history for that key is forgotten and the whole pool is replayed.
pub struct QuestionSelector {
    bank: QuestionBank,
    history: History,
}

impl QuestionSelector {
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank, history: DashMap::new() }
    }

    pub async fn select_one(&self, category: &str, difficulty: u16) -> Selection {
        let candidates = self.bank.fetch_questions(category, Some(difficulty)).await;
        let selection = self.choose(category, difficulty, candidates, &mut rand::thread_rng());
        if let Selection::Question(question) = &selection {
            self.bank.mark_used(&question.id).await;
        }
        selection
    }

    /// Picks one of the `candidates` that has not been served for this key since
    /// the last reset, and records it as served.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        category: &str,
        difficulty: u16,
        candidates: Vec<Question>,
        rng: &mut R,
    ) -> Selection {
        if candidates.is_empty() {
            warn!("no questions available for {category} at difficulty {difficulty}");
            return Selection::NoneAvailable;
        }

        let mut used = self.history.entry((category.into(), difficulty)).or_default();
        let (fresh, stale): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|q| !used.contains(&q.id));
        let mut available = if fresh.is_empty() {
            info!("all {} questions used for {category} at difficulty {difficulty}, resetting", stale.len());
            used.clear();
            stale
        } else {
            fresh
        };

        shuffle(&mut available, rng);
        let Some(question) = available.into_iter().next() else {
            return Selection::NoneAvailable;
        };

        used.insert(question.id.clone());
        debug!("serving question {} ({} used for {category} at difficulty {difficulty})", question.id, used.len());
        Selection::Question(question)
    }

    /// Number of questions served for the key since its last reset.
    pub fn used_count(&self, category: &str, difficulty: u16) -> usize {
        let key: HistoryKey = (category.into(), difficulty);
        self.history.get(&key).map_or(0, |used| used.len())
    }
}
