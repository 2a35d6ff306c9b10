use crate::store::QuestionStore;
use log::{debug, error, warn};
use model::Question;
use std::sync::Arc;

/// Read access to the question store that never fails the caller. Store
/// failures and malformed documents are logged and surface as fewer (or zero)
/// questions.
#[derive(Clone)]
pub struct QuestionBank {
    store: Arc<dyn QuestionStore>,
}

impl QuestionBank {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    pub async fn fetch_questions(&self, category: &str, difficulty: Option<u16>) -> Vec<Question> {
        let mut questions = match self.store.fetch_questions(category, difficulty).await {
            Ok(questions) => questions,
            Err(err) => {
                error!("failed to fetch questions for {category} at difficulty {difficulty:?}: {err}");
                return Vec::new();
            }
        };

        questions.retain(|question| {
            let keep = question.is_well_formed();
            if !keep {
                warn!("skipping malformed question {}", question.id);
            }
            keep
        });

        debug!("fetched {} questions for {category} at difficulty {difficulty:?}", questions.len());
        questions
    }

    /// Best-effort usage bookkeeping. Failures are only logged.
    pub async fn mark_used(&self, id: &str) {
        let now = i64::try_from(crate::unix_now()).unwrap_or(i64::MAX);
        if let Err(err) = self.store.mark_used(id, now).await {
            warn!("failed to update usage of question {id}: {err}");
        }
    }
}
