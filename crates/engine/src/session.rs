//! The state of a single play-through, independent of any clock or store.
//!
//! A session starts in [`Phase::Selecting`] and moves through
//! `AwaitingAnswer -> Feedback -> Selecting` until the countdown runs out or
//! it is ended explicitly. Operations that do not apply to the current phase
//! are ignored, so duplicate or late events from the presentation layer are
//! harmless.

use crate::{
    config::{Config, Mode, Scoring},
    error::{Error, Result},
    setup::PlayerSetup,
};
use model::{LeaderboardEntry, Question, Sport};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a question to be drawn.
    Selecting,
    /// The last draw found no questions for this difficulty.
    Unavailable { difficulty: u16 },
    AwaitingAnswer(Question),
    Feedback { question: Question, chosen: Box<str>, correct: bool },
    Ended,
}

/// Outcome of an accepted answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub correct: bool,
    /// Points awarded for this answer.
    pub points: u32,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// A question as shown to the player, without its answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: Box<str>,
    pub question: String,
    pub options: Vec<String>,
    pub difficulty: u16,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            question: question.question.clone(),
            options: question.options.clone(),
            difficulty: question.difficulty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PhaseView {
    Selecting,
    Unavailable {
        difficulty: u16,
    },
    AwaitingAnswer {
        question: QuestionView,
    },
    #[serde(rename_all = "camelCase")]
    Feedback {
        question: QuestionView,
        chosen: Box<str>,
        correct: bool,
        correct_answer: String,
        explanation: Option<String>,
    },
    Ended,
}

/// Read-only picture of a session for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub player: Box<str>,
    pub sport: &'static str,
    pub mode: Mode,
    pub score: u32,
    /// Seconds left on the countdown.
    pub remaining: u32,
    /// Number of questions served so far.
    pub served: usize,
    pub phase: PhaseView,
}

pub struct Session {
    player: Box<str>,
    sport: &'static Sport,
    mode: Mode,
    scoring: Scoring,
    score: u32,
    remaining: u32,
    served: Vec<Box<str>>,
    phase: Phase,
    /// Set once the result has been handed out for submission.
    finalized: bool,
}

impl Session {
    pub fn new(player: &str, sport: &str, config: &Config) -> Result<Self> {
        let PlayerSetup { name, sport } = PlayerSetup::validate(player, sport)?;
        Ok(Self {
            player: name,
            sport,
            mode: config.mode,
            scoring: config.scoring,
            score: 0,
            remaining: config.session_secs,
            served: Vec::new(),
            phase: Phase::Selecting,
            finalized: false,
        })
    }

    pub fn sport(&self) -> &'static Sport {
        self.sport
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended)
    }

    /// Ids of the questions served so far, in order.
    pub fn served(&self) -> &[Box<str>] {
        &self.served
    }

    /// Advances the countdown by one step. When it reaches zero the session
    /// ends and the final result is returned for submission.
    pub fn tick(&mut self) -> Option<LeaderboardEntry> {
        if self.is_ended() {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return self.end();
        }
        None
    }

    /// The difficulty to draw from automatically, if the session is waiting for
    /// a question and the mode does not leave the choice to the player.
    pub fn pending_draw(&self) -> Option<u16> {
        match (self.mode, &self.phase) {
            (Mode::FixedDifficulty, Phase::Selecting | Phase::Unavailable { .. }) => {
                Some(self.sport.default_tier().value)
            }
            _ => None,
        }
    }

    /// Validates the player's pick of difficulty. Returns the difficulty to draw
    /// from, or `None` if picking does not apply right now.
    pub fn choose_difficulty(&self, value: u16) -> Result<Option<u16>> {
        if self.mode != Mode::PlayerChooses || !matches!(self.phase, Phase::Selecting | Phase::Unavailable { .. }) {
            return Ok(None);
        }
        if !self.sport.has_tier(value) {
            return Err(Error::UnknownDifficulty);
        }
        Ok(Some(value))
    }

    /// Puts a freshly drawn question in front of the player.
    pub fn present(&mut self, question: Question) {
        if matches!(self.phase, Phase::Selecting | Phase::Unavailable { .. }) {
            self.served.push(question.id.clone());
            self.phase = Phase::AwaitingAnswer(question);
        }
    }

    /// Records that no question could be drawn for `difficulty`.
    pub fn unavailable(&mut self, difficulty: u16) {
        if matches!(self.phase, Phase::Selecting | Phase::Unavailable { .. }) {
            self.phase = Phase::Unavailable { difficulty };
        }
    }

    /// Evaluates an answer to the current question. Returns `None` (and changes
    /// nothing) when no question is awaiting an answer.
    pub fn submit_answer(&mut self, option: &str) -> Option<Verdict> {
        if !matches!(self.phase, Phase::AwaitingAnswer(_)) {
            return None;
        }
        let Phase::AwaitingAnswer(question) = core::mem::replace(&mut self.phase, Phase::Selecting) else {
            return None;
        };
        let correct = question.is_correct(option);
        let points = match (correct, self.scoring) {
            (false, _) => 0,
            (true, Scoring::Flat) => 1,
            (true, Scoring::Weighted) => u32::from(question.difficulty),
        };
        self.score = self.score.saturating_add(points);

        let verdict = Verdict {
            correct,
            points,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        };
        self.phase = Phase::Feedback { question, chosen: option.into(), correct };
        Some(verdict)
    }

    /// Leaves the feedback screen. Returns whether anything changed.
    pub fn advance(&mut self) -> bool {
        if matches!(self.phase, Phase::Feedback { .. }) {
            self.phase = Phase::Selecting;
            return true;
        }
        false
    }

    /// Ends the session. Only the first call returns the result to submit; any
    /// question still on screen is discarded without penalty.
    pub fn end(&mut self) -> Option<LeaderboardEntry> {
        self.phase = Phase::Ended;
        if self.finalized {
            return None;
        }
        self.finalized = true;
        Some(LeaderboardEntry { name: self.player.clone(), score: self.score, sport: self.sport.id.into() })
    }

    pub fn snapshot(&self) -> Snapshot {
        let phase = match &self.phase {
            Phase::Selecting => PhaseView::Selecting,
            Phase::Unavailable { difficulty } => PhaseView::Unavailable { difficulty: *difficulty },
            Phase::AwaitingAnswer(question) => PhaseView::AwaitingAnswer { question: question.into() },
            Phase::Feedback { question, chosen, correct } => PhaseView::Feedback {
                question: question.into(),
                chosen: chosen.clone(),
                correct: *correct,
                correct_answer: question.correct_answer.clone(),
                explanation: question.explanation.clone(),
            },
            Phase::Ended => PhaseView::Ended,
        };
        Snapshot {
            player: self.player.clone(),
            sport: self.sport.id,
            mode: self.mode,
            score: self.score,
            remaining: self.remaining,
            served: self.served.len(),
            phase,
        }
    }
}
