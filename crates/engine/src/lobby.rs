use crate::{
    bank::QuestionBank,
    config::Config,
    error::{Error, Result},
    leaderboard::LeaderboardStore,
    selector::{QuestionSelector, Selection},
    session::{Phase, Session, Snapshot, Verdict},
    setup::Setup,
    store::{LocalCache, QuestionStore, ScoreStore},
};
use dashmap::{mapref::entry::Entry, DashMap};
use log::{debug, info};
use model::LeaderboardEntry;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant},
};

/// Opaque identifier of a running session.
pub type SessionId = u64;

enum Command {
    Snapshot(oneshot::Sender<Snapshot>),
    ChooseDifficulty(u16, oneshot::Sender<Result<Snapshot>>),
    Answer(Box<str>, oneshot::Sender<(Option<Verdict>, Snapshot)>),
    End(oneshot::Sender<Snapshot>),
}

type Channel = mpsc::UnboundedSender<Command>;
type SessionRegistry = DashMap<SessionId, Channel>;

struct Internal {
    /// Command channels of all live sessions.
    sessions: SessionRegistry,
    selector: QuestionSelector,
    leaderboard: LeaderboardStore,
    setup: Setup,
    config: Config,
}

/// Entry point for the presentation layer. Every session runs as its own task
/// that owns the [`Session`] state; commands, countdown ticks, and the feedback
/// timer are all handled by that one task, so they never race each other.
#[derive(Clone)]
pub struct Lobby {
    inner: Arc<Internal>,
}

impl Lobby {
    pub fn new(
        questions: Arc<dyn QuestionStore>,
        scores: Arc<dyn ScoreStore>,
        cache: Arc<dyn LocalCache>,
        config: Config,
    ) -> Self {
        let selector = QuestionSelector::new(QuestionBank::new(questions));
        let leaderboard = LeaderboardStore::new(scores, Arc::clone(&cache));
        let setup = Setup::new(cache);
        let inner = Internal { sessions: DashMap::new(), selector, leaderboard, setup, config };
        Self { inner: Arc::new(inner) }
    }

    pub fn setup(&self) -> &Setup {
        &self.inner.setup
    }

    pub fn leaderboard(&self) -> &LeaderboardStore {
        &self.inner.leaderboard
    }

    /// Number of sessions that can still be queried.
    pub fn live_sessions(&self) -> usize {
        self.inner.sessions.len()
    }

    /// Validates the player and spawns a new session. Must be called from
    /// within a Tokio runtime.
    pub async fn start(&self, player: &str, sport: &str) -> Result<(SessionId, Snapshot)> {
        let session = Session::new(player, sport, &self.inner.config)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let id = loop {
            let id: SessionId = rand::random();
            if let Entry::Vacant(entry) = self.inner.sessions.entry(id) {
                entry.insert(tx);
                break id;
            }
        };

        tokio::spawn(run(Arc::clone(&self.inner), id, session, rx));
        let snapshot = self.snapshot(id).await?;
        Ok((id, snapshot))
    }

    pub async fn snapshot(&self, id: SessionId) -> Result<Snapshot> {
        self.request(id, Command::Snapshot).await
    }

    pub async fn choose_difficulty(&self, id: SessionId, value: u16) -> Result<Snapshot> {
        self.request(id, |reply| Command::ChooseDifficulty(value, reply)).await?
    }

    /// Answers the current question. The verdict is `None` when no question was
    /// awaiting an answer, in which case nothing changed.
    pub async fn submit_answer(&self, id: SessionId, option: &str) -> Result<(Option<Verdict>, Snapshot)> {
        let option = Box::from(option);
        self.request(id, |reply| Command::Answer(option, reply)).await
    }

    /// Ends the session and submits its result. Repeated calls only return the
    /// final snapshot.
    pub async fn end(&self, id: SessionId) -> Result<Snapshot> {
        self.request(id, Command::End).await
    }

    /// Discards the session without submitting a result, as when the player
    /// leaves mid-game. Returns whether the session existed.
    pub fn abandon(&self, id: SessionId) -> bool {
        self.inner.sessions.remove(&id).is_some()
    }

    async fn request<T>(&self, id: SessionId, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .sessions
            .get(&id)
            .ok_or(Error::UnknownSession)?
            .send(command(tx))
            .map_err(|_| Error::UnknownSession)?;
        rx.await.map_err(|_| Error::UnknownSession)
    }
}

async fn draw(inner: &Internal, session: &mut Session, difficulty: u16) {
    match inner.selector.select_one(session.sport().id, difficulty).await {
        Selection::Question(question) => session.present(question),
        Selection::NoneAvailable => session.unavailable(difficulty),
    }
}

async fn finalize(inner: &Internal, id: SessionId, entry: LeaderboardEntry) {
    info!("session {id:016x} ended: {} scored {} in {}", entry.name, entry.score, entry.sport);
    inner.leaderboard.record(entry).await;
}

async fn run(inner: Arc<Internal>, id: SessionId, mut session: Session, mut rx: mpsc::UnboundedReceiver<Command>) {
    let config = inner.config.clone();
    let mut ticker = time::interval_at(Instant::now() + config.tick, config.tick);
    let feedback = time::sleep(config.feedback_delay);
    let linger = time::sleep(config.linger);
    tokio::pin!(feedback, linger);
    let mut feedback_armed = false;
    let mut lingering = false;

    info!("session {id:016x} started in {}", session.sport().id);
    if let Some(difficulty) = session.pending_draw() {
        draw(&inner, &mut session, difficulty).await;
    }

    loop {
        tokio::select! {
            biased;
            command = rx.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Snapshot(reply) => {
                        let _ = reply.send(session.snapshot());
                    }
                    Command::ChooseDifficulty(value, reply) => {
                        let result = match session.choose_difficulty(value) {
                            Ok(Some(difficulty)) => {
                                draw(&inner, &mut session, difficulty).await;
                                Ok(session.snapshot())
                            }
                            Ok(None) => Ok(session.snapshot()),
                            Err(err) => Err(err),
                        };
                        let _ = reply.send(result);
                    }
                    Command::Answer(option, reply) => {
                        let verdict = session.submit_answer(&option);
                        if verdict.is_some() {
                            feedback.as_mut().reset(Instant::now() + config.feedback_delay);
                            feedback_armed = true;
                        }
                        let _ = reply.send((verdict, session.snapshot()));
                    }
                    Command::End(reply) => {
                        if let Some(entry) = session.end() {
                            finalize(&inner, id, entry).await;
                        }
                        let _ = reply.send(session.snapshot());
                    }
                }
            }
            _ = ticker.tick(), if !session.is_ended() => {
                if let Some(entry) = session.tick() {
                    finalize(&inner, id, entry).await;
                } else if matches!(session.phase(), Phase::Unavailable { .. }) {
                    // Keep retrying a starved preset difficulty once per tick.
                    if let Some(difficulty) = session.pending_draw() {
                        draw(&inner, &mut session, difficulty).await;
                    }
                }
            }
            _ = &mut feedback, if feedback_armed => {
                feedback_armed = false;
                if session.advance() {
                    if let Some(difficulty) = session.pending_draw() {
                        draw(&inner, &mut session, difficulty).await;
                    }
                }
            }
            _ = &mut linger, if lingering => {
                debug!("discarding finished session {id:016x}");
                inner.sessions.remove(&id);
                break;
            }
        }

        if session.is_ended() && !lingering {
            // A pending advance must never fire into a finished session.
            feedback_armed = false;
            linger.as_mut().reset(Instant::now() + config.linger);
            lingering = true;
        }
    }

    if !session.is_ended() {
        info!("session {id:016x} abandoned with {} points", session.score());
    }
}
