use crate::store::{LocalCache, ScoreStore, LEADERBOARD_KEY};
use log::{error, info, warn};
use model::{
    leaderboard::{placeholders, CAPACITY},
    LeaderboardEntry, ScoreSubmission,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Adds `entry` to `board` and keeps the best [`CAPACITY`] results. Equal
/// scores keep their insertion order, so a newcomer ranks below existing ties.
pub fn merge(mut board: Vec<LeaderboardEntry>, entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
    board.push(entry);
    rank(&mut board);
    board
}

fn rank(board: &mut Vec<LeaderboardEntry>) {
    board.sort_by(|a, b| b.score.cmp(&a.score));
    board.truncate(CAPACITY);
}

/// The top-10 view, kept in the durable store and mirrored into the local
/// cache. The two are written independently and may diverge. The cache only
/// hides latency and never overrides a readable durable store.
#[derive(Clone)]
pub struct LeaderboardStore {
    scores: Arc<dyn ScoreStore>,
    cache: Arc<dyn LocalCache>,
    /// Held across every load-modify-save of the durable view.
    writer: Arc<Mutex<()>>,
}

impl LeaderboardStore {
    pub fn new(scores: Arc<dyn ScoreStore>, cache: Arc<dyn LocalCache>) -> Self {
        Self { scores, cache, writer: Arc::default() }
    }

    /// Submits a finished session and returns the updated ranking. Store
    /// failures are logged and never propagated.
    pub async fn record(&self, entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
        let submission = ScoreSubmission::new(&entry, crate::unix_now());
        if let Err(err) = self.scores.append_score(&submission).await {
            error!("failed to append score of {}: {err}", entry.name);
        }

        let _guard = self.writer.lock().await;
        let current = match self.scores.load_leaderboard().await {
            Ok(Some(board)) => board,
            Ok(None) => placeholders(),
            Err(err) => {
                error!("failed to load leaderboard before recording: {err}");
                self.cached().unwrap_or_else(placeholders)
            }
        };

        info!("recording {} with {} points in {}", entry.name, entry.score, entry.sport);
        let board = merge(current, entry);
        if let Err(err) = self.scores.save_leaderboard(&board).await {
            error!("failed to persist leaderboard: {err}");
        }
        self.mirror(&board);
        board
    }

    /// The current ranking. Seeds the durable store with placeholders on first
    /// use so that the view is never empty.
    pub async fn list(&self) -> Vec<LeaderboardEntry> {
        let _guard = self.writer.lock().await;
        let board = match self.scores.load_leaderboard().await {
            Ok(Some(mut board)) => {
                rank(&mut board);
                board
            }
            Ok(None) => {
                info!("seeding empty leaderboard with placeholders");
                let seed = placeholders();
                if let Err(err) = self.scores.save_leaderboard(&seed).await {
                    error!("failed to persist leaderboard seed: {err}");
                }
                seed
            }
            Err(err) => {
                error!("failed to load leaderboard, falling back to cache: {err}");
                return self.cached().unwrap_or_else(placeholders);
            }
        };
        self.mirror(&board);
        board
    }

    fn cached(&self) -> Option<Vec<LeaderboardEntry>> {
        let text = self.cache.get(LEADERBOARD_KEY)?;
        match serde_json::from_str(&text) {
            Ok(board) => Some(board),
            Err(err) => {
                warn!("ignoring corrupt cached leaderboard: {err}");
                None
            }
        }
    }

    fn mirror(&self, board: &[LeaderboardEntry]) {
        match serde_json::to_string(board) {
            Ok(text) => self.cache.set(LEADERBOARD_KEY, text),
            Err(err) => warn!("failed to serialize leaderboard for the cache: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{merge, LeaderboardStore};
    use crate::{
        memory::{MemoryCache, MemoryScores},
        store::{LocalCache, ScoreStore, StoreResult, LEADERBOARD_KEY},
    };
    use async_trait::async_trait;
    use model::{leaderboard::placeholders, LeaderboardEntry, ScoreSubmission};
    use std::sync::Arc;
    use tokio::task;

    /// Hands control back to the scheduler before every call, the way a
    /// networked store would.
    struct Yielding(Arc<MemoryScores>);

    #[async_trait]
    impl ScoreStore for Yielding {
        async fn append_score(&self, submission: &ScoreSubmission) -> StoreResult<()> {
            task::yield_now().await;
            self.0.append_score(submission).await
        }

        async fn load_leaderboard(&self) -> StoreResult<Option<Vec<LeaderboardEntry>>> {
            task::yield_now().await;
            self.0.load_leaderboard().await
        }

        async fn save_leaderboard(&self, entries: &[LeaderboardEntry]) -> StoreResult<()> {
            task::yield_now().await;
            self.0.save_leaderboard(entries).await
        }
    }

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry { name: name.into(), score, sport: "soccer".into() }
    }

    fn scores(board: &[LeaderboardEntry]) -> Vec<u32> {
        board.iter().map(|e| e.score).collect()
    }

    fn store(scores: &Arc<MemoryScores>, cache: &Arc<MemoryCache>) -> LeaderboardStore {
        LeaderboardStore::new(scores.clone(), cache.clone())
    }

    #[test]
    fn inserts_in_rank_order() {
        let board = vec![entry("a", 87), entry("b", 76), entry("c", 72), entry("d", 65)];
        assert_eq!(scores(&merge(board, entry("new", 80))), [87, 80, 76, 72, 65]);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut board = Vec::new();
        for score in [5, 90, 12, 40, 40, 77, 3, 61, 18, 99, 50, 1, 64] {
            board = merge(board, entry("p", score));
            assert!(board.len() <= 10);
            assert!(board.windows(2).all(|pair| pair[0].score >= pair[1].score));
        }
        assert_eq!(scores(&board), [99, 90, 77, 64, 61, 50, 40, 40, 18, 12]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let board = merge(vec![entry("old", 50)], entry("new", 50));
        assert_eq!(board[0].name.as_ref(), "old");
        assert_eq!(board[1].name.as_ref(), "new");

        // A newcomer tied with the last place of a full board does not make the cut.
        let full: Vec<_> = (0..10).map(|i| entry("full", 100 - i)).collect();
        let board = merge(full, entry("late", 91));
        assert_eq!(board.len(), 10);
        assert!(board.iter().all(|e| e.name.as_ref() == "full"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn seeds_empty_store_once() {
        let durable = Arc::new(MemoryScores::default());
        let cache = Arc::new(MemoryCache::default());
        let leaderboard = store(&durable, &cache);

        let first = leaderboard.list().await;
        assert_eq!(first, placeholders());
        assert_eq!(durable.board(), Some(placeholders()));

        let second = leaderboard.list().await;
        assert_eq!(second, first);
        assert!(cache.get(LEADERBOARD_KEY).is_some());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn record_appends_and_reranks() {
        let board = vec![entry("a", 87), entry("b", 76), entry("c", 72), entry("d", 65)];
        let durable = Arc::new(MemoryScores::with_board(board));
        let cache = Arc::new(MemoryCache::default());
        let leaderboard = store(&durable, &cache);

        let board = leaderboard.record(entry("new", 80)).await;
        assert_eq!(scores(&board), [87, 80, 76, 72, 65]);
        assert_eq!(durable.board().as_deref(), Some(board.as_slice()));

        let submissions = durable.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].player_name.as_ref(), "new");
        assert_eq!(submissions[0].score, 80);

        let cached: Vec<LeaderboardEntry> = serde_json::from_str(&cache.get(LEADERBOARD_KEY).unwrap()).unwrap();
        assert_eq!(cached, board);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn record_on_fresh_store_ranks_against_placeholders() {
        let durable = Arc::new(MemoryScores::default());
        let cache = Arc::new(MemoryCache::default());
        let board = store(&durable, &cache).record(entry("new", 60)).await;
        assert_eq!(board.len(), 10);
        assert_eq!(board[4].name.as_ref(), "new");
        assert_eq!(board.last().unwrap().score, 38);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn durable_failure_still_updates_cache() {
        let durable = Arc::new(MemoryScores::with_board(vec![entry("a", 10)]));
        let cache = Arc::new(MemoryCache::default());
        let leaderboard = store(&durable, &cache);
        leaderboard.list().await;

        durable.set_offline(true);
        let board = leaderboard.record(entry("b", 20)).await;
        assert_eq!(scores(&board), [20, 10]);
        assert!(durable.submissions().is_empty());
        assert_eq!(durable.board(), Some(vec![entry("a", 10)]));

        // While the durable store is down, the view falls back to the cache.
        assert_eq!(scores(&leaderboard.list().await), [20, 10]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unreachable_store_without_cache_shows_placeholders() {
        let durable = Arc::new(MemoryScores::default());
        durable.set_offline(true);
        let cache = Arc::new(MemoryCache::default());
        assert_eq!(store(&durable, &cache).list().await, placeholders());
        assert_eq!(durable.board(), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn corrupt_cache_is_ignored() {
        let durable = Arc::new(MemoryScores::default());
        durable.set_offline(true);
        let cache = Arc::new(MemoryCache::default());
        cache.set(LEADERBOARD_KEY, String::from("{not json"));
        assert_eq!(store(&durable, &cache).list().await, placeholders());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn simultaneous_records_both_land() {
        let durable = Arc::new(MemoryScores::default());
        let cache = Arc::new(MemoryCache::default());
        let leaderboard = LeaderboardStore::new(Arc::new(Yielding(durable.clone())), cache);

        let first = tokio::spawn({
            let leaderboard = leaderboard.clone();
            async move { leaderboard.record(entry("A", 100)).await }
        });
        let second = tokio::spawn({
            let leaderboard = leaderboard.clone();
            async move { leaderboard.record(entry("B", 90)).await }
        });
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(durable.submissions().len(), 2);
        let board = durable.board().unwrap();
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].name.as_ref(), "A");
        assert_eq!(board[1].name.as_ref(), "B");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn list_reranks_an_unordered_store() {
        let stored: Vec<_> = (0..12).map(|i| entry("p", i * 7 % 12)).collect();
        let durable = Arc::new(MemoryScores::with_board(stored));
        let cache = Arc::new(MemoryCache::default());
        let board = store(&durable, &cache).list().await;
        assert_eq!(scores(&board), [11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    }
}
