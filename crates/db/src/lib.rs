pub mod error;

use async_trait::async_trait;
use engine::store::{QuestionStore, ScoreStore, StoreResult};
use futures_util::{future, TryStreamExt};
use model::{LeaderboardEntry, Question, ScoreSubmission};
use tokio_postgres::types::ToSql;

pub use tokio_postgres::{tls::NoTls, Client, Config};

/// Statements creating every table the stores rely on. Safe to run repeatedly.
pub const SCHEMA: &str = include_str!("../schema.sql");

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn deserialize_question_from_row(row: tokio_postgres::Row) -> error::Result<Question> {
    let id: String = row.try_get("id").map_err(|_| error::Error::Schema)?;
    let category: String = row.try_get("category").map_err(|_| error::Error::Schema)?;
    let difficulty: i16 = row.try_get("difficulty").map_err(|_| error::Error::Schema)?;
    let usage_count: i32 = row.try_get("usage_count").map_err(|_| error::Error::Schema)?;
    Ok(Question {
        id: id.into_boxed_str(),
        category: category.into_boxed_str(),
        question: row.try_get("question").map_err(|_| error::Error::Schema)?,
        options: row.try_get("options").map_err(|_| error::Error::Schema)?,
        correct_answer: row.try_get("correct_answer").map_err(|_| error::Error::Schema)?,
        difficulty: u16::try_from(difficulty).map_err(|_| error::Error::Schema)?,
        explanation: row.try_get("explanation").map_err(|_| error::Error::Schema)?,
        created_at: row.try_get("created_at").map_err(|_| error::Error::Schema)?,
        last_used: row.try_get("last_used").map_err(|_| error::Error::Schema)?,
        usage_count: u32::try_from(usage_count).map_err(|_| error::Error::Schema)?,
    })
}

fn deserialize_entry_from_row(row: tokio_postgres::Row) -> error::Result<LeaderboardEntry> {
    let name: String = row.try_get("name").map_err(|_| error::Error::Schema)?;
    let score: i32 = row.try_get("score").map_err(|_| error::Error::Schema)?;
    let sport: String = row.try_get("sport").map_err(|_| error::Error::Schema)?;
    let score = u32::try_from(score).map_err(|_| error::Error::Schema)?;
    Ok(LeaderboardEntry { name: name.into_boxed_str(), score, sport: sport.into_boxed_str() })
}

impl Database {
    pub async fn migrate(&self) -> error::Result<()> {
        self.0.batch_execute(SCHEMA).await?;
        Ok(())
    }

    pub async fn get_questions(&self, category: &str, difficulty: Option<u16>) -> error::Result<Vec<Question>> {
        let difficulty = difficulty.map(i16::try_from).transpose().map_err(|_| error::Error::BadInput)?;
        let params: [&(dyn ToSql + Sync); 2] = [&category, &difficulty];
        self.0
            .query_raw(
                "SELECT id, category, question, options, correct_answer, difficulty, explanation, \
                 EXTRACT(EPOCH FROM created_at)::BIGINT AS created_at, \
                 EXTRACT(EPOCH FROM last_used)::BIGINT AS last_used, usage_count \
                 FROM questions WHERE category = $1 AND ($2::SMALLINT IS NULL OR difficulty = $2)",
                params,
            )
            .await?
            .map_err(error::Error::from)
            .and_then(|row| future::ready(deserialize_question_from_row(row)))
            .try_collect()
            .await
    }

    pub async fn touch_question(&self, id: &str, at: i64) -> error::Result<()> {
        self.0
            .execute(
                "UPDATE questions SET last_used = to_timestamp($2::BIGINT), usage_count = usage_count + 1 \
                 WHERE id = $1",
                &[&id, &at],
            )
            .await?;
        Ok(())
    }

    pub async fn insert_score(&self, submission: &ScoreSubmission) -> error::Result<()> {
        let score = i32::try_from(submission.score).map_err(|_| error::Error::BadInput)?;
        let timestamp = i64::try_from(submission.timestamp).map_err(|_| error::Error::BadInput)?;
        let name = submission.player_name.as_ref();
        let sport = submission.sport.as_ref();
        self.0
            .execute(
                "INSERT INTO scores (player_name, score, sport, submitted_at) \
                 VALUES ($1, $2, $3, to_timestamp($4::BIGINT))",
                &[&name, &score, &sport, &timestamp],
            )
            .await?;
        Ok(())
    }

    /// Returns `None` if the leaderboard has never been written.
    pub async fn get_leaderboard(&self) -> error::Result<Option<Vec<LeaderboardEntry>>> {
        let rows = self.0.query("SELECT name, score, sport FROM leaderboard ORDER BY rank", &[]).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        rows.into_iter().map(deserialize_entry_from_row).collect::<error::Result<_>>().map(Some)
    }

    pub async fn replace_leaderboard(&self, entries: &[LeaderboardEntry]) -> error::Result<()> {
        let mut ranks = Vec::with_capacity(entries.len());
        let mut names = Vec::with_capacity(entries.len());
        let mut scores = Vec::with_capacity(entries.len());
        let mut sports = Vec::with_capacity(entries.len());
        for (rank, entry) in entries.iter().enumerate() {
            ranks.push(i16::try_from(rank).map_err(|_| error::Error::BadInput)?);
            names.push(entry.name.as_ref());
            scores.push(i32::try_from(entry.score).map_err(|_| error::Error::BadInput)?);
            sports.push(entry.sport.as_ref());
        }

        // Both halves see the same snapshot, so the swap is atomic.
        self.0
            .execute(
                "WITH cleared AS (DELETE FROM leaderboard) \
                 INSERT INTO leaderboard (rank, name, score, sport) \
                 SELECT * FROM UNNEST($1::SMALLINT[], $2::TEXT[], $3::INT[], $4::TEXT[])",
                &[&ranks, &names, &scores, &sports],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl QuestionStore for Database {
    async fn fetch_questions(&self, category: &str, difficulty: Option<u16>) -> StoreResult<Vec<Question>> {
        Ok(self.get_questions(category, difficulty).await?)
    }

    async fn mark_used(&self, id: &str, at: i64) -> StoreResult<()> {
        Ok(self.touch_question(id, at).await?)
    }
}

#[async_trait]
impl ScoreStore for Database {
    async fn append_score(&self, submission: &ScoreSubmission) -> StoreResult<()> {
        Ok(self.insert_score(submission).await?)
    }

    async fn load_leaderboard(&self) -> StoreResult<Option<Vec<LeaderboardEntry>>> {
        Ok(self.get_leaderboard().await?)
    }

    async fn save_leaderboard(&self, entries: &[LeaderboardEntry]) -> StoreResult<()> {
        Ok(self.replace_leaderboard(entries).await?)
    }
}
