use crate::{
    error::reject,
    util::{
        body::{empty, json, read_json, Reply},
        session::{decode_session, encode_session},
    },
};
use engine::{Lobby, SessionId, Snapshot, Verdict};
use hyper::{body::Body, Response, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Default, Deserialize)]
struct StartForm {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sport: Option<String>,
}

#[derive(Default, Deserialize)]
struct DifficultyForm {
    #[serde(default)]
    value: u16,
}

#[derive(Default, Deserialize)]
struct AnswerForm {
    #[serde(default)]
    option: String,
}

#[derive(Serialize)]
struct Started {
    id: String,
    session: Snapshot,
}

#[derive(Serialize)]
struct Answered {
    verdict: Option<Verdict>,
    session: Snapshot,
}

fn parse_id(token: &str) -> Result<SessionId, StatusCode> {
    decode_session(token).ok_or(StatusCode::NOT_FOUND)
}

/// Starts a session. Missing fields fall back to the saved player setup.
pub async fn try_start<B>(body: B, lobby: &Lobby) -> Result<Response<Reply>, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let StartForm { name, sport } = read_json(body).await?;
    let saved = lobby.setup().load();
    let name = name.or_else(|| saved.as_ref().map(|setup| String::from(setup.name.as_ref()))).unwrap_or_default();
    let sport = sport.or_else(|| saved.as_ref().map(|setup| String::from(setup.sport.id))).unwrap_or_default();

    match lobby.start(&name, &sport).await {
        Ok((id, session)) => json(StatusCode::CREATED, &Started { id: encode_session(id), session }),
        Err(err) => reject(err),
    }
}

pub async fn try_snapshot(token: &str, lobby: &Lobby) -> Result<Response<Reply>, StatusCode> {
    match lobby.snapshot(parse_id(token)?).await {
        Ok(session) => json(StatusCode::OK, &session),
        Err(err) => reject(err),
    }
}

pub async fn try_choose<B>(token: &str, body: B, lobby: &Lobby) -> Result<Response<Reply>, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let id = parse_id(token)?;
    let DifficultyForm { value } = read_json(body).await?;
    match lobby.choose_difficulty(id, value).await {
        Ok(session) => json(StatusCode::OK, &session),
        Err(err) => reject(err),
    }
}

pub async fn try_answer<B>(token: &str, body: B, lobby: &Lobby) -> Result<Response<Reply>, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let id = parse_id(token)?;
    let AnswerForm { option } = read_json(body).await?;
    match lobby.submit_answer(id, &option).await {
        Ok((verdict, session)) => json(StatusCode::OK, &Answered { verdict, session }),
        Err(err) => reject(err),
    }
}

pub async fn try_end(token: &str, lobby: &Lobby) -> Result<Response<Reply>, StatusCode> {
    match lobby.end(parse_id(token)?).await {
        Ok(session) => json(StatusCode::OK, &session),
        Err(err) => reject(err),
    }
}

pub fn try_abandon(token: &str, lobby: &Lobby) -> Result<Response<Reply>, StatusCode> {
    if lobby.abandon(parse_id(token)?) {
        Ok(empty(StatusCode::NO_CONTENT))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
