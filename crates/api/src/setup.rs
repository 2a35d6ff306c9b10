use crate::{
    error::reject,
    util::body::{empty, json, read_json, Reply},
};
use engine::Lobby;
use hyper::{body::Body, Response, StatusCode};
use serde::Deserialize;

#[derive(Default, Deserialize)]
struct SetupForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sport: String,
}

pub async fn try_save<B>(body: B, lobby: &Lobby) -> Result<Response<Reply>, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let SetupForm { name, sport } = read_json(body).await?;
    match lobby.setup().save(&name, &sport) {
        Ok(_) => Ok(empty(StatusCode::NO_CONTENT)),
        Err(err) => reject(err),
    }
}

pub fn try_load(lobby: &Lobby) -> Result<Response<Reply>, StatusCode> {
    let setup = lobby.setup().load().ok_or(StatusCode::NOT_FOUND)?;
    json(StatusCode::OK, &setup)
}
